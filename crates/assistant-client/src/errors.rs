/// Invocation failure surfaced as a synthetic terminal `error` event.
///
/// These never propagate as `Err` past the stream consumer boundary; they
/// exist to derive the diagnostic string carried by the synthetic event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvokeFailure {
    /// The initiating HTTP exchange failed before any frame was read.
    #[error("request rejected: {0}")]
    RequestRejected(String),
    /// A frame payload failed schema validation.
    #[error("malformed event: {0}")]
    MalformedEvent(String),
    /// The byte stream failed mid-read after the response was accepted.
    #[error("stream interrupted: {0}")]
    StreamInterrupted(String),
}

/// Errors returned by the public client APIs outside the tool event stream.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Invalid client configuration.
    #[error("config error: {0}")]
    Config(String),
    /// Invalid input to a request-building API.
    #[error("validation error: {0}")]
    Validation(String),
    /// A chat completion request failed before any token was streamed.
    #[error("chat request failed: {0}")]
    Request(String),
    /// The chat token stream failed mid-read.
    #[error("chat stream failed: {0}")]
    Stream(String),
}
