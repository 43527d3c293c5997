use crate::errors::InvokeFailure;

/// Label carried by every synthetic error event.
pub(crate) const UNEXPECTED_ERROR_LABEL: &str = "Unexpected error";

/// Decoded lifecycle event for one tool invocation.
///
/// This is a closed union: frames carrying an unrecognized `type` tag or a
/// missing/wrongly-typed field are rejected rather than coerced.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolEvent {
    /// A long-running step is in progress; may repeat with different labels.
    Working { label: String },
    /// Output of a completed sub-step; informative but not the final answer.
    IntermediateOutput { label: String, content: String },
    /// The final answer payload.
    Output { content: String },
    /// The invocation failed. Terminal.
    Error {
        label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    /// Explicit end-of-stream marker. Terminal.
    Finished,
}

impl ToolEvent {
    /// Strictly decodes one frame payload.
    pub fn decode(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// True for the events after which no further events are delivered.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Error { .. } | Self::Finished)
    }

    /// Fabricates the terminal error event used to report a transport- or
    /// parse-level failure.
    pub(crate) fn synthetic_error(failure: &InvokeFailure) -> Self {
        Self::Error {
            label: UNEXPECTED_ERROR_LABEL.to_string(),
            error: Some(failure.to_string()),
        }
    }
}
