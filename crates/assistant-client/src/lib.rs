//! Async client for a self-hosted LLM assistant service.
//!
//! Remote tools (web/video/article summarization) stream their progress as
//! typed lifecycle events over newline-delimited SSE frames; chat
//! completions stream token deltas over the same framing. Both are decoded
//! incrementally with strict in-order, at-most-one-terminal-event delivery.
//!
//! # Invoking a tool
//!
//! ```no_run
//! use assistant_client::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), ClientError> {
//! let client = ToolClient::new(ClientConfig::from_env()?)?;
//! let request = WebSummaryRequest {
//!     url: "https://example.com/article".into(),
//!     prompt: None,
//! };
//! client
//!     .summarize_web(&request, |event| match event {
//!         ToolEvent::Working { label } => eprintln!("... {label}"),
//!         ToolEvent::Output { content } => println!("{content}"),
//!         other => eprintln!("{other:?}"),
//!     })
//!     .await;
//! # Ok(())
//! # }
//! ```

/// Chat messages, parameters, and the streamed completion bridge.
pub mod chat;
/// Client configuration.
pub mod config;
/// The event-stream consumption state machine.
pub mod consumer;
/// Public error types and the invocation failure taxonomy.
pub mod errors;
/// The tool event model and its strict decoder.
pub mod event;
/// Common imports for typical usage.
pub mod prelude;
/// Incremental SSE frame decoding.
pub mod sse;
/// Keyed upsert store for finished chat transcripts.
pub mod store;
/// Tool invocation client and per-tool request types.
pub mod tools;

pub use chat::{ChatClient, ChatMessage, ChatParams, ChatStream, Role, Temperature};
pub use config::ClientConfig;
pub use consumer::{consume, read_tool_events};
pub use errors::{ClientError, InvokeFailure};
pub use event::ToolEvent;
pub use sse::{Frame, FrameDecoder};
pub use store::{ChatTranscript, TranscriptStore};
pub use tools::{
    AbortHandle, ReadwiseRequest, Tool, ToolClient, ToolRun, WebSummaryRequest,
    YoutubeSummaryRequest,
};
