//! Common imports for typical client usage.
//!
//! This module intentionally exports the most frequently used request and
//! event types so examples and application code need fewer import lines.
pub use crate::{
    AbortHandle, ChatClient, ChatMessage, ChatParams, ChatStream, ChatTranscript, ClientConfig,
    ClientError, ReadwiseRequest, Role, Temperature, Tool, ToolClient, ToolEvent, ToolRun,
    TranscriptStore, WebSummaryRequest, YoutubeSummaryRequest,
};
