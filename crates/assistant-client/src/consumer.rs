//! State machine that turns one invocation's byte stream into an ordered
//! event sequence.
//!
//! The machine has two states. It starts `Open`, stays `Open` while decoded
//! non-terminal events are delivered, and moves to `Terminated` on a decoded
//! `error` or `finished` event, on a decode failure, on a mid-stream read
//! failure, or when the byte stream ends. `Terminated` is absorbing: no
//! callback invocation ever happens after it, regardless of remaining bytes.
//!
//! All failures are converted to data here: the caller observes exactly one
//! synthetic `error` event per failed invocation and never a language-level
//! error.

use std::fmt;

use bytes::Bytes;
use futures::{Stream, StreamExt as _};
use tracing::debug;

use crate::errors::InvokeFailure;
use crate::event::ToolEvent;
use crate::sse::FrameDecoder;

/// Reads a tool invocation response and delivers each decoded event to
/// `on_event`.
///
/// A non-success status is reported as a single synthetic `error` event
/// without reading any frame. This call never returns a value; every
/// outcome is observable only through the event sequence.
pub async fn read_tool_events<F>(resp: reqwest::Response, mut on_event: F)
where
    F: FnMut(ToolEvent),
{
    let status = resp.status();
    if !status.is_success() {
        debug!(%status, "tool invocation rejected");
        let failure = InvokeFailure::RequestRejected(format!("response is not ok: {status}"));
        on_event(ToolEvent::synthetic_error(&failure));
        return;
    }
    consume(Box::pin(resp.bytes_stream()), on_event).await;
}

/// Drives one invocation's byte stream to termination, invoking `on_event`
/// exactly once per decoded event, in arrival order.
///
/// The callback fully returns before the next frame is examined, so a
/// subscriber may mutate shared state without extra synchronization. The
/// byte source is injected so the machine is testable without a network
/// stack; cancellation is dropping the returned future at any suspension
/// point.
pub async fn consume<S, E, F>(mut bytes: S, mut on_event: F)
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: fmt::Display,
    F: FnMut(ToolEvent),
{
    let mut decoder = FrameDecoder::default();
    loop {
        match bytes.next().await {
            Some(Ok(chunk)) => {
                for frame in decoder.feed(&chunk) {
                    let event = match ToolEvent::decode(&frame.data) {
                        Ok(event) => event,
                        Err(err) => {
                            debug!(error = %err, "malformed tool event frame");
                            let failure = InvokeFailure::MalformedEvent(err.to_string());
                            on_event(ToolEvent::synthetic_error(&failure));
                            return;
                        }
                    };
                    let terminal = event.is_terminal();
                    on_event(event);
                    if terminal {
                        // remaining frames and bytes are abandoned, not an error
                        return;
                    }
                }
            }
            Some(Err(err)) => {
                debug!(error = %err, "tool event stream read failed");
                let failure = InvokeFailure::StreamInterrupted(err.to_string());
                on_event(ToolEvent::synthetic_error(&failure));
                return;
            }
            None => {
                // clean end without a finish marker: silent normal termination
                debug!("tool event stream ended without finish marker");
                return;
            }
        }
    }
}
