use std::future::Future;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::config::ClientConfig;
use crate::consumer::read_tool_events;
use crate::errors::{ClientError, InvokeFailure};
use crate::event::ToolEvent;

/// Remote tools exposed by the assistant service.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Tool {
    /// Web article summarization.
    Web,
    /// YouTube transcript summarization.
    Youtube,
    /// Readwise highlights query.
    Readwise,
}

impl Tool {
    /// Endpoint path segment under `/v1/tools/`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Youtube => "youtube",
            Self::Readwise => "readwise",
        }
    }
}

/// Request body for the web summary tool.
#[derive(Clone, Debug, Serialize)]
pub struct WebSummaryRequest {
    pub url: String,
    /// Custom summarization prompt; the service default is used when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// Request body for the YouTube summary tool.
#[derive(Clone, Debug, Serialize)]
pub struct YoutubeSummaryRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// Request body for the Readwise highlights tool.
#[derive(Clone, Debug, Serialize)]
pub struct ReadwiseRequest {
    pub query: String,
}

/// Client for invoking assistant tools.
///
/// The client holds no per-invocation state; each invocation owns an
/// independent stream consumer, so any number may run concurrently.
#[derive(Clone)]
pub struct ToolClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ToolClient {
    /// Creates a tool client from explicit configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Invokes a tool and delivers every resulting event to `on_event`.
    ///
    /// All outcomes, including request failures, are observable only through
    /// the event sequence; the call itself never returns a value. Dropping
    /// the returned future abandons the invocation without a further event.
    pub async fn invoke<R, F>(&self, tool: Tool, request: &R, mut on_event: F)
    where
        R: Serialize + ?Sized,
        F: FnMut(ToolEvent),
    {
        debug!(tool = tool.name(), "invoking tool");
        let sent = self
            .http
            .post(self.config.tool_url(tool.name()))
            .json(request)
            .send()
            .await;
        match sent {
            Ok(resp) => read_tool_events(resp, on_event).await,
            Err(err) => {
                let failure = InvokeFailure::RequestRejected(format!("request failed: {err}"));
                on_event(ToolEvent::synthetic_error(&failure));
            }
        }
    }

    /// Invokes the web summary tool.
    pub async fn summarize_web(&self, request: &WebSummaryRequest, on_event: impl FnMut(ToolEvent)) {
        self.invoke(Tool::Web, request, on_event).await;
    }

    /// Invokes the YouTube summary tool.
    pub async fn summarize_youtube(
        &self,
        request: &YoutubeSummaryRequest,
        on_event: impl FnMut(ToolEvent),
    ) {
        self.invoke(Tool::Youtube, request, on_event).await;
    }

    /// Invokes the Readwise highlights tool.
    pub async fn query_readwise(&self, request: &ReadwiseRequest, on_event: impl FnMut(ToolEvent)) {
        self.invoke(Tool::Readwise, request, on_event).await;
    }

    /// Spawns a tool invocation on the tokio runtime and returns a
    /// pull-style handle over its events.
    ///
    /// Aborting the run cancels it at its next suspension point; no event is
    /// delivered after cancellation.
    pub fn start<R>(&self, tool: Tool, request: &R) -> Result<ToolRun, ClientError>
    where
        R: Serialize + ?Sized,
    {
        let body = serde_json::to_value(request)
            .map_err(|e| ClientError::Validation(format!("request serialization failed: {e}")))?;
        let (tx, rx) = mpsc::unbounded_channel();
        let (abort_tx, abort_rx) = watch::channel(false);
        let client = self.clone();
        let task_abort_rx = abort_rx.clone();
        tokio::spawn(async move {
            let invocation = client.invoke(tool, &body, |event| {
                // a closed channel means the caller abandoned the run
                let _ = tx.send(event);
            });
            run_until_aborted(invocation, task_abort_rx).await;
        });
        Ok(ToolRun {
            rx,
            abort_handle: AbortHandle { tx: abort_tx },
            abort_rx,
            terminated: false,
        })
    }
}

/// Handle used to cancel a spawned tool run.
#[derive(Clone)]
pub struct AbortHandle {
    tx: watch::Sender<bool>,
}

impl AbortHandle {
    /// Requests cancellation.
    ///
    /// The run stops at its next suspension point; aborting an already
    /// terminated run is a no-op.
    pub fn abort(&self) {
        let _ = self.tx.send(true);
    }
}

/// Pull-style event handle returned by [`ToolClient::start`].
pub struct ToolRun {
    rx: mpsc::UnboundedReceiver<ToolEvent>,
    abort_handle: AbortHandle,
    abort_rx: watch::Receiver<bool>,
    terminated: bool,
}

impl ToolRun {
    /// Returns a handle that can cancel the run.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort_handle.clone()
    }

    /// Waits for and returns the next event.
    ///
    /// Returns `None` once the run has terminated or cancellation has been
    /// requested, and never yields again afterwards. Events still buffered
    /// when `abort` is called are dropped, not delivered.
    pub async fn next_event(&mut self) -> Option<ToolEvent> {
        if self.terminated {
            return None;
        }
        let event = tokio::select! {
            // the abort arm wins over an already-buffered event
            biased;
            _ = wait_for_abort(&mut self.abort_rx) => None,
            event = self.rx.recv() => event,
        };
        match &event {
            Some(event) if event.is_terminal() => self.terminated = true,
            None => self.terminated = true,
            Some(_) => {}
        }
        event
    }
}

async fn run_until_aborted<Fut>(invocation: Fut, mut abort_rx: watch::Receiver<bool>)
where
    Fut: Future<Output = ()>,
{
    tokio::select! {
        _ = invocation => {}
        _ = wait_for_abort(&mut abort_rx) => {}
    }
}

async fn wait_for_abort(abort_rx: &mut watch::Receiver<bool>) {
    // a dropped abort handle can never signal, so park this arm forever
    if abort_rx.wait_for(|aborted| *aborted).await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn tool_names_match_endpoint_segments() {
        assert_eq!(Tool::Web.name(), "web");
        assert_eq!(Tool::Youtube.name(), "youtube");
        assert_eq!(Tool::Readwise.name(), "readwise");
    }

    #[test]
    fn web_request_omits_absent_prompt() {
        let body = serde_json::to_value(WebSummaryRequest {
            url: "https://example.com".into(),
            prompt: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"url": "https://example.com"}));
    }

    #[test]
    fn readwise_request_carries_query() {
        let body = serde_json::to_value(ReadwiseRequest {
            query: "rust".into(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"query": "rust"}));
    }

    #[tokio::test]
    async fn abort_stops_a_pending_invocation_without_events() {
        let (tx, rx) = mpsc::unbounded_channel::<ToolEvent>();
        let (abort_tx, abort_rx) = watch::channel(false);
        let task_abort_rx = abort_rx.clone();
        let task = tokio::spawn(async move {
            let invocation = async move {
                let _tx = tx;
                std::future::pending::<()>().await;
            };
            run_until_aborted(invocation, task_abort_rx).await;
        });

        let abort = AbortHandle { tx: abort_tx };
        abort.abort();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("abort should stop the run")
            .expect("task should not panic");

        let mut run = ToolRun {
            rx,
            abort_handle: abort,
            abort_rx,
            terminated: false,
        };
        assert_eq!(run.next_event().await, None);
    }

    #[tokio::test]
    async fn events_sent_before_abort_are_still_delivered() {
        let (tx, rx) = mpsc::unbounded_channel::<ToolEvent>();
        let (abort_tx, abort_rx) = watch::channel(false);
        let task_abort_rx = abort_rx.clone();
        tokio::spawn(async move {
            let invocation = async move {
                let _ = tx.send(ToolEvent::Working {
                    label: "Step 1".into(),
                });
                std::future::pending::<()>().await;
            };
            run_until_aborted(invocation, task_abort_rx).await;
        });

        let mut run = ToolRun {
            rx,
            abort_handle: AbortHandle { tx: abort_tx },
            abort_rx,
            terminated: false,
        };
        assert_eq!(
            run.next_event().await,
            Some(ToolEvent::Working {
                label: "Step 1".into()
            })
        );
        run.abort_handle().abort();
        assert_eq!(run.next_event().await, None);
        // repeated cancellation after termination is a no-op
        run.abort_handle().abort();
        assert_eq!(run.next_event().await, None);
    }

    #[tokio::test]
    async fn events_buffered_before_abort_are_dropped() {
        let (tx, rx) = mpsc::unbounded_channel::<ToolEvent>();
        let (abort_tx, abort_rx) = watch::channel(false);
        tx.send(ToolEvent::Working {
            label: "queued".into(),
        })
        .unwrap();

        let mut run = ToolRun {
            rx,
            abort_handle: AbortHandle { tx: abort_tx },
            abort_rx,
            terminated: false,
        };
        run.abort_handle().abort();
        assert_eq!(run.next_event().await, None);
        assert_eq!(run.next_event().await, None);
    }

    #[tokio::test]
    async fn no_events_after_terminal_event_from_run_handle() {
        let (tx, rx) = mpsc::unbounded_channel::<ToolEvent>();
        tx.send(ToolEvent::Finished).unwrap();
        tx.send(ToolEvent::Working {
            label: "late".into(),
        })
        .unwrap();
        let (abort_tx, abort_rx) = watch::channel(false);
        let mut run = ToolRun {
            rx,
            abort_handle: AbortHandle { tx: abort_tx },
            abort_rx,
            terminated: false,
        };
        assert_eq!(run.next_event().await, Some(ToolEvent::Finished));
        assert_eq!(run.next_event().await, None);
    }

    #[tokio::test]
    async fn env_gated_smoke_web_summary_if_service_present() {
        if std::env::var("LLM_API_BASE_URL")
            .unwrap_or_default()
            .trim()
            .is_empty()
        {
            eprintln!("skipping tool smoke test (LLM_API_BASE_URL missing)");
            return;
        }

        let client = ToolClient::new(crate::ClientConfig::from_env().expect("config"))
            .expect("client");
        let mut events = Vec::new();
        client
            .summarize_web(
                &WebSummaryRequest {
                    url: "https://example.com".into(),
                    prompt: None,
                },
                |event| events.push(event),
            )
            .await;
        assert!(!events.is_empty(), "expected at least one event");
    }
}
