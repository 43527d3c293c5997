use std::time::Duration;

use crate::errors::ClientError;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Configuration for the assistant service clients.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the assistant service.
    pub base_url: String,
    /// System prompt injected into fresh chat conversations.
    pub system_prompt: String,
    /// Default HTTP timeout for requests.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a config with sensible defaults for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Builds a config from `LLM_API_BASE_URL`.
    pub fn from_env() -> Result<Self, ClientError> {
        let base_url = std::env::var("LLM_API_BASE_URL").unwrap_or_default();
        if base_url.trim().is_empty() {
            return Err(ClientError::Config(
                "missing LLM_API_BASE_URL for assistant client".into(),
            ));
        }
        Ok(Self::new(base_url))
    }

    /// Overrides the system prompt used for fresh conversations.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Overrides the default HTTP timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn tool_url(&self, tool: &str) -> String {
        format!("{}/v1/tools/{tool}", self.base_url.trim_end_matches('/'))
    }

    pub(crate) fn chat_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoint_urls_without_doubled_slashes() {
        let config = ClientConfig::new("http://localhost:8080/");
        assert_eq!(config.tool_url("web"), "http://localhost:8080/v1/tools/web");
        assert_eq!(config.chat_url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn defaults_are_populated() {
        let config = ClientConfig::new("http://localhost:8080");
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.timeout, Duration::from_secs(120));
    }
}
