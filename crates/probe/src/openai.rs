//! `reqwest`-backed liveness target for the OpenAI API.

use std::time::Duration;

use async_trait::async_trait;

use leadboard_domain::model::{DependencyError, ProbeResult};

use crate::LivenessTarget;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct OpenAiTarget {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiTarget {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Base URL override, mainly so tests can point at an unroutable address.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl LivenessTarget for OpenAiTarget {
    async fn list_models(&self) -> ProbeResult<()> {
        self.http
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(DependencyError::unreachable)?
            .error_for_status()
            .map_err(DependencyError::unreachable)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_normalized() {
        let target = OpenAiTarget::with_base_url("sk-test", "http://localhost:8089/v1/");
        assert_eq!(target.base_url, "http://localhost:8089/v1");
    }
}
