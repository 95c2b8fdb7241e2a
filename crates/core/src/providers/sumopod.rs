use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::config::AssistantConfig;
use crate::errors::CoreError;
use crate::models::chat::CompletionRequest;
use super::completion::CompletionProvider;

const PROVIDER: &str = "sumopod";

/// OpenAI-compatible completion client for the Sumopod gateway.
pub struct SumopodProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SumopodProvider {
    pub fn new(config: &AssistantConfig) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(60));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// First choice's message content; empty when the model sent none.
    pub fn content_from_response(body: &serde_json::Value) -> String {
        let parsed: Option<CompletionResponse> = serde_json::from_value(body.clone()).ok();
        parsed
            .and_then(|r| r.choices.into_iter().next())
            .and_then(|c| c.message.content)
            .unwrap_or_default()
    }
}

// ── OpenAI response types ───────────────────────────────────────────

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl CompletionProvider for SumopodProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CoreError> {
        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let body: serde_json::Value = resp.json().await.map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse completion response: {e}"),
        })?;

        if !status.is_success() {
            let message = body
                .pointer("/error/message")
                .and_then(|v| v.as_str())
                .unwrap_or("completion request failed");
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("{status}: {message}"),
            });
        }

        Ok(Self::content_from_response(&body))
    }
}
