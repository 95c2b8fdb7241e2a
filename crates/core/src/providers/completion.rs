use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::chat::CompletionRequest;

/// A chat-completion backend (OpenAI-compatible or a test double).
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait CompletionProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Run one completion and return the first choice's text. A reply
    /// with no content yields an empty string.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CoreError>;
}
