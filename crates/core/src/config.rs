use crate::errors::CoreError;

pub const DEFAULT_BASE_URL: &str = "https://ai.sumopod.com/v1";
pub const FALLBACK_MODEL: &str = "gpt-4o-mini";
pub const SUPPORTED_MODELS: &[&str] = &[FALLBACK_MODEL, "gpt-4o"];

/// Connection settings for the completion service behind OCR and chat.
///
/// Read from the environment:
/// - `SUMOPOD_API_KEY` (required)
/// - `SUMOPOD_MODEL` (optional; unsupported values fall back to `gpt-4o-mini`)
/// - `SUMOPOD_BASE_URL` (optional)
#[derive(Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl std::fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl AssistantConfig {
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("SUMOPOD_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CoreError::Configuration("SUMOPOD_API_KEY is not set".into()))?;

        let model = resolve_model(lookup("SUMOPOD_MODEL").as_deref());
        let base_url = lookup("SUMOPOD_BASE_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            api_key,
            base_url,
            model,
        })
    }
}

/// The requested model if supported, otherwise [`FALLBACK_MODEL`].
pub fn resolve_model(requested: Option<&str>) -> String {
    match requested {
        Some(model) if SUPPORTED_MODELS.contains(&model) => model.to_string(),
        Some(model) => {
            tracing::warn!("Unsupported model '{model}', using {FALLBACK_MODEL}");
            FALLBACK_MODEL.to_string()
        }
        None => FALLBACK_MODEL.to_string(),
    }
}
