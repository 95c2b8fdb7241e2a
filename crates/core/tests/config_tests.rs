// ═══════════════════════════════════════════════════════════════════
// Config Tests — AssistantConfig from environment lookups
// ═══════════════════════════════════════════════════════════════════

use std::collections::HashMap;

use monli_core::config::{resolve_model, AssistantConfig, DEFAULT_BASE_URL, FALLBACK_MODEL};
use monli_core::errors::CoreError;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn api_key_is_required() {
    let err = AssistantConfig::from_lookup(lookup(&[])).unwrap_err();
    assert!(matches!(err, CoreError::Configuration(ref msg) if msg.contains("SUMOPOD_API_KEY")));
}

#[test]
fn blank_api_key_is_rejected() {
    let err = AssistantConfig::from_lookup(lookup(&[("SUMOPOD_API_KEY", "   ")])).unwrap_err();
    assert!(matches!(err, CoreError::Configuration(_)));
}

#[test]
fn defaults_apply() {
    let config = AssistantConfig::from_lookup(lookup(&[("SUMOPOD_API_KEY", "sk-1")])).unwrap();
    assert_eq!(config.api_key, "sk-1");
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.model, FALLBACK_MODEL);
}

#[test]
fn supported_model_and_base_url_override() {
    let config = AssistantConfig::from_lookup(lookup(&[
        ("SUMOPOD_API_KEY", "sk-1"),
        ("SUMOPOD_MODEL", "gpt-4o"),
        ("SUMOPOD_BASE_URL", "http://localhost:8080/v1"),
    ]))
    .unwrap();
    assert_eq!(config.model, "gpt-4o");
    assert_eq!(config.base_url, "http://localhost:8080/v1");
}

#[test]
fn unsupported_model_falls_back() {
    assert_eq!(resolve_model(Some("gpt-3.5-turbo")), "gpt-4o-mini");
    assert_eq!(resolve_model(Some("")), "gpt-4o-mini");
    assert_eq!(resolve_model(None), "gpt-4o-mini");
    assert_eq!(resolve_model(Some("gpt-4o-mini")), "gpt-4o-mini");
}

#[test]
fn debug_redacts_api_key() {
    let config = AssistantConfig::from_lookup(lookup(&[("SUMOPOD_API_KEY", "sk-secret")])).unwrap();
    let debug = format!("{config:?}");
    assert!(!debug.contains("sk-secret"));
    assert!(debug.contains("<redacted>"));
}
