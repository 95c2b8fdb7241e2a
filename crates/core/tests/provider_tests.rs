// ═══════════════════════════════════════════════════════════════════
// Provider Tests — Registry, MetalpriceAPI, metals.dev, Sumopod logic
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use std::collections::HashMap;

use monli_core::config::AssistantConfig;
use monli_core::errors::CoreError;
use monli_core::models::zakat::Metal;
use monli_core::providers::completion::CompletionProvider;
use monli_core::providers::metalprice_api::MetalpriceApiProvider;
use monli_core::providers::metals_dev::MetalsDevProvider;
use monli_core::providers::registry::{MetalPriceRegistry, METALPRICE_API_KEY, METALS_DEV_KEY};
use monli_core::providers::sumopod::SumopodProvider;
use monli_core::providers::traits::MetalPriceProvider;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers — Mock Providers
// ═══════════════════════════════════════════════════════════════════

/// A mock provider that quotes only the specified metals.
struct MockProvider {
    name: String,
    metals: Vec<Metal>,
}

impl MockProvider {
    fn new(name: &str, metals: Vec<Metal>) -> Self {
        Self {
            name: name.to_string(),
            metals,
        }
    }
}

#[async_trait]
impl MetalPriceProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_metals(&self) -> Vec<Metal> {
        self.metals.clone()
    }

    async fn get_current_price(&self, _metal: Metal, _currency: &str) -> Result<f64, CoreError> {
        Ok(1.0)
    }

    async fn get_historical_price(
        &self,
        _metal: Metal,
        _currency: &str,
        _date: NaiveDate,
    ) -> Result<f64, CoreError> {
        Ok(1.0)
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════

mod registry {
    use super::*;

    #[test]
    fn empty_registry_has_no_providers() {
        let registry = MetalPriceRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get_provider_for(Metal::Gold).is_none());
        assert!(registry.get_providers_for(Metal::Silver).is_empty());
    }

    #[test]
    fn lookup_filters_by_metal_and_keeps_order() {
        let mut registry = MetalPriceRegistry::new();
        registry.register(Box::new(MockProvider::new("gold-only", vec![Metal::Gold])));
        registry.register(Box::new(MockProvider::new("both", vec![Metal::Gold, Metal::Silver])));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get_provider_for(Metal::Gold).unwrap().name(), "gold-only");
        assert_eq!(registry.get_provider_for(Metal::Silver).unwrap().name(), "both");

        let names: Vec<_> = registry.get_providers_for(Metal::Gold).iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["gold-only", "both"]);
    }

    #[test]
    fn defaults_require_api_keys() {
        let registry = MetalPriceRegistry::new_with_defaults(&HashMap::new());
        assert!(registry.is_empty());
    }

    #[test]
    fn defaults_put_metalpriceapi_first() {
        let mut keys = HashMap::new();
        keys.insert(METALS_DEV_KEY.to_string(), "dev-key".to_string());
        keys.insert(METALPRICE_API_KEY.to_string(), "mp-key".to_string());

        let registry = MetalPriceRegistry::new_with_defaults(&keys);
        let names: Vec<_> = registry.get_providers_for(Metal::Gold).iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["metalpriceapi", "metals.dev"]);
    }

    #[test]
    fn defaults_with_single_key() {
        let mut keys = HashMap::new();
        keys.insert(METALS_DEV_KEY.to_string(), "dev-key".to_string());
        let registry = MetalPriceRegistry::new_with_defaults(&keys);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get_provider_for(Metal::Silver).unwrap().name(), "metals.dev");
    }
}

// ═══════════════════════════════════════════════════════════════════
// MetalpriceAPI
// ═══════════════════════════════════════════════════════════════════

mod metalprice_api {
    use super::*;

    #[test]
    fn rate_key_concatenates_currency_and_symbol() {
        assert_eq!(MetalpriceApiProvider::rate_key(Metal::Gold, "idr"), "IDRXAU");
        assert_eq!(MetalpriceApiProvider::rate_key(Metal::Silver, "USD"), "USDXAG");
    }

    #[test]
    fn direct_quote_is_preferred() {
        let body = json!({"success": true, "rates": {"IDRXAG": 600000.0, "XAG": 0.5}});
        let price = MetalpriceApiProvider::price_from_response(&body, Metal::Silver, "IDR", "latest").unwrap();
        assert_eq!(price, 600_000.0);
    }

    #[test]
    fn inverse_rate_is_used_without_direct_quote() {
        let body = json!({"success": true, "rates": {"XAU": 0.0005}});
        let price = MetalpriceApiProvider::price_from_response(&body, Metal::Gold, "USD", "latest").unwrap();
        assert_eq!(price, 2000.0);
    }

    #[test]
    fn zero_inverse_rate_is_not_a_price() {
        let body = json!({"success": true, "rates": {"XAU": 0.0}});
        let err = MetalpriceApiProvider::price_from_response(&body, Metal::Gold, "USD", "2024-01-02").unwrap_err();
        assert!(matches!(err, CoreError::PriceNotAvailable { ref date, .. } if date == "2024-01-02"));
    }

    #[test]
    fn unsuccessful_response_surfaces_message() {
        let body = json!({"success": false, "error": {"statusCode": 101, "message": "Invalid API Key"}});
        let err = MetalpriceApiProvider::price_from_response(&body, Metal::Gold, "IDR", "latest").unwrap_err();
        match err {
            CoreError::Api { provider, message } => {
                assert_eq!(provider, "metalpriceapi");
                assert_eq!(message, "Invalid API Key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_rates_is_an_api_error() {
        let body = json!({"success": true});
        let err = MetalpriceApiProvider::price_from_response(&body, Metal::Gold, "IDR", "latest").unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));
    }

    #[test]
    fn provider_metadata() {
        let provider = MetalpriceApiProvider::new("key".into());
        assert_eq!(provider.name(), "metalpriceapi");
        assert_eq!(provider.supported_metals(), vec![Metal::Gold, Metal::Silver]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// metals.dev
// ═══════════════════════════════════════════════════════════════════

mod metals_dev {
    use super::*;

    fn timeseries() -> serde_json::Value {
        json!({
            "status": "success",
            "rates": {
                "2024-01-02": {
                    "metals": {"gold": 2050.0, "silver": 24.0},
                    "currencies": {"IDR": 0.0000625, "EUR": 1.1}
                }
            }
        })
    }

    #[test]
    fn metal_names() {
        assert_eq!(MetalsDevProvider::metal_name(Metal::Gold), "gold");
        assert_eq!(MetalsDevProvider::metal_name(Metal::Silver), "silver");
    }

    #[test]
    fn usd_price_is_returned_as_is() {
        let price = MetalsDevProvider::price_from_timeseries(&timeseries(), Metal::Gold, "usd", date(2024, 1, 2)).unwrap();
        assert_eq!(price, 2050.0);
    }

    #[test]
    fn non_usd_price_is_converted() {
        let price = MetalsDevProvider::price_from_timeseries(&timeseries(), Metal::Silver, "IDR", date(2024, 1, 2)).unwrap();
        assert!((price - 384_000.0).abs() < 1e-6);
    }

    #[test]
    fn missing_date_is_not_available() {
        let err = MetalsDevProvider::price_from_timeseries(&timeseries(), Metal::Gold, "USD", date(2024, 1, 3)).unwrap_err();
        assert!(matches!(err, CoreError::PriceNotAvailable { .. }));
    }

    #[test]
    fn unknown_currency_is_not_available() {
        let err = MetalsDevProvider::price_from_timeseries(&timeseries(), Metal::Gold, "JPY", date(2024, 1, 2)).unwrap_err();
        assert!(matches!(err, CoreError::PriceNotAvailable { ref currency, .. } if currency == "JPY"));
    }

    #[test]
    fn provider_metadata() {
        let provider = MetalsDevProvider::new("key".into());
        assert_eq!(provider.name(), "metals.dev");
        assert!(provider.supported_metals().contains(&Metal::Silver));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Sumopod
// ═══════════════════════════════════════════════════════════════════

mod sumopod {
    use super::*;

    fn config(base_url: &str) -> AssistantConfig {
        AssistantConfig {
            api_key: "sk-test".into(),
            base_url: base_url.into(),
            model: "gpt-4o-mini".into(),
        }
    }

    #[test]
    fn endpoint_joins_base_url() {
        let provider = SumopodProvider::new(&config("https://ai.sumopod.com/v1/"));
        assert_eq!(provider.endpoint(), "https://ai.sumopod.com/v1/chat/completions");
        assert_eq!(provider.name(), "sumopod");
    }

    #[test]
    fn first_choice_content_is_returned() {
        let body = json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Hello"}},
                {"message": {"role": "assistant", "content": "Ignored"}}
            ]
        });
        assert_eq!(SumopodProvider::content_from_response(&body), "Hello");
    }

    #[test]
    fn missing_content_is_empty() {
        assert_eq!(SumopodProvider::content_from_response(&json!({"choices": []})), "");
        assert_eq!(SumopodProvider::content_from_response(&json!({})), "");
        assert_eq!(
            SumopodProvider::content_from_response(&json!({"choices": [{"message": {"content": null}}]})),
            ""
        );
    }
}
