use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::zakat::Metal;
use super::traits::MetalPriceProvider;

const BASE_URL: &str = "https://api.metalpriceapi.com/v1";
const PROVIDER: &str = "metalpriceapi";

/// metalpriceapi.com provider.
///
/// - **Requires**: API key (settings key "metalpriceapi").
/// - **Coverage**: gold (XAU) and silver (XAG), quoted directly in any
///   base currency, including IDR.
/// - **Endpoints**: `/latest`, `/{YYYY-MM-DD}`
///
/// Responses carry a `rates` map; with `base=IDR`, `rates.IDRXAU` is the
/// price of one troy ounce of gold in rupiah and `rates.XAU` its inverse.
pub struct MetalpriceApiProvider {
    client: Client,
    api_key: String,
}

impl MetalpriceApiProvider {
    pub fn new(api_key: String) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }

    /// Key of the direct quote in the `rates` map, e.g. `"IDRXAU"`.
    pub fn rate_key(metal: Metal, currency: &str) -> String {
        format!("{}{}", currency.to_uppercase(), metal.symbol())
    }

    /// Extract the per-ounce price of `metal` from a response body.
    ///
    /// Prefers the direct `{CURRENCY}{SYMBOL}` quote and falls back to
    /// inverting the `{SYMBOL}` rate.
    pub fn price_from_response(
        body: &serde_json::Value,
        metal: Metal,
        currency: &str,
        date_label: &str,
    ) -> Result<f64, CoreError> {
        if body.get("success").and_then(|v| v.as_bool()) == Some(false) {
            let message = body
                .pointer("/error/info")
                .or_else(|| body.pointer("/error/message"))
                .and_then(|v| v.as_str())
                .unwrap_or("request rejected");
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: message.to_string(),
            });
        }

        let rates = body.get("rates").ok_or_else(|| CoreError::Api {
            provider: PROVIDER.into(),
            message: "Response has no 'rates' field".into(),
        })?;

        if let Some(direct) = rates
            .get(Self::rate_key(metal, currency))
            .and_then(|v| v.as_f64())
        {
            return Ok(direct);
        }

        match rates.get(metal.symbol()).and_then(|v| v.as_f64()) {
            Some(inverse) if inverse > 0.0 => Ok(1.0 / inverse),
            _ => Err(CoreError::PriceNotAvailable {
                symbol: metal.symbol().to_string(),
                currency: currency.to_uppercase(),
                date: date_label.to_string(),
            }),
        }
    }

    async fn fetch(&self, path: &str, metal: Metal, currency: &str) -> Result<serde_json::Value, CoreError> {
        let url = format!("{BASE_URL}/{path}");
        let base = currency.to_uppercase();

        self.client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("base", base.as_str()),
                ("currencies", metal.symbol()),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse response: {e}"),
            })
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MetalPriceProvider for MetalpriceApiProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn supported_metals(&self) -> Vec<Metal> {
        vec![Metal::Gold, Metal::Silver]
    }

    async fn get_current_price(&self, metal: Metal, currency: &str) -> Result<f64, CoreError> {
        let body = self.fetch("latest", metal, currency).await?;
        Self::price_from_response(&body, metal, currency, "latest")
    }

    async fn get_historical_price(
        &self,
        metal: Metal,
        currency: &str,
        date: NaiveDate,
    ) -> Result<f64, CoreError> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let body = self.fetch(&date_str, metal, currency).await?;
        Self::price_from_response(&body, metal, currency, &date_str)
    }
}
