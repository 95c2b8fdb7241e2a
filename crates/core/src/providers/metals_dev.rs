use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::zakat::Metal;
use super::traits::MetalPriceProvider;

const BASE_URL: &str = "https://api.metals.dev/v1";
const PROVIDER: &str = "metals.dev";

/// metals.dev API provider.
///
/// - **Free tier**: 100 requests/month (no credit card required).
/// - **Requires**: API key (settings key "metals_dev").
/// - **Latest**: quoted directly in the requested currency, per troy ounce.
/// - **Historical**: `/timeseries` quotes metals in USD alongside the USD
///   value of each currency, so non-USD prices are converted through it.
pub struct MetalsDevProvider {
    client: Client,
    api_key: String,
}

impl MetalsDevProvider {
    pub fn new(api_key: String) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }

    /// metals.dev's name for a metal ("gold", "silver").
    pub fn metal_name(metal: Metal) -> &'static str {
        match metal {
            Metal::Gold => "gold",
            Metal::Silver => "silver",
        }
    }

    /// Pull a metal price out of a `/timeseries` body for `date`, converting
    /// from USD into `currency` when needed.
    pub fn price_from_timeseries(
        body: &serde_json::Value,
        metal: Metal,
        currency: &str,
        date: NaiveDate,
    ) -> Result<f64, CoreError> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let not_available = || CoreError::PriceNotAvailable {
            symbol: metal.symbol().to_string(),
            currency: currency.to_uppercase(),
            date: date_str.clone(),
        };

        let day = body
            .get("rates")
            .and_then(|r| r.get(&date_str))
            .ok_or_else(not_available)?;

        let usd_price = day
            .get("metals")
            .and_then(|m| m.get(Self::metal_name(metal)))
            .and_then(|v| v.as_f64())
            .ok_or_else(not_available)?;

        let target = currency.to_uppercase();
        if target == "USD" {
            return Ok(usd_price);
        }

        // currencies.{CODE} is the USD value of one unit of CODE
        match day
            .get("currencies")
            .and_then(|c| c.get(&target))
            .and_then(|v| v.as_f64())
        {
            Some(usd_per_unit) if usd_per_unit > 0.0 => Ok(usd_price / usd_per_unit),
            _ => Err(not_available()),
        }
    }
}

// ── metals.dev API response types ───────────────────────────────────

#[derive(Deserialize)]
struct LatestResponse {
    metals: HashMap<String, f64>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MetalPriceProvider for MetalsDevProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn supported_metals(&self) -> Vec<Metal> {
        vec![Metal::Gold, Metal::Silver]
    }

    async fn get_current_price(&self, metal: Metal, currency: &str) -> Result<f64, CoreError> {
        let url = format!("{BASE_URL}/latest");
        let target = currency.to_uppercase();

        let resp: LatestResponse = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("currency", target.as_str()),
                ("unit", "toz"),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse latest prices: {e}"),
            })?;

        resp.metals
            .get(Self::metal_name(metal))
            .copied()
            .ok_or_else(|| CoreError::PriceNotAvailable {
                symbol: metal.symbol().to_string(),
                currency: target,
                date: "latest".to_string(),
            })
    }

    async fn get_historical_price(
        &self,
        metal: Metal,
        currency: &str,
        date: NaiveDate,
    ) -> Result<f64, CoreError> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let url = format!("{BASE_URL}/timeseries");

        let body: serde_json::Value = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("start_date", date_str.as_str()),
                ("end_date", date_str.as_str()),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse timeseries response: {e}"),
            })?;

        Self::price_from_timeseries(&body, metal, currency, date)
    }
}
