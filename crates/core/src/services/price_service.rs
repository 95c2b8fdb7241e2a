use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::price::PriceCache;
use crate::models::zakat::{Metal, OUNCE_TO_GRAM};
use crate::providers::registry::MetalPriceRegistry;

/// Fetches metal prices from providers with caching and fallback.
///
/// Cache strategy:
/// - **Past dates**: fetch once, trust forever.
/// - **Today**: fetch at most once per day.
///
/// Providers are tried in registration order; a provider that errors or
/// returns a non-finite or negative price is skipped. When every provider
/// fails, the latest cached quote on or before the date is used instead.
pub struct PriceService {
    registry: MetalPriceRegistry,
}

impl PriceService {
    pub fn new(registry: MetalPriceRegistry) -> Self {
        Self { registry }
    }

    pub fn has_provider_for(&self, metal: Metal) -> bool {
        self.registry.get_provider_for(metal).is_some()
    }

    pub fn get_provider_names(&self, metal: Metal) -> Vec<String> {
        self.registry
            .get_providers_for(metal)
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Price of one troy ounce of `metal` in `currency` on `date`.
    pub async fn get_price_per_ounce(
        &self,
        cache: &mut PriceCache,
        metal: Metal,
        currency: &str,
        date: NaiveDate,
    ) -> Result<f64, CoreError> {
        let today = chrono::Utc::now().date_naive();

        if let Some(price) = cache.get(metal, currency, date) {
            if date < today || cache.is_fresh(metal, currency, today) {
                tracing::debug!(%metal, currency, %date, "metal price cache hit");
                return Ok(price);
            }
        }

        let price = match self.fetch_price(metal, currency, date, today).await {
            Ok(price) => price,
            Err(e) => {
                // offline: fall back to the last quote we know of
                let Some(point) = cache.latest_on_or_before(metal, currency, date) else {
                    return Err(e);
                };
                tracing::warn!(%metal, currency, %date, stale_date = %point.date, error = %e, "using cached metal price");
                return Ok(point.price);
            }
        };

        cache.insert(metal, currency, date, price);
        if date >= today {
            cache.mark_refreshed(metal, currency, today);
        }

        Ok(price)
    }

    /// Price of one gram of `metal` in `currency` on `date`.
    pub async fn get_price_per_gram(
        &self,
        cache: &mut PriceCache,
        metal: Metal,
        currency: &str,
        date: NaiveDate,
    ) -> Result<f64, CoreError> {
        let per_ounce = self.get_price_per_ounce(cache, metal, currency, date).await?;
        Ok(per_ounce / OUNCE_TO_GRAM)
    }

    async fn fetch_price(
        &self,
        metal: Metal,
        currency: &str,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<f64, CoreError> {
        let providers = self.registry.get_providers_for(metal);
        if providers.is_empty() {
            return Err(CoreError::NoProvider(metal.to_string()));
        }

        let mut last_error = None;

        for provider in &providers {
            let result = if date >= today {
                provider.get_current_price(metal, currency).await
            } else {
                provider.get_historical_price(metal, currency, date).await
            };

            match result {
                Ok(price) if price.is_finite() && price >= 0.0 => {
                    tracing::debug!(provider = provider.name(), %metal, currency, price, "metal price fetched");
                    return Ok(price);
                }
                Ok(price) => {
                    tracing::warn!(provider = provider.name(), %metal, price, "rejected invalid metal price");
                    last_error = Some(CoreError::Api {
                        provider: provider.name().to_string(),
                        message: format!(
                            "Invalid price returned for {}: {price} (must be finite and non-negative)",
                            metal.symbol()
                        ),
                    });
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "metal price provider failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::NoProvider(metal.to_string())))
    }
}
