use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::zakat::Metal;

/// A source of precious-metal quotes.
///
/// Each feed (metalpriceapi.com, metals.dev) implements this trait; the
/// registry picks among them and falls back when one fails. All prices are
/// per troy ounce in the requested currency.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MetalPriceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Which metals this provider quotes.
    fn supported_metals(&self) -> Vec<Metal>;

    /// Latest price of one troy ounce of `metal` in `currency`.
    async fn get_current_price(&self, metal: Metal, currency: &str) -> Result<f64, CoreError>;

    /// Price of one troy ounce of `metal` in `currency` on `date`.
    async fn get_historical_price(
        &self,
        metal: Metal,
        currency: &str,
        date: NaiveDate,
    ) -> Result<f64, CoreError>;
}
