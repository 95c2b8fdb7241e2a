use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::price::PriceCache;
use crate::models::zakat::{Metal, ZakatAssessment, ZakatReport, ZAKAT_RATE};
use super::price_service::PriceService;

/// Nisab threshold in money: `price_per_gram * threshold_grams`.
///
/// Returns 0 when either input is NaN or infinite, so a broken price feed
/// never yields an infinite threshold.
pub fn calc_nisab(price_per_gram: f64, threshold_grams: f64) -> f64 {
    let price = if price_per_gram.is_finite() { price_per_gram } else { 0.0 };
    let grams = if threshold_grams.is_finite() { threshold_grams } else { 0.0 };
    price * grams
}

/// [`calc_zakat_with_rate`] at the standard 2.5% rate.
pub fn calc_zakat(zakatable: f64, nisab: f64) -> ZakatAssessment {
    calc_zakat_with_rate(zakatable, nisab, ZAKAT_RATE)
}

/// Whether zakat is due on `zakatable` wealth and how much.
///
/// Non-finite inputs are substituted rather than rejected:
/// - `zakatable` falls back to 0,
/// - `nisab` falls back to +∞ so obligation can never trigger from a bad
///   threshold,
/// - `rate` falls back to [`ZAKAT_RATE`].
///
/// The threshold is inclusive: wealth exactly at the nisab is obligatory.
pub fn calc_zakat_with_rate(zakatable: f64, nisab: f64, rate: f64) -> ZakatAssessment {
    let base = if zakatable.is_finite() { zakatable } else { 0.0 };
    let threshold = if nisab.is_finite() { nisab } else { f64::INFINITY };
    let rate = if rate.is_finite() { rate } else { ZAKAT_RATE };

    let obligatory = base >= threshold;
    let amount = if obligatory { base * rate } else { 0.0 };
    ZakatAssessment { obligatory, amount }
}

/// Produces zakat reports from live or cached metal prices.
pub struct ZakatService;

impl ZakatService {
    pub fn new() -> Self {
        Self
    }

    /// Assess `zakatable` against the nisab of `metal`, priced in `currency`
    /// on `date`.
    pub async fn assess(
        &self,
        price_service: &PriceService,
        cache: &mut PriceCache,
        metal: Metal,
        zakatable: f64,
        currency: &str,
        date: NaiveDate,
    ) -> Result<ZakatReport, CoreError> {
        let price_per_gram = price_service
            .get_price_per_gram(cache, metal, currency, date)
            .await?;
        Ok(self.assess_with_price(metal, price_per_gram, zakatable, currency))
    }

    /// Assess against an already known price per gram.
    pub fn assess_with_price(
        &self,
        metal: Metal,
        price_per_gram: f64,
        zakatable: f64,
        currency: &str,
    ) -> ZakatReport {
        let nisab = calc_nisab(price_per_gram, metal.nisab_grams());
        let assessment = calc_zakat(zakatable, nisab);
        tracing::debug!(
            %metal,
            nisab,
            obligatory = assessment.obligatory,
            "zakat assessed"
        );
        ZakatReport {
            metal,
            currency: currency.to_uppercase(),
            price_per_gram,
            nisab,
            zakatable,
            assessment,
        }
    }
}

impl Default for ZakatService {
    fn default() -> Self {
        Self::new()
    }
}
