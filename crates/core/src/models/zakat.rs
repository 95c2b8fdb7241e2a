use serde::{Deserialize, Serialize};

/// Grams per troy ounce; metal feeds quote per ounce.
pub const OUNCE_TO_GRAM: f64 = 31.1034768;

/// Standard zakat rate (2.5%).
pub const ZAKAT_RATE: f64 = 0.025;

/// Nisab expressed as grams of gold.
pub const GOLD_NISAB_GRAMS: f64 = 85.0;

/// Nisab expressed as grams of silver.
pub const SILVER_NISAB_GRAMS: f64 = 595.0;

/// The metal a nisab threshold is pegged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metal {
    Gold,
    Silver,
}

impl Metal {
    /// ISO 4217 commodity code used by price feeds.
    pub fn symbol(&self) -> &'static str {
        match self {
            Metal::Gold => "XAU",
            Metal::Silver => "XAG",
        }
    }

    pub fn nisab_grams(&self) -> f64 {
        match self {
            Metal::Gold => GOLD_NISAB_GRAMS,
            Metal::Silver => SILVER_NISAB_GRAMS,
        }
    }
}

impl std::fmt::Display for Metal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metal::Gold => write!(f, "gold"),
            Metal::Silver => write!(f, "silver"),
        }
    }
}

/// Outcome of a zakat calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZakatAssessment {
    pub obligatory: bool,
    pub amount: f64,
}

/// A zakat assessment together with the price data it was based on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZakatReport {
    pub metal: Metal,
    pub currency: String,
    pub price_per_gram: f64,
    pub nisab: f64,
    pub zakatable: f64,
    pub assessment: ZakatAssessment,
}
