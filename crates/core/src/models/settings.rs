use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::plan::Plan;

/// Cutoff day that makes budget months match calendar months.
pub const DEFAULT_CUTOFF_DAY: u32 = 31;

/// User-configurable settings, carried inside the ledger snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// The currency reports and zakat estimates are shown in (e.g., "IDR").
    pub default_currency: String,

    /// Day of month (1–31) after which transactions roll into the next
    /// budget month.
    #[serde(default = "default_cutoff_day")]
    pub budget_cutoff_day: u32,

    #[serde(default)]
    pub plan: Plan,

    #[serde(default)]
    pub onboarding_completed: bool,

    /// Optional API keys for providers that require them.
    /// Keys: provider name (e.g., "metalpriceapi", "metals_dev").
    #[serde(default)]
    pub api_keys: HashMap<String, String>,
}

fn default_cutoff_day() -> u32 {
    DEFAULT_CUTOFF_DAY
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_currency: "IDR".to_string(),
            budget_cutoff_day: DEFAULT_CUTOFF_DAY,
            plan: Plan::Free,
            onboarding_completed: false,
            api_keys: HashMap::new(),
        }
    }
}
