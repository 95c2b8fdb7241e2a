use serde::{Deserialize, Serialize};

/// Maximum number of logged chat requests per user.
pub const CHAT_USAGE_LIMIT: u32 = 10;

/// Maximum number of budgets on the free plan.
pub const FREE_BUDGET_LIMIT: usize = 2;

/// Maximum number of accounts on the free plan.
pub const FREE_ACCOUNT_LIMIT: usize = 1;

/// Subscription tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Plan {
    #[default]
    Free,
    Pro,
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Plan::Free => write!(f, "FREE"),
            Plan::Pro => write!(f, "PRO"),
        }
    }
}

/// What a plan unlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLimits {
    /// `None` means unlimited
    pub max_budgets: Option<usize>,
    pub max_accounts: Option<usize>,
    pub receipt_ocr: bool,
    pub budget_detail: bool,
    pub chat_requests: u32,
}

impl Plan {
    pub fn limits(&self) -> PlanLimits {
        match self {
            Plan::Free => PlanLimits {
                max_budgets: Some(FREE_BUDGET_LIMIT),
                max_accounts: Some(FREE_ACCOUNT_LIMIT),
                receipt_ocr: false,
                budget_detail: false,
                chat_requests: CHAT_USAGE_LIMIT,
            },
            Plan::Pro => PlanLimits {
                max_budgets: None,
                max_accounts: None,
                receipt_ocr: true,
                budget_detail: true,
                chat_requests: CHAT_USAGE_LIMIT,
            },
        }
    }

    /// Whether one more budget may be created when `existing` already exist.
    pub fn can_add_budget(&self, existing: usize) -> bool {
        self.limits().max_budgets.map_or(true, |max| existing < max)
    }

    /// Whether one more account may be opened when `existing` already exist.
    pub fn can_add_account(&self, existing: usize) -> bool {
        self.limits().max_accounts.map_or(true, |max| existing < max)
    }
}

/// AI-backed features whose usage is logged per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiFeature {
    Ocr,
    Chat,
}

impl AiFeature {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiFeature::Ocr => "ocr",
            AiFeature::Chat => "chat",
        }
    }
}

impl std::fmt::Display for AiFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
