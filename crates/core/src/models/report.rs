use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::month::BudgetMonth;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardKpis {
    pub month: BudgetMonth,

    /// Sum of current balances over non-archived accounts
    pub total_balance: f64,

    /// Income booked to `month`
    pub monthly_income: f64,

    /// Expenses booked to `month`
    pub monthly_expenses: f64,

    /// monthly_income - monthly_expenses
    pub savings: f64,
}

/// Current balance of a single account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub account_id: Uuid,
    pub name: String,
    pub currency: String,
    pub archived: bool,
    pub balance: f64,
}

/// Spending of one expense category against its budget lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub category_id: Uuid,
    pub category_name: String,
    pub color: String,
    /// Expenses in this category for the month
    pub amount: f64,
    /// Planned amount across the month's budget items for this category
    pub budgeted: f64,
}

/// Traffic-light status of a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressLevel {
    /// Under 70% used
    OnTrack,
    /// 70% to 100% used
    Warning,
    /// Overspent
    Over,
}

impl ProgressLevel {
    pub fn from_pct(pct: f64) -> Self {
        if pct < 70.0 {
            ProgressLevel::OnTrack
        } else if pct <= 100.0 {
            ProgressLevel::Warning
        } else {
            ProgressLevel::Over
        }
    }
}

/// Planned vs. actual for a whole budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetProgress {
    pub budget_id: Uuid,
    pub month: BudgetMonth,
    pub planned: f64,
    pub actual: f64,
    pub progress_pct: f64,
    pub level: ProgressLevel,
}

/// Planned vs. actual for one budget line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetItemProgress {
    pub item_id: Uuid,
    pub category_id: Uuid,
    pub planned: f64,
    pub actual: f64,
    /// planned - actual; negative when overspent
    pub remaining: f64,
    pub rollover: bool,
}
