use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::month::BudgetMonth;

/// A planned amount for one category within a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetItem {
    pub id: Uuid,
    pub category_id: Uuid,
    pub amount: f64,
    /// Carry the unspent remainder into the next month
    #[serde(default)]
    pub rollover: bool,
}

impl BudgetItem {
    pub fn new(category_id: Uuid, amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            amount,
            rollover: false,
        }
    }

    #[must_use]
    pub fn with_rollover(mut self, rollover: bool) -> Self {
        self.rollover = rollover;
        self
    }
}

/// A monthly spending plan.
///
/// Budgets never store what was actually spent; realized spending is
/// derived from the transactions of the same budget month on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub month: BudgetMonth,
    pub total_amount: f64,
    /// Per-category lines, in display order
    #[serde(default)]
    pub items: Vec<BudgetItem>,
}

impl Budget {
    pub fn new(month: BudgetMonth, total_amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            month,
            total_amount,
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_item(mut self, item: BudgetItem) -> Self {
        self.items.push(item);
        self
    }

    /// Sum of planned amounts across items for `category_id`.
    pub fn planned_for(&self, category_id: Uuid) -> f64 {
        self.items
            .iter()
            .filter(|i| i.category_id == category_id)
            .map(|i| i.amount)
            .sum()
    }
}
