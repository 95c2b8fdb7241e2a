use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::Account;
use super::budget::Budget;
use super::category::Category;
use super::settings::Settings;
use super::transaction::Transaction;

/// One user's data as handed over by the persistence layer.
///
/// Everything the calculator and report functions read comes from a
/// snapshot like this; they never mutate it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub accounts: Vec<Account>,

    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub transactions: Vec<Transaction>,

    #[serde(default)]
    pub budgets: Vec<Budget>,

    #[serde(default)]
    pub settings: Settings,
}

impl Ledger {
    pub fn account(&self, id: Uuid) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn budget(&self, id: Uuid) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.id == id)
    }
}
