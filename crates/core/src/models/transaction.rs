use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::CategoryType;
use super::month::BudgetMonth;

/// What a transaction does, carrying only the references meaningful to it.
///
/// Serialized with a `"type"` tag: `"expense"`, `"income"` or `"transfer"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money leaving `account_id`
    Expense {
        account_id: Uuid,
        #[serde(default)]
        category_id: Option<Uuid>,
    },
    /// Money arriving in `account_id`
    Income {
        account_id: Uuid,
        #[serde(default)]
        category_id: Option<Uuid>,
    },
    /// Money moving between two of the user's accounts
    Transfer {
        from_account_id: Uuid,
        to_account_id: Uuid,
    },
}

impl TransactionKind {
    /// Short lowercase label, matching the serialized tag.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Expense { .. } => "expense",
            TransactionKind::Income { .. } => "income",
            TransactionKind::Transfer { .. } => "transfer",
        }
    }

    /// The category type a category on this kind must have, if any.
    pub fn category_type(&self) -> Option<CategoryType> {
        match self {
            TransactionKind::Expense { .. } => Some(CategoryType::Expense),
            TransactionKind::Income { .. } => Some(CategoryType::Income),
            TransactionKind::Transfer { .. } => None,
        }
    }
}

/// A single posted transaction.
///
/// `amount` is always a non-negative magnitude; the direction comes from
/// the kind and from which account a transfer names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,

    #[serde(flatten)]
    pub kind: TransactionKind,

    pub amount: f64,

    /// Calendar date the money moved
    pub date: NaiveDate,

    /// Budgeting period this transaction counts toward. Transactions
    /// without one never match month-scoped aggregates.
    #[serde(default)]
    pub budget_month: Option<BudgetMonth>,

    #[serde(default)]
    pub note: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl Transaction {
    pub fn new(kind: TransactionKind, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            date,
            budget_month: None,
            note: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn expense(account_id: Uuid, amount: f64, date: NaiveDate) -> Self {
        Self::new(
            TransactionKind::Expense { account_id, category_id: None },
            amount,
            date,
        )
    }

    pub fn income(account_id: Uuid, amount: f64, date: NaiveDate) -> Self {
        Self::new(
            TransactionKind::Income { account_id, category_id: None },
            amount,
            date,
        )
    }

    pub fn transfer(from_account_id: Uuid, to_account_id: Uuid, amount: f64, date: NaiveDate) -> Self {
        Self::new(
            TransactionKind::Transfer { from_account_id, to_account_id },
            amount,
            date,
        )
    }

    /// Set the category. Ignored for transfers, which carry none.
    #[must_use]
    pub fn with_category(mut self, category: Uuid) -> Self {
        match &mut self.kind {
            TransactionKind::Expense { category_id, .. }
            | TransactionKind::Income { category_id, .. } => *category_id = Some(category),
            TransactionKind::Transfer { .. } => {}
        }
        self
    }

    #[must_use]
    pub fn with_budget_month(mut self, month: BudgetMonth) -> Self {
        self.budget_month = Some(month);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn category_id(&self) -> Option<Uuid> {
        match self.kind {
            TransactionKind::Expense { category_id, .. }
            | TransactionKind::Income { category_id, .. } => category_id,
            TransactionKind::Transfer { .. } => None,
        }
    }

    pub fn is_expense(&self) -> bool {
        matches!(self.kind, TransactionKind::Expense { .. })
    }

    pub fn is_income(&self) -> bool {
        matches!(self.kind, TransactionKind::Income { .. })
    }

    /// Every account this transaction touches (one for expense/income,
    /// two for a transfer).
    pub fn account_ids(&self) -> Vec<Uuid> {
        match self.kind {
            TransactionKind::Expense { account_id, .. }
            | TransactionKind::Income { account_id, .. } => vec![account_id],
            TransactionKind::Transfer { from_account_id, to_account_id } => {
                vec![from_account_id, to_account_id]
            }
        }
    }

    pub fn involves_account(&self, account_id: Uuid) -> bool {
        self.account_ids().contains(&account_id)
    }

    /// Signed change this transaction applies to `account_id`'s balance.
    ///
    /// The outgoing side of a transfer wins, so a transfer naming the same
    /// account on both sides debits it once.
    /// Non-finite amounts are treated as malformed and contribute nothing.
    pub fn effect_on(&self, account_id: Uuid) -> f64 {
        if !self.amount.is_finite() {
            return 0.0;
        }
        match self.kind {
            TransactionKind::Income { account_id: acc, .. } if acc == account_id => self.amount,
            TransactionKind::Expense { account_id: acc, .. } if acc == account_id => -self.amount,
            TransactionKind::Transfer { from_account_id, .. } if from_account_id == account_id => -self.amount,
            TransactionKind::Transfer { to_account_id, .. } if to_account_id == account_id => self.amount,
            _ => 0.0,
        }
    }
}
