use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where the money is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Bank,
    Ewallet,
    Cash,
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Bank => write!(f, "bank"),
            AccountType::Ewallet => write!(f, "ewallet"),
            AccountType::Cash => write!(f, "cash"),
        }
    }
}

/// A money account owned by the user.
///
/// **Important**: `opening_balance` is a snapshot taken when the account is
/// created. Posting transactions never changes it; the current balance is
/// always derived from the transaction history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,

    pub name: String,

    pub account_type: AccountType,

    /// ISO 4217 code, uppercased (e.g., "IDR")
    pub currency: String,

    /// Signed balance at creation time
    pub opening_balance: f64,

    #[serde(default)]
    pub archived: bool,

    #[serde(default)]
    pub account_number: Option<String>,
}

impl Account {
    pub fn new(
        name: impl Into<String>,
        account_type: AccountType,
        currency: impl Into<String>,
        opening_balance: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            account_type,
            currency: currency.into().to_uppercase(),
            opening_balance,
            archived: false,
            account_number: None,
        }
    }

    /// Attach a bank/e-wallet account number.
    #[must_use]
    pub fn with_account_number(mut self, number: impl Into<String>) -> Self {
        self.account_number = Some(number.into());
        self
    }
}
