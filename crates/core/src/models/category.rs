use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a category groups spending or earnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Expense,
    Income,
}

impl std::fmt::Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryType::Expense => write!(f, "expense"),
            CategoryType::Income => write!(f, "income"),
        }
    }
}

/// A user-defined category. Name, color and icon are display attributes
/// only; calculations match on `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub category_type: CategoryType,
    /// CSS color, e.g. "#ef4444"
    pub color: String,
    pub icon: String,
}

impl Category {
    pub fn new(
        name: impl Into<String>,
        category_type: CategoryType,
        color: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category_type,
            color: color.into(),
            icon: icon.into(),
        }
    }

    pub fn expense(name: impl Into<String>) -> Self {
        Self::new(name, CategoryType::Expense, "#64748b", "tag")
    }

    pub fn income(name: impl Into<String>) -> Self {
        Self::new(name, CategoryType::Income, "#22c55e", "wallet")
    }
}
