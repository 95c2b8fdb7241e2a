use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::ledger::Ledger;
use crate::models::transaction::{Transaction, TransactionKind};
use super::ledger_calculator;

/// Validates and books transactions into a ledger.
///
/// Pure business logic: no I/O. Transactions are kept in date order so
/// listings and reports read them chronologically.
pub struct TransactionService;

impl TransactionService {
    pub fn new() -> Self {
        Self
    }

    /// Add a transaction after validating it against the ledger.
    ///
    /// A transaction without a budget month gets one derived from its date
    /// and the ledger's cutoff day.
    pub fn add(&self, ledger: &mut Ledger, transaction: Transaction) -> Result<Uuid, CoreError> {
        let transaction = self.prepare(ledger, transaction)?;
        let id = transaction.id;
        Self::binary_insert(&mut ledger.transactions, transaction);
        Ok(id)
    }

    /// Replace the transaction with the same id. The old version is kept
    /// if the new one fails validation.
    pub fn update(&self, ledger: &mut Ledger, transaction: Transaction) -> Result<(), CoreError> {
        let idx = ledger
            .transactions
            .iter()
            .position(|t| t.id == transaction.id)
            .ok_or_else(|| CoreError::TransactionNotFound(transaction.id.to_string()))?;

        let transaction = self.prepare(ledger, transaction)?;
        ledger.transactions.remove(idx);
        Self::binary_insert(&mut ledger.transactions, transaction);
        Ok(())
    }

    pub fn remove(&self, ledger: &mut Ledger, transaction_id: Uuid) -> Result<Transaction, CoreError> {
        let idx = ledger
            .transactions
            .iter()
            .position(|t| t.id == transaction_id)
            .ok_or_else(|| CoreError::TransactionNotFound(transaction_id.to_string()))?;
        Ok(ledger.transactions.remove(idx))
    }

    /// Check a transaction against the ledger it is about to join.
    ///
    /// - the amount is a finite, positive magnitude
    /// - every referenced account exists
    /// - a transfer moves money between two different accounts
    /// - a category, if set, exists and matches the transaction's kind
    pub fn validate(&self, ledger: &Ledger, transaction: &Transaction) -> Result<(), CoreError> {
        if !transaction.amount.is_finite() || transaction.amount <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Amount must be a positive number, got {}",
                transaction.amount
            )));
        }

        for account_id in transaction.account_ids() {
            if ledger.account(account_id).is_none() {
                return Err(CoreError::AccountNotFound(account_id.to_string()));
            }
        }

        if let TransactionKind::Transfer { from_account_id, to_account_id } = transaction.kind {
            if from_account_id == to_account_id {
                return Err(CoreError::ValidationError(
                    "Transfer source and destination must differ".into(),
                ));
            }
        }

        if let Some(category_id) = transaction.category_id() {
            let category = ledger
                .category(category_id)
                .ok_or_else(|| CoreError::CategoryNotFound(category_id.to_string()))?;
            if transaction.kind.category_type() != Some(category.category_type) {
                return Err(CoreError::ValidationError(format!(
                    "Category '{}' is an {} category and cannot be used on an {}",
                    category.name,
                    category.category_type,
                    transaction.kind.label()
                )));
            }
        }

        Ok(())
    }

    fn prepare(&self, ledger: &Ledger, mut transaction: Transaction) -> Result<Transaction, CoreError> {
        self.validate(ledger, &transaction)?;
        if transaction.budget_month.is_none() {
            transaction.budget_month = Some(ledger_calculator::budget_month(
                transaction.date,
                ledger.settings.budget_cutoff_day,
            ));
        }
        Ok(transaction)
    }

    /// Insert keeping date order; equal dates keep insertion order.
    fn binary_insert(transactions: &mut Vec<Transaction>, transaction: Transaction) {
        let pos = transactions.partition_point(|t| t.date <= transaction.date);
        transactions.insert(pos, transaction);
    }
}

impl Default for TransactionService {
    fn default() -> Self {
        Self::new()
    }
}
