//! Balance, spending and budget-month derivations.
//!
//! Every function here is pure: it reads the snapshot it is given, keeps no
//! state between calls and never fails. Input order never matters, so
//! callers may pass transactions in whatever order the store returned them.

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use crate::models::account::Account;
use crate::models::month::BudgetMonth;
use crate::models::transaction::Transaction;

pub use crate::models::month::days_in_month;

/// Current balance of `account`: its opening balance plus the effect of
/// every transaction that references it.
///
/// `transactions` may be any superset of the account's history; entries
/// touching other accounts contribute nothing.
pub fn current_balance(account: &Account, transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .fold(account.opening_balance, |balance, t| balance + t.effect_on(account.id))
}

/// Sum of current balances over accounts that are not archived.
pub fn total_balance(accounts: &[Account], transactions: &[Transaction]) -> f64 {
    accounts
        .iter()
        .filter(|a| !a.archived)
        .map(|a| current_balance(a, transactions))
        .sum()
}

/// Expenses booked to `month` under `category_id`.
pub fn category_spending(category_id: Uuid, month: &BudgetMonth, transactions: &[Transaction]) -> f64 {
    sum_amounts(transactions.iter().filter(|t| {
        t.is_expense() && t.category_id() == Some(category_id) && t.budget_month.as_ref() == Some(month)
    }))
}

/// All expenses booked to `month`.
pub fn monthly_spending(month: &BudgetMonth, transactions: &[Transaction]) -> f64 {
    sum_amounts(
        transactions
            .iter()
            .filter(|t| t.is_expense() && t.budget_month.as_ref() == Some(month)),
    )
}

/// All income booked to `month`.
pub fn monthly_income(month: &BudgetMonth, transactions: &[Transaction]) -> f64 {
    sum_amounts(
        transactions
            .iter()
            .filter(|t| t.is_income() && t.budget_month.as_ref() == Some(month)),
    )
}

/// The budget month `date` falls into for a user whose budgeting period
/// ends on `cutoff_day`.
///
/// The cutoff is clamped to the length of the date's month, so a cutoff of
/// 31 still means "end of month" in February. Days after the cutoff belong
/// to the next calendar month.
pub fn budget_month(date: NaiveDate, cutoff_day: u32) -> BudgetMonth {
    let cutoff = cutoff_day.min(days_in_month(date.year(), date.month()));
    let calendar = BudgetMonth::from_date(date);
    if date.day() > cutoff {
        calendar.next()
    } else {
        calendar
    }
}

fn sum_amounts<'a>(transactions: impl Iterator<Item = &'a Transaction>) -> f64 {
    transactions
        .map(|t| t.amount)
        .filter(|amount| amount.is_finite())
        .sum()
}
