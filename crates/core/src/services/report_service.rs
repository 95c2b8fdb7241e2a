use std::collections::HashSet;

use crate::models::budget::Budget;
use crate::models::category::CategoryType;
use crate::models::ledger::Ledger;
use crate::models::month::BudgetMonth;
use crate::models::report::{
    AccountBalance, BudgetItemProgress, BudgetProgress, CategorySpend, DashboardKpis, ProgressLevel,
};
use crate::models::transaction::Transaction;
use super::ledger_calculator;

/// Dashboard and budget reports derived from a ledger snapshot.
///
/// Pure business logic: every figure comes from the ledger calculator.
pub struct ReportService;

impl ReportService {
    pub fn new() -> Self {
        Self
    }

    /// Total balance plus income, expenses and savings for `month`.
    pub fn dashboard_kpis(&self, ledger: &Ledger, month: BudgetMonth) -> DashboardKpis {
        let transactions = &ledger.transactions;
        let monthly_income = ledger_calculator::monthly_income(&month, transactions);
        let monthly_expenses = ledger_calculator::monthly_spending(&month, transactions);

        DashboardKpis {
            month,
            total_balance: ledger_calculator::total_balance(&ledger.accounts, transactions),
            monthly_income,
            monthly_expenses,
            savings: monthly_income - monthly_expenses,
        }
    }

    /// Current balance of each account, in ledger order.
    pub fn account_balances(&self, ledger: &Ledger, include_archived: bool) -> Vec<AccountBalance> {
        ledger
            .accounts
            .iter()
            .filter(|a| include_archived || !a.archived)
            .map(|a| AccountBalance {
                account_id: a.id,
                name: a.name.clone(),
                currency: a.currency.clone(),
                archived: a.archived,
                balance: ledger_calculator::current_balance(a, &ledger.transactions),
            })
            .collect()
    }

    /// Spending per expense category for `month`, against what the month's
    /// budgets planned for it.
    ///
    /// Categories with neither spending nor a budget line are omitted.
    /// Sorted by amount (largest first), then by name.
    pub fn category_spend(&self, ledger: &Ledger, month: BudgetMonth) -> Vec<CategorySpend> {
        let month_budgets: Vec<&Budget> = ledger.budgets.iter().filter(|b| b.month == month).collect();
        let budgeted_categories: HashSet<_> = month_budgets
            .iter()
            .flat_map(|b| b.items.iter().map(|i| i.category_id))
            .collect();

        let mut rows: Vec<CategorySpend> = ledger
            .categories
            .iter()
            .filter(|c| c.category_type == CategoryType::Expense)
            .filter_map(|c| {
                let amount = ledger_calculator::category_spending(c.id, &month, &ledger.transactions);
                let budgeted: f64 = month_budgets.iter().map(|b| b.planned_for(c.id)).sum();
                if amount == 0.0 && !budgeted_categories.contains(&c.id) {
                    return None;
                }
                Some(CategorySpend {
                    category_id: c.id,
                    category_name: c.name.clone(),
                    color: c.color.clone(),
                    amount,
                    budgeted,
                })
            })
            .collect();

        rows.sort_by(|a, b| {
            b.amount
                .partial_cmp(&a.amount)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.category_name.cmp(&b.category_name))
        });
        rows
    }

    /// Planned vs. actual for a budget. Actual is every expense booked to
    /// the budget's month.
    pub fn budget_progress(&self, budget: &Budget, transactions: &[Transaction]) -> BudgetProgress {
        let planned = budget.total_amount;
        let actual = ledger_calculator::monthly_spending(&budget.month, transactions);
        let progress_pct = if planned != 0.0 && planned.is_finite() {
            actual / planned * 100.0
        } else {
            0.0
        };

        BudgetProgress {
            budget_id: budget.id,
            month: budget.month,
            planned,
            actual,
            progress_pct,
            level: ProgressLevel::from_pct(progress_pct),
        }
    }

    /// Planned vs. actual for each budget line, in item order.
    pub fn budget_item_progress(&self, budget: &Budget, transactions: &[Transaction]) -> Vec<BudgetItemProgress> {
        budget
            .items
            .iter()
            .map(|item| {
                let actual = ledger_calculator::category_spending(item.category_id, &budget.month, transactions);
                BudgetItemProgress {
                    item_id: item.id,
                    category_id: item.category_id,
                    planned: item.amount,
                    actual,
                    remaining: item.amount - actual,
                    rollover: item.rollover,
                }
            })
            .collect()
    }
}

impl Default for ReportService {
    fn default() -> Self {
        Self::new()
    }
}
