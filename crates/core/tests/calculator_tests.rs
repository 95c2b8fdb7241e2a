// ═══════════════════════════════════════════════════════════════════
// Ledger Calculator Tests — balances, monthly aggregates, budget months
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use proptest::prelude::*;
use uuid::Uuid;

use monli_core::models::account::{Account, AccountType};
use monli_core::models::month::BudgetMonth;
use monli_core::models::transaction::Transaction;
use monli_core::services::ledger_calculator::{
    budget_month, category_spending, current_balance, days_in_month, monthly_income,
    monthly_spending, total_balance,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month(y: i32, m: u32) -> BudgetMonth {
    BudgetMonth::new(y, m).unwrap()
}

fn account(opening: f64) -> Account {
    Account::new("Main", AccountType::Bank, "IDR", opening)
}

// ── Concrete scenarios ──────────────────────────────────────────────

mod scenarios {
    use super::*;

    #[test]
    fn income_adds_to_opening_balance() {
        let acc = account(100_000.0);
        let txs = vec![Transaction::income(acc.id, 50_000.0, date(2024, 1, 10))];
        assert_eq!(current_balance(&acc, &txs), 150_000.0);
    }

    #[test]
    fn transfer_moves_money_between_accounts() {
        let a = account(0.0);
        let b = account(0.0);
        let txs = vec![Transaction::transfer(a.id, b.id, 20_000.0, date(2024, 1, 10))];
        assert_eq!(current_balance(&a, &txs), -20_000.0);
        assert_eq!(current_balance(&b, &txs), 20_000.0);
    }

    #[test]
    fn leap_day_with_end_of_month_cutoff_stays_in_february() {
        let m = budget_month(date(2024, 2, 29), 31);
        assert_eq!(m.to_string(), "2024-02");
    }

    #[test]
    fn day_after_cutoff_rolls_into_next_month() {
        let m = budget_month(date(2024, 3, 5), 1);
        assert_eq!(m.to_string(), "2024-04");
    }
}

// ── current_balance ─────────────────────────────────────────────────

mod balance {
    use super::*;

    #[test]
    fn empty_history_is_opening_balance() {
        let acc = account(12_345.0);
        assert_eq!(current_balance(&acc, &[]), 12_345.0);
    }

    #[test]
    fn negative_opening_balance_is_kept() {
        let acc = account(-500.0);
        let txs = vec![Transaction::income(acc.id, 200.0, date(2024, 5, 1))];
        assert_eq!(current_balance(&acc, &txs), -300.0);
    }

    #[test]
    fn expense_subtracts() {
        let acc = account(1_000.0);
        let txs = vec![Transaction::expense(acc.id, 250.0, date(2024, 5, 1))];
        assert_eq!(current_balance(&acc, &txs), 750.0);
    }

    #[test]
    fn transactions_on_other_accounts_are_ignored() {
        let acc = account(1_000.0);
        let other = Uuid::new_v4();
        let txs = vec![
            Transaction::income(other, 999.0, date(2024, 5, 1)),
            Transaction::expense(other, 111.0, date(2024, 5, 2)),
        ];
        assert_eq!(current_balance(&acc, &txs), 1_000.0);
    }

    #[test]
    fn self_transfer_debits_once() {
        let acc = account(1_000.0);
        let txs = vec![Transaction::transfer(acc.id, acc.id, 400.0, date(2024, 5, 1))];
        assert_eq!(current_balance(&acc, &txs), 600.0);
    }

    #[test]
    fn non_finite_amounts_contribute_nothing() {
        let acc = account(1_000.0);
        let txs = vec![
            Transaction::income(acc.id, f64::NAN, date(2024, 5, 1)),
            Transaction::expense(acc.id, f64::INFINITY, date(2024, 5, 2)),
            Transaction::income(acc.id, 10.0, date(2024, 5, 3)),
        ];
        assert_eq!(current_balance(&acc, &txs), 1_010.0);
    }

    #[test]
    fn mixed_history() {
        let acc = account(100.0);
        let other = account(0.0);
        let txs = vec![
            Transaction::income(acc.id, 1_000.0, date(2024, 1, 1)),
            Transaction::expense(acc.id, 300.0, date(2024, 1, 2)),
            Transaction::transfer(acc.id, other.id, 200.0, date(2024, 1, 3)),
            Transaction::transfer(other.id, acc.id, 50.0, date(2024, 1, 4)),
        ];
        assert_eq!(current_balance(&acc, &txs), 650.0);
        assert_eq!(current_balance(&other, &txs), 150.0);
    }
}

mod total {
    use super::*;

    #[test]
    fn archived_accounts_are_excluded() {
        let a = account(100.0);
        let mut b = account(50.0);
        b.archived = true;
        let txs = vec![Transaction::income(b.id, 1_000.0, date(2024, 1, 1))];
        assert_eq!(total_balance(&[a, b], &txs), 100.0);
    }

    #[test]
    fn internal_transfers_do_not_change_total() {
        let a = account(100.0);
        let b = account(50.0);
        let txs = vec![Transaction::transfer(a.id, b.id, 75.0, date(2024, 1, 1))];
        assert_eq!(total_balance(&[a, b], &txs), 150.0);
    }

    #[test]
    fn no_accounts_is_zero() {
        assert_eq!(total_balance(&[], &[]), 0.0);
    }
}

// ── Monthly aggregates ──────────────────────────────────────────────

mod monthly {
    use super::*;

    #[test]
    fn spending_sums_expenses_of_the_budget_month_only() {
        let acc = Uuid::new_v4();
        let jan = month(2024, 1);
        let txs = vec![
            Transaction::expense(acc, 100.0, date(2024, 1, 5)).with_budget_month(jan),
            Transaction::expense(acc, 50.0, date(2024, 1, 31)).with_budget_month(month(2024, 2)),
            Transaction::income(acc, 999.0, date(2024, 1, 6)).with_budget_month(jan),
            Transaction::expense(acc, 25.0, date(2024, 1, 7)).with_budget_month(jan),
        ];
        assert_eq!(monthly_spending(&jan, &txs), 125.0);
        assert_eq!(monthly_income(&jan, &txs), 999.0);
    }

    #[test]
    fn budget_month_wins_over_calendar_date() {
        let acc = Uuid::new_v4();
        let feb = month(2024, 2);
        let txs = vec![Transaction::expense(acc, 80.0, date(2024, 1, 28)).with_budget_month(feb)];
        assert_eq!(monthly_spending(&feb, &txs), 80.0);
        assert_eq!(monthly_spending(&month(2024, 1), &txs), 0.0);
    }

    #[test]
    fn transactions_without_budget_month_never_match() {
        let acc = Uuid::new_v4();
        let txs = vec![Transaction::expense(acc, 80.0, date(2024, 1, 28))];
        assert_eq!(monthly_spending(&month(2024, 1), &txs), 0.0);
    }

    #[test]
    fn transfers_are_neither_spending_nor_income() {
        let jan = month(2024, 1);
        let txs = vec![Transaction::transfer(Uuid::new_v4(), Uuid::new_v4(), 500.0, date(2024, 1, 3))
            .with_budget_month(jan)];
        assert_eq!(monthly_spending(&jan, &txs), 0.0);
        assert_eq!(monthly_income(&jan, &txs), 0.0);
    }

    #[test]
    fn category_spending_filters_by_category() {
        let acc = Uuid::new_v4();
        let food = Uuid::new_v4();
        let rent = Uuid::new_v4();
        let jan = month(2024, 1);
        let txs = vec![
            Transaction::expense(acc, 30.0, date(2024, 1, 2)).with_category(food).with_budget_month(jan),
            Transaction::expense(acc, 20.0, date(2024, 1, 3)).with_category(food).with_budget_month(jan),
            Transaction::expense(acc, 700.0, date(2024, 1, 1)).with_category(rent).with_budget_month(jan),
            Transaction::expense(acc, 5.0, date(2024, 1, 4)).with_budget_month(jan),
            Transaction::income(acc, 40.0, date(2024, 1, 4)).with_category(food).with_budget_month(jan),
        ];
        assert_eq!(category_spending(food, &jan, &txs), 50.0);
        assert_eq!(category_spending(rent, &jan, &txs), 700.0);
        assert_eq!(category_spending(Uuid::new_v4(), &jan, &txs), 0.0);
    }

    #[test]
    fn non_finite_amounts_are_skipped() {
        let acc = Uuid::new_v4();
        let jan = month(2024, 1);
        let txs = vec![
            Transaction::expense(acc, f64::NAN, date(2024, 1, 2)).with_budget_month(jan),
            Transaction::expense(acc, 12.5, date(2024, 1, 3)).with_budget_month(jan),
        ];
        assert_eq!(monthly_spending(&jan, &txs), 12.5);
    }
}

// ── budget_month ────────────────────────────────────────────────────

mod budget_months {
    use super::*;

    #[test]
    fn end_of_month_cutoff_matches_calendar_month() {
        assert_eq!(budget_month(date(2023, 2, 28), 31), month(2023, 2));
        assert_eq!(budget_month(date(2024, 4, 30), 31), month(2024, 4));
        assert_eq!(budget_month(date(2024, 1, 31), 31), month(2024, 1));
    }

    #[test]
    fn cutoff_day_itself_stays_in_month() {
        assert_eq!(budget_month(date(2024, 6, 25), 25), month(2024, 6));
        assert_eq!(budget_month(date(2024, 6, 26), 25), month(2024, 7));
    }

    #[test]
    fn december_rolls_into_next_year() {
        assert_eq!(budget_month(date(2024, 12, 20), 15), month(2025, 1));
    }

    #[test]
    fn cutoff_clamps_to_short_months() {
        // 30 > 28 days in Feb 2023, so the whole of February stays put
        assert_eq!(budget_month(date(2023, 2, 28), 30), month(2023, 2));
    }

    #[test]
    fn days_in_month_follows_gregorian_rule() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 12), 31);
    }
}

// ── Properties ──────────────────────────────────────────────────────

/// Whole amounts keep f64 sums exact, so reordering cannot drift.
fn amount_strategy() -> impl Strategy<Value = f64> {
    (1i64..1_000_000i64).prop_map(|n| n as f64)
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=31)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d.min(days_in_month(y, m))).unwrap())
}

const ACCOUNT_A: Uuid = Uuid::from_u128(0xA);
const ACCOUNT_B: Uuid = Uuid::from_u128(0xB);

/// Transactions over a fixed pair of accounts.
fn transactions_strategy(a: Uuid, b: Uuid) -> impl Strategy<Value = Vec<Transaction>> {
    let one = (0u8..4, amount_strategy()).prop_map(move |(kind, amount)| {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        match kind {
            0 => Transaction::income(a, amount, d),
            1 => Transaction::expense(a, amount, d),
            2 => Transaction::transfer(a, b, amount, d),
            _ => Transaction::transfer(b, a, amount, d),
        }
    });
    prop::collection::vec(one, 0..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_empty_history_is_opening_balance(opening in -1_000_000i64..1_000_000i64) {
        let acc = account(opening as f64);
        prop_assert_eq!(current_balance(&acc, &[]), opening as f64);
    }

    #[test]
    fn prop_balance_is_order_independent(
        (txs, shuffled) in transactions_strategy(ACCOUNT_A, ACCOUNT_B)
            .prop_flat_map(|txs| (Just(txs.clone()), Just(txs).prop_shuffle()))
    ) {
        let mut acc = account(1_000.0);
        acc.id = ACCOUNT_A;
        prop_assert_eq!(current_balance(&acc, &txs), current_balance(&acc, &shuffled));
    }

    #[test]
    fn prop_transfer_nets_to_zero(
        opening_a in -1_000_000i64..1_000_000i64,
        opening_b in -1_000_000i64..1_000_000i64,
        amount in amount_strategy(),
    ) {
        let a = account(opening_a as f64);
        let b = account(opening_b as f64);
        let before = current_balance(&a, &[]) + current_balance(&b, &[]);
        let txs = vec![Transaction::transfer(a.id, b.id, amount, date(2024, 1, 1))];
        let after = current_balance(&a, &txs) + current_balance(&b, &txs);
        prop_assert_eq!(before, after);
    }

    #[test]
    fn prop_budget_month_is_idempotent(d in date_strategy(), cutoff in 1u32..=31) {
        prop_assert_eq!(budget_month(d, cutoff), budget_month(d, cutoff));
    }

    #[test]
    fn prop_budget_month_is_same_or_next_calendar_month(d in date_strategy(), cutoff in 1u32..=31) {
        let calendar = BudgetMonth::from_date(d);
        let m = budget_month(d, cutoff);
        prop_assert!(m == calendar || m == calendar.next());
    }
}
