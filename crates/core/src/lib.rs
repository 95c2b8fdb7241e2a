pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::NaiveDate;
use models::{
    account::Account,
    budget::Budget,
    category::{Category, CategoryType},
    chat::ChatContext,
    ledger::Ledger,
    month::BudgetMonth,
    plan::Plan,
    price::PriceCache,
    receipt::{ReceiptImage, ReceiptScan},
    report::{AccountBalance, BudgetItemProgress, BudgetProgress, CategorySpend, DashboardKpis},
    settings::Settings,
    transaction::Transaction,
    zakat::{Metal, ZakatReport},
};
use providers::registry::MetalPriceRegistry;
use services::{
    assistant_service::AssistantService, ledger_calculator, price_service::PriceService,
    report_service::ReportService, transaction_service::TransactionService,
    zakat_service::ZakatService,
};
use uuid::Uuid;

use errors::CoreError;

/// Main entry point for the Monli core library.
/// Holds one user's ledger and the services that operate on it.
#[must_use]
pub struct Monli {
    ledger: Ledger,
    transaction_service: TransactionService,
    report_service: ReportService,
    price_service: PriceService,
    zakat_service: ZakatService,
    /// Metal prices fetched this session; not part of the ledger snapshot.
    price_cache: PriceCache,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for Monli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monli")
            .field("accounts", &self.ledger.accounts.len())
            .field("transactions", &self.ledger.transactions.len())
            .field("budgets", &self.ledger.budgets.len())
            .field("plan", &self.ledger.settings.plan)
            .field("cached_prices", &self.price_cache.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Monli {
    /// Start an empty ledger with default settings.
    pub fn create_new() -> Self {
        Self::from_ledger(Ledger::default())
    }

    /// Wrap a ledger snapshot handed over by the persistence layer.
    /// Transactions are kept in date order; ties keep their snapshot order.
    pub fn from_ledger(mut ledger: Ledger) -> Self {
        ledger.transactions.sort_by_key(|t| t.date);
        let registry = MetalPriceRegistry::new_with_defaults(&ledger.settings.api_keys);
        Self {
            ledger,
            transaction_service: TransactionService::new(),
            report_service: ReportService::new(),
            price_service: PriceService::new(registry),
            zakat_service: ZakatService::new(),
            price_cache: PriceCache::new(),
            dirty: false,
        }
    }

    /// Replace the metal price providers built from the configured API keys.
    pub fn with_price_registry(mut self, registry: MetalPriceRegistry) -> Self {
        self.price_service = PriceService::new(registry);
        self
    }

    /// Load a ledger from its JSON snapshot.
    pub fn load_from_json(bytes: &[u8]) -> Result<Self, CoreError> {
        let ledger: Ledger = serde_json::from_slice(bytes)?;
        Self::validate_settings(&ledger.settings)?;
        Ok(Self::from_ledger(ledger))
    }

    /// Serialize the ledger to JSON. Clears the unsaved-changes flag.
    pub fn save_to_json(&mut self) -> Result<Vec<u8>, CoreError> {
        let bytes = self.snapshot_bytes()?;
        self.dirty = false;
        Ok(bytes)
    }

    /// Load from a JSON file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<Self, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_json(&bytes)
    }

    /// Save to a JSON file on disk (native only, not WASM).
    /// Writes to a temporary sibling first, then renames over `path`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: &str) -> Result<(), CoreError> {
        let bytes = self.snapshot_bytes()?;
        let tmp = format!("{path}.tmp");
        std::fs::write(&tmp, &bytes)?;
        std::fs::rename(&tmp, path)?;
        self.dirty = false;
        tracing::info!(path, "ledger saved");
        Ok(())
    }

    fn snapshot_bytes(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec_pretty(&self.ledger).map_err(CoreError::serialization)
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Returns `true` if the ledger has been modified since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.ledger.settings
    }

    /// Set the default currency (e.g., "IDR", "USD").
    /// Currency code must be a 3-letter alphabetic string.
    pub fn set_default_currency(&mut self, currency: &str) -> Result<(), CoreError> {
        let code = normalize_currency(currency)?;
        self.ledger.settings.default_currency = code;
        self.dirty = true;
        Ok(())
    }

    /// Set the day of month (1–31) after which transactions count toward
    /// the next budget month. Applies to transactions added from now on.
    pub fn set_budget_cutoff_day(&mut self, day: u32) -> Result<(), CoreError> {
        validate_cutoff_day(day)?;
        self.ledger.settings.budget_cutoff_day = day;
        self.dirty = true;
        tracing::info!(day, "budget cutoff day changed");
        Ok(())
    }

    pub fn set_plan(&mut self, plan: Plan) {
        if self.ledger.settings.plan != plan {
            self.ledger.settings.plan = plan;
            self.dirty = true;
            tracing::info!(%plan, "plan changed");
        }
    }

    pub fn complete_onboarding(&mut self) {
        if !self.ledger.settings.onboarding_completed {
            self.ledger.settings.onboarding_completed = true;
            self.dirty = true;
        }
    }

    /// Set an API key for a price provider (e.g., "metalpriceapi", "metals_dev").
    /// Rebuilds the provider registry so the new key takes effect immediately.
    pub fn set_api_key(&mut self, provider: &str, key: &str) -> Result<(), CoreError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CoreError::ValidationError(format!(
                "API key for '{provider}' must not be empty"
            )));
        }
        self.ledger
            .settings
            .api_keys
            .insert(provider.to_string(), key.to_string());
        self.rebuild_price_registry();
        self.dirty = true;
        Ok(())
    }

    /// Remove an API key for a provider.
    /// Rebuilds the provider registry so the removal takes effect immediately.
    pub fn remove_api_key(&mut self, provider: &str) -> bool {
        let removed = self.ledger.settings.api_keys.remove(provider).is_some();
        if removed {
            self.rebuild_price_registry();
            self.dirty = true;
        }
        removed
    }

    fn rebuild_price_registry(&mut self) {
        let registry = MetalPriceRegistry::new_with_defaults(&self.ledger.settings.api_keys);
        self.price_service = PriceService::new(registry);
    }

    fn validate_settings(settings: &Settings) -> Result<(), CoreError> {
        validate_cutoff_day(settings.budget_cutoff_day)?;
        normalize_currency(&settings.default_currency)?;
        Ok(())
    }

    // ── Accounts ────────────────────────────────────────────────────

    /// Open an account. The free plan is limited to one account.
    pub fn add_account(&mut self, account: Account) -> Result<Uuid, CoreError> {
        if !self.ledger.settings.plan.can_add_account(self.ledger.accounts.len()) {
            let max = self.ledger.settings.plan.limits().max_accounts.unwrap_or_default();
            return Err(CoreError::PlanRestricted(format!("Adding more than {max} account")));
        }
        if account.name.trim().is_empty() {
            return Err(CoreError::ValidationError("Account name must not be empty".into()));
        }
        if !account.opening_balance.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Opening balance must be a finite number, got {}",
                account.opening_balance
            )));
        }
        let mut account = account;
        account.currency = normalize_currency(&account.currency)?;

        let id = account.id;
        tracing::info!(account_id = %id, account_type = %account.account_type, "account added");
        self.ledger.accounts.push(account);
        self.dirty = true;
        Ok(id)
    }

    /// Archive or restore an account. Archived accounts keep their history
    /// but are left out of the total balance.
    pub fn set_account_archived(&mut self, account_id: Uuid, archived: bool) -> Result<(), CoreError> {
        let account = self
            .ledger
            .accounts
            .iter_mut()
            .find(|a| a.id == account_id)
            .ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))?;
        if account.archived != archived {
            account.archived = archived;
            self.dirty = true;
        }
        Ok(())
    }

    #[must_use]
    pub fn get_accounts(&self) -> &[Account] {
        &self.ledger.accounts
    }

    pub fn account_balance(&self, account_id: Uuid) -> Result<f64, CoreError> {
        let account = self
            .ledger
            .account(account_id)
            .ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))?;
        Ok(ledger_calculator::current_balance(account, &self.ledger.transactions))
    }

    // ── Categories ──────────────────────────────────────────────────

    pub fn add_category(&mut self, category: Category) -> Result<Uuid, CoreError> {
        let name = category.name.trim();
        if name.is_empty() {
            return Err(CoreError::ValidationError("Category name must not be empty".into()));
        }
        let duplicate = self.ledger.categories.iter().any(|c| {
            c.category_type == category.category_type && c.name.trim().eq_ignore_ascii_case(name)
        });
        if duplicate {
            return Err(CoreError::ValidationError(format!(
                "An {} category named '{name}' already exists",
                category.category_type
            )));
        }

        let id = category.id;
        self.ledger.categories.push(category);
        self.dirty = true;
        Ok(id)
    }

    #[must_use]
    pub fn get_categories(&self, category_type: Option<CategoryType>) -> Vec<&Category> {
        self.ledger
            .categories
            .iter()
            .filter(|c| category_type.map_or(true, |t| c.category_type == t))
            .collect()
    }

    // ── Transactions ────────────────────────────────────────────────

    /// Validate and post a transaction. Its budget month is derived from
    /// the cutoff day unless already set.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<Uuid, CoreError> {
        let kind = transaction.kind.label();
        let id = self.transaction_service.add(&mut self.ledger, transaction)?;
        self.dirty = true;
        tracing::info!(transaction_id = %id, kind, "transaction added");
        Ok(id)
    }

    /// Replace a posted transaction, matched by id.
    pub fn update_transaction(&mut self, transaction: Transaction) -> Result<(), CoreError> {
        let id = transaction.id;
        self.transaction_service.update(&mut self.ledger, transaction)?;
        self.dirty = true;
        tracing::info!(transaction_id = %id, "transaction updated");
        Ok(())
    }

    pub fn remove_transaction(&mut self, transaction_id: Uuid) -> Result<Transaction, CoreError> {
        let removed = self.transaction_service.remove(&mut self.ledger, transaction_id)?;
        self.dirty = true;
        tracing::info!(%transaction_id, "transaction removed");
        Ok(removed)
    }

    #[must_use]
    pub fn get_transaction(&self, transaction_id: Uuid) -> Option<&Transaction> {
        self.ledger.transaction(transaction_id)
    }

    /// All transactions, newest first.
    #[must_use]
    pub fn get_transactions(&self) -> Vec<&Transaction> {
        self.ledger.transactions.iter().rev().collect()
    }

    /// Transactions booked to `month`, newest first.
    #[must_use]
    pub fn get_transactions_in_month(&self, month: BudgetMonth) -> Vec<&Transaction> {
        self.ledger
            .transactions
            .iter()
            .rev()
            .filter(|t| t.budget_month == Some(month))
            .collect()
    }

    /// Budget month `date` belongs to under the current cutoff day.
    #[must_use]
    pub fn budget_month_for(&self, date: NaiveDate) -> BudgetMonth {
        ledger_calculator::budget_month(date, self.ledger.settings.budget_cutoff_day)
    }

    /// Budget month today belongs to.
    #[must_use]
    pub fn current_budget_month(&self) -> BudgetMonth {
        self.budget_month_for(chrono::Utc::now().date_naive())
    }

    // ── Budgets ─────────────────────────────────────────────────────

    /// Add a monthly budget. The free plan is limited to two budgets.
    pub fn add_budget(&mut self, budget: Budget) -> Result<Uuid, CoreError> {
        let plan = self.ledger.settings.plan;
        if !plan.can_add_budget(self.ledger.budgets.len()) {
            let max = plan.limits().max_budgets.unwrap_or_default();
            return Err(CoreError::PlanRestricted(format!("Adding more than {max} budgets")));
        }
        self.validate_budget(&budget)?;

        let id = budget.id;
        tracing::info!(budget_id = %id, month = %budget.month, items = budget.items.len(), "budget added");
        self.ledger.budgets.push(budget);
        self.dirty = true;
        Ok(id)
    }

    pub fn remove_budget(&mut self, budget_id: Uuid) -> Result<Budget, CoreError> {
        let idx = self
            .ledger
            .budgets
            .iter()
            .position(|b| b.id == budget_id)
            .ok_or_else(|| CoreError::BudgetNotFound(budget_id.to_string()))?;
        let removed = self.ledger.budgets.remove(idx);
        self.dirty = true;
        tracing::info!(%budget_id, "budget removed");
        Ok(removed)
    }

    #[must_use]
    pub fn get_budgets(&self) -> &[Budget] {
        &self.ledger.budgets
    }

    pub fn budget_progress(&self, budget_id: Uuid) -> Result<BudgetProgress, CoreError> {
        let budget = self.find_budget(budget_id)?;
        Ok(self.report_service.budget_progress(budget, &self.ledger.transactions))
    }

    /// Per-category progress of a budget (PRO plan only).
    pub fn budget_detail(&self, budget_id: Uuid) -> Result<Vec<BudgetItemProgress>, CoreError> {
        if !self.ledger.settings.plan.limits().budget_detail {
            return Err(CoreError::PlanRestricted("Budget detail".into()));
        }
        let budget = self.find_budget(budget_id)?;
        Ok(self.report_service.budget_item_progress(budget, &self.ledger.transactions))
    }

    fn find_budget(&self, budget_id: Uuid) -> Result<&Budget, CoreError> {
        self.ledger
            .budget(budget_id)
            .ok_or_else(|| CoreError::BudgetNotFound(budget_id.to_string()))
    }

    fn validate_budget(&self, budget: &Budget) -> Result<(), CoreError> {
        if !budget.total_amount.is_finite() || budget.total_amount < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Budget total must be a non-negative number, got {}",
                budget.total_amount
            )));
        }
        for item in &budget.items {
            if !item.amount.is_finite() || item.amount < 0.0 {
                return Err(CoreError::ValidationError(format!(
                    "Budget item amount must be a non-negative number, got {}",
                    item.amount
                )));
            }
            let category = self
                .ledger
                .category(item.category_id)
                .ok_or_else(|| CoreError::CategoryNotFound(item.category_id.to_string()))?;
            if category.category_type != CategoryType::Expense {
                return Err(CoreError::ValidationError(format!(
                    "Budget items must use expense categories; '{}' is an income category",
                    category.name
                )));
            }
        }
        Ok(())
    }

    // ── Reports ─────────────────────────────────────────────────────

    #[must_use]
    pub fn dashboard_kpis(&self, month: BudgetMonth) -> DashboardKpis {
        self.report_service.dashboard_kpis(&self.ledger, month)
    }

    #[must_use]
    pub fn total_balance(&self) -> f64 {
        ledger_calculator::total_balance(&self.ledger.accounts, &self.ledger.transactions)
    }

    #[must_use]
    pub fn account_balances(&self, include_archived: bool) -> Vec<AccountBalance> {
        self.report_service.account_balances(&self.ledger, include_archived)
    }

    #[must_use]
    pub fn category_spend(&self, month: BudgetMonth) -> Vec<CategorySpend> {
        self.report_service.category_spend(&self.ledger, month)
    }

    // ── Zakat ───────────────────────────────────────────────────────

    /// Assess zakat on `zakatable` wealth against the nisab of `metal`,
    /// priced in the default currency on `date`.
    pub async fn assess_zakat(
        &mut self,
        metal: Metal,
        zakatable: f64,
        date: NaiveDate,
    ) -> Result<ZakatReport, CoreError> {
        let currency = self.ledger.settings.default_currency.clone();
        self.zakat_service
            .assess(
                &self.price_service,
                &mut self.price_cache,
                metal,
                zakatable,
                &currency,
                date,
            )
            .await
    }

    /// Assess zakat on the current total balance at today's price.
    pub async fn assess_zakat_on_balance(&mut self, metal: Metal) -> Result<ZakatReport, CoreError> {
        let today = chrono::Utc::now().date_naive();
        let zakatable = self.total_balance();
        self.assess_zakat(metal, zakatable, today).await
    }

    #[must_use]
    pub fn price_provider_names(&self, metal: Metal) -> Vec<String> {
        self.price_service.get_provider_names(metal)
    }

    // ── Cache Management ────────────────────────────────────────────

    #[must_use]
    pub fn cache_total_entries(&self) -> usize {
        self.price_cache.len()
    }

    /// Manually record a per-ounce quote in the default currency
    /// (offline use or historical import).
    pub fn cache_insert_price(&mut self, metal: Metal, date: NaiveDate, price_per_ounce: f64) -> Result<(), CoreError> {
        if !price_per_ounce.is_finite() || price_per_ounce < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Price must be a non-negative number, got {price_per_ounce}"
            )));
        }
        let currency = self.ledger.settings.default_currency.clone();
        self.price_cache.insert(metal, &currency, date, price_per_ounce);
        Ok(())
    }

    /// Remove all cached price points older than `before` date.
    /// Returns the number of entries removed.
    pub fn cache_prune_before(&mut self, before: NaiveDate) -> usize {
        self.price_cache.prune_before(before)
    }

    pub fn cache_clear(&mut self) {
        self.price_cache.clear();
    }

    // ── Assistant ───────────────────────────────────────────────────

    /// Read a receipt photo with the user's plan applied.
    pub async fn scan_receipt(
        &self,
        assistant: &AssistantService,
        image: &ReceiptImage,
    ) -> Result<ReceiptScan, CoreError> {
        assistant.scan_receipt(self.ledger.settings.plan, image).await
    }

    /// Draft an expense from a reviewed receipt scan, using the current
    /// cutoff day. The draft is not posted.
    #[must_use]
    pub fn draft_expense_from_receipt(
        &self,
        scan: &ReceiptScan,
        account_id: Uuid,
        category_id: Option<Uuid>,
        fallback_date: NaiveDate,
    ) -> Transaction {
        scan.to_expense(
            account_id,
            category_id,
            fallback_date,
            self.ledger.settings.budget_cutoff_day,
        )
    }

    #[must_use]
    pub fn chat_context(&self, profile_name: &str) -> ChatContext {
        AssistantService::chat_context(&self.ledger, profile_name)
    }

    /// Ask the assistant about this ledger. `usage_count` is the number of
    /// chat requests already logged for the user.
    pub async fn chat(
        &self,
        assistant: &AssistantService,
        profile_name: &str,
        message: &str,
        usage_count: u32,
    ) -> Result<String, CoreError> {
        let context = self.chat_context(profile_name);
        assistant.chat(message, usage_count, &context).await
    }
}

fn normalize_currency(currency: &str) -> Result<String, CoreError> {
    let code = currency.trim().to_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CoreError::ValidationError(format!(
            "Invalid currency code '{currency}': must be exactly 3 ASCII letters (e.g., IDR, USD)"
        )));
    }
    Ok(code)
}

fn validate_cutoff_day(day: u32) -> Result<(), CoreError> {
    if !(1..=31).contains(&day) {
        return Err(CoreError::ValidationError(format!(
            "Budget cutoff day must be between 1 and 31, got {day}"
        )));
    }
    Ok(())
}
