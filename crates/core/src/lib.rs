pub mod errors;
pub mod format;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

use std::collections::BTreeMap;
use std::sync::Arc;

use models::{
    account::{LoggedUser, Registration},
    category::Category,
    expense::{Expense, NewExpense},
    family::FamilyMember,
    goals::{GoalProgress, Goals, SavingsArea, SavingsSuggestion},
    settings::Settings,
    snapshot::FinanceSnapshot,
    summary::CategoryShare,
};
use services::{
    account_service::AccountService,
    aggregator,
    change_feed::{Snapshot, SubscriptionId},
    family_service::FamilyService,
    goal_service::GoalService,
    ledger_store::LedgerStore,
    snapshot_service::SnapshotService,
};
use storage::kv::{MemoryStore, SharedStore};
use storage::mirror::ExpenseMirror;
use uuid::Uuid;

use errors::CoreError;

/// Description used by [`FamilyFinance::quick_expense`].
pub const QUICK_EXPENSE_DESCRIPTION: &str = "Gasto Rápido";

/// Main entry point for the Family Finance core library.
///
/// One explicitly constructed context per process: it owns the ledger
/// store and every service, all sharing one key-value store. Input
/// validation happens here, before anything reaches the ledger.
#[must_use]
pub struct FamilyFinance {
    settings: Settings,
    ledger: LedgerStore,
    goals: GoalService,
    family: FamilyService,
    snapshots: SnapshotService,
    accounts: AccountService,
    /// Suggestions from the last `generate_suggestions` call.
    suggestions: Vec<SavingsSuggestion>,
}

impl std::fmt::Debug for FamilyFinance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FamilyFinance")
            .field("ledger", &self.ledger)
            .field("suggestions", &self.suggestions.len())
            .field("settings", &self.settings)
            .finish()
    }
}

impl FamilyFinance {
    /// Open the on-disk store under `settings.data_dir` (native only).
    /// Attaches the SQLite mirror when `settings.mirror.enabled`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(settings: Settings) -> Result<Self, CoreError> {
        let dir = settings.data_dir.clone().ok_or_else(|| {
            CoreError::ValidationError("settings.data_dir must be set to open an on-disk store".into())
        })?;
        let files = storage::kv::FileStore::open(&dir)?;
        for key in settings.keys.all() {
            files.slot_path(key)?;
        }
        let store: SharedStore = Arc::new(files);
        let mirror_path = settings
            .mirror
            .enabled
            .then(|| dir.join(&settings.mirror.database_file));

        let app = Self::with_store(store, settings);
        Ok(match mirror_path {
            Some(path) => app.with_mirror(Box::new(storage::mirror::SqliteMirror::new(path))),
            None => app,
        })
    }

    /// Build over any key-value store.
    pub fn with_store(store: SharedStore, settings: Settings) -> Self {
        let keys = &settings.keys;
        let ledger = LedgerStore::load(Arc::clone(&store), keys.expenses.clone());
        let goals = GoalService::new(
            Arc::clone(&store),
            keys.monthly_goal.clone(),
            keys.savings_goal.clone(),
        );
        let family = FamilyService::new(Arc::clone(&store), keys.family.clone());
        let snapshots = SnapshotService::new(Arc::clone(&store), keys.snapshots.clone());
        let accounts = AccountService::new(
            store,
            keys.users.clone(),
            keys.session.clone(),
            settings.kdf,
        );

        Self {
            settings,
            ledger,
            goals,
            family,
            snapshots,
            accounts,
            suggestions: Vec::new(),
        }
    }

    /// A throwaway instance over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), Settings::default())
    }

    /// Attach a write-mirror to the ledger.
    pub fn with_mirror(mut self, mirror: Box<dyn ExpenseMirror>) -> Self {
        self.ledger = self.ledger.with_mirror(mirror);
        self
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut LedgerStore {
        &mut self.ledger
    }

    // ── Expenses ────────────────────────────────────────────────────

    /// Validate and record an expense. An empty category becomes "Outros".
    pub fn record_expense(
        &mut self,
        description: &str,
        amount: f64,
        category: &str,
    ) -> Result<Uuid, CoreError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(CoreError::ValidationError(
                "Expense description must not be empty".into(),
            ));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Expense amount must be greater than zero, got {amount}"
            )));
        }
        let category = match category.trim() {
            "" => Category::Outros.label(),
            c => c,
        };

        self.ledger
            .add(NewExpense::new(description, amount, category))
    }

    /// Record an amount with the quick-entry description under "Outros".
    pub fn quick_expense(&mut self, amount: f64) -> Result<Uuid, CoreError> {
        self.record_expense(QUICK_EXPENSE_DESCRIPTION, amount, Category::Outros.label())
    }

    /// Remove one expense by id.
    pub fn remove_expense(&mut self, id: Uuid) -> Result<(), CoreError> {
        if self.ledger.remove(id)? {
            Ok(())
        } else {
            Err(CoreError::ExpenseNotFound(id.to_string()))
        }
    }

    /// Remove every expense matching `predicate`; returns how many went.
    pub fn remove_expenses_where<P>(&mut self, predicate: P) -> Result<usize, CoreError>
    where
        P: FnMut(&Expense) -> bool,
    {
        self.ledger.remove_by_predicate(predicate)
    }

    /// Retry a ledger write that previously failed.
    pub fn flush(&mut self) -> Result<(), CoreError> {
        self.ledger.flush()
    }

    #[must_use]
    pub fn expenses(&self) -> Vec<Expense> {
        self.ledger.get_all()
    }

    #[must_use]
    pub fn expense(&self, id: Uuid) -> Option<&Expense> {
        self.ledger.get(id)
    }

    /// The newest expenses, up to `settings.recent_limit`.
    #[must_use]
    pub fn recent_expenses(&self) -> Vec<Expense> {
        self.ledger.recent(self.settings.recent_limit)
    }

    #[must_use]
    pub fn expense_count(&self) -> usize {
        self.ledger.len()
    }

    // ── Monthly rollups ─────────────────────────────────────────────

    #[must_use]
    pub fn total_this_month(&self) -> f64 {
        self.ledger.total_for_current_month()
    }

    #[must_use]
    pub fn totals_by_category_this_month(&self) -> BTreeMap<String, f64> {
        self.ledger.totals_by_category_for_current_month()
    }

    #[must_use]
    pub fn category_breakdown_this_month(&self) -> Vec<CategoryShare> {
        self.ledger.category_breakdown_for_current_month()
    }

    /// Whether any category has positive spending this month (i.e. a chart
    /// has something to show).
    #[must_use]
    pub fn has_category_spending(&self) -> bool {
        aggregator::has_spending(&self.totals_by_category_this_month())
    }

    #[must_use]
    pub fn category_color(&self, category: &str) -> &'static str {
        self.ledger.category_color(category)
    }

    // ── Change feed ─────────────────────────────────────────────────

    /// Subscribe to ledger snapshots (called immediately with the latest one).
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Snapshot) + Send + 'static,
    {
        self.ledger.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.ledger.unsubscribe(id)
    }

    // ── Goals & Suggestions ─────────────────────────────────────────

    #[must_use]
    pub fn goals(&self) -> Goals {
        self.goals.goals()
    }

    pub fn set_monthly_goal(&mut self, value: f64) -> Result<(), CoreError> {
        self.goals.set_monthly_goal(value)
    }

    pub fn set_savings_goal(&mut self, value: f64) -> Result<(), CoreError> {
        self.goals.set_savings_goal(value)
    }

    /// This month's spending against the monthly goal.
    #[must_use]
    pub fn goal_progress(&self) -> GoalProgress {
        GoalService::progress(self.total_this_month(), self.goals.monthly_goal())
    }

    #[must_use]
    pub fn savings_areas(&self) -> Vec<SavingsArea> {
        GoalService::savings_areas(self.total_this_month())
    }

    /// Replace the current suggestions with fresh ones based on this month's total.
    pub fn generate_suggestions(&mut self) -> &[SavingsSuggestion] {
        self.suggestions = GoalService::suggestions(self.total_this_month());
        &self.suggestions
    }

    #[must_use]
    pub fn suggestions(&self) -> &[SavingsSuggestion] {
        &self.suggestions
    }

    /// Toggle a suggestion; applying it lowers the monthly goal.
    /// Returns the monthly goal afterwards.
    pub fn apply_suggestion(&mut self, id: &str) -> Result<f64, CoreError> {
        let suggestion = self
            .suggestions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::SuggestionNotFound(id.to_string()))?;
        self.goals.apply_suggestion(suggestion)
    }

    // ── Family ──────────────────────────────────────────────────────

    #[must_use]
    pub fn family_members(&self) -> Vec<FamilyMember> {
        self.family.members()
    }

    pub fn add_family_member(
        &mut self,
        name: &str,
        kind: &str,
        spent: f64,
    ) -> Result<FamilyMember, CoreError> {
        self.family.add_member(name, kind, spent)
    }

    pub fn remove_family_member(&mut self, id: &str) -> Result<FamilyMember, CoreError> {
        self.family.remove_member(id)
    }

    #[must_use]
    pub fn family_total(&self) -> f64 {
        FamilyService::total(&self.family.members())
    }

    #[must_use]
    pub fn top_spender(&self) -> Option<FamilyMember> {
        FamilyService::top_spender(&self.family.members()).cloned()
    }

    // ── Snapshots ───────────────────────────────────────────────────

    /// Save this month's total, the family list and the monthly goal.
    pub fn save_snapshot(&mut self) -> Result<FinanceSnapshot, CoreError> {
        self.snapshots.save(
            self.total_this_month(),
            &self.family.members(),
            self.goals.monthly_goal(),
        )
    }

    #[must_use]
    pub fn snapshots(&self) -> Vec<FinanceSnapshot> {
        self.snapshots.list()
    }

    // ── Accounts ────────────────────────────────────────────────────

    pub fn register(&mut self, registration: Registration) -> Result<LoggedUser, CoreError> {
        self.accounts.register(registration)
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<bool, CoreError> {
        self.accounts.login(username, password)
    }

    pub fn logout(&mut self) -> Result<(), CoreError> {
        self.accounts.logout()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.accounts.is_authenticated()
    }

    #[must_use]
    pub fn logged_user(&self) -> Option<LoggedUser> {
        self.accounts.logged_user()
    }
}
