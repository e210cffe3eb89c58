use chrono::{Local, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::category::category_color;
use crate::models::expense::{Expense, NewExpense};
use crate::models::summary::CategoryShare;
use crate::storage::codec::{decode_expenses, encode_expenses};
use crate::storage::kv::SharedStore;
use crate::storage::mirror::ExpenseMirror;

use super::aggregator;
use super::change_feed::{ChangeFeed, Snapshot, SubscriptionId};

/// Single source of truth for the expense ledger within a process.
///
/// The whole collection is loaded once at construction, kept newest first,
/// and re-persisted in full after every effective mutation. Each durable
/// mutation publishes a fresh snapshot on the change feed.
///
/// No validation happens here: callers check amounts and descriptions
/// before calling [`LedgerStore::add`].
pub struct LedgerStore {
    storage: SharedStore,
    key: String,
    expenses: Vec<Expense>,
    feed: ChangeFeed,
    mirror: Option<Box<dyn ExpenseMirror>>,
    /// Mirror writes waiting for the next durable persist.
    pending_mirror: Vec<MirrorOp>,
    /// In-memory state differs from the persisted slot.
    dirty: bool,
}

#[derive(Debug)]
enum MirrorOp {
    Insert(Expense),
    Delete(Uuid),
}

impl std::fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerStore")
            .field("key", &self.key)
            .field("expenses", &self.expenses.len())
            .field("mirror", &self.mirror.as_ref().map(|m| m.name().to_string()))
            .field("pending_mirror", &self.pending_mirror.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl LedgerStore {
    /// Load the ledger from `key` in `storage`.
    ///
    /// Never fails: a missing, unreadable or corrupt slot yields an empty ledger.
    pub fn load(storage: SharedStore, key: impl Into<String>) -> Self {
        let key = key.into();
        let expenses = Self::read_slot(&storage, &key);
        tracing::debug!(key = %key, count = expenses.len(), "ledger loaded");

        let feed = ChangeFeed::new(Arc::from(expenses.clone()));
        Self {
            storage,
            key,
            expenses,
            feed,
            mirror: None,
            pending_mirror: Vec::new(),
            dirty: false,
        }
    }

    /// Attach a write-mirror. If it cannot be opened the ledger carries on
    /// without it.
    pub fn with_mirror(mut self, mut mirror: Box<dyn ExpenseMirror>) -> Self {
        match mirror.open() {
            Ok(()) => self.mirror = Some(mirror),
            Err(e) => {
                tracing::warn!(mirror = mirror.name(), error = %e, "mirror unavailable, continuing without it");
            }
        }
        self
    }

    fn read_slot(storage: &SharedStore, key: &str) -> Vec<Expense> {
        let raw = match storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cannot read ledger slot, starting empty");
                return Vec::new();
            }
        };
        match decode_expenses(&raw) {
            Ok(expenses) => expenses,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "corrupt ledger slot, starting empty");
                Vec::new()
            }
        }
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Stamp `new` with the current instant, prepend it, persist and publish.
    ///
    /// On a persistence failure the expense stays in memory (see
    /// [`LedgerStore::flush`]) and `PersistenceUnavailable` is returned.
    /// The mirror sees the expense only once it is durable.
    pub fn add(&mut self, new: NewExpense) -> Result<Uuid, CoreError> {
        let expense = Expense::stamp(new, Utc::now());
        let id = expense.id;
        tracing::debug!(%id, amount = expense.amount, category = %expense.category, "adding expense");

        if self.mirror.is_some() {
            self.pending_mirror.push(MirrorOp::Insert(expense.clone()));
        }
        self.expenses.insert(0, expense);
        self.persist_and_publish()?;
        Ok(id)
    }

    /// Remove the expense with `id`. Returns `false` when no such expense exists.
    pub fn remove(&mut self, id: Uuid) -> Result<bool, CoreError> {
        Ok(self.remove_by_predicate(|e| e.id == id)? > 0)
    }

    /// Remove every expense matching `predicate`; returns how many were removed.
    ///
    /// Persists and publishes only when something was removed.
    pub fn remove_by_predicate<P>(&mut self, mut predicate: P) -> Result<usize, CoreError>
    where
        P: FnMut(&Expense) -> bool,
    {
        let (removed, kept): (Vec<Expense>, Vec<Expense>) =
            std::mem::take(&mut self.expenses)
                .into_iter()
                .partition(|e| predicate(e));
        self.expenses = kept;

        if removed.is_empty() {
            return Ok(0);
        }
        tracing::debug!(count = removed.len(), "removing expenses");

        if self.mirror.is_some() {
            self.pending_mirror
                .extend(removed.iter().map(|e| MirrorOp::Delete(e.id)));
        }

        self.persist_and_publish()?;
        Ok(removed.len())
    }

    /// Retry persisting after a failed write. No-op when nothing is pending.
    pub fn flush(&mut self) -> Result<(), CoreError> {
        if !self.dirty {
            return Ok(());
        }
        self.persist_and_publish()
    }

    /// `true` when a previous write failed and memory is ahead of storage.
    #[must_use]
    pub fn has_unpersisted_changes(&self) -> bool {
        self.dirty
    }

    fn persist_and_publish(&mut self) -> Result<(), CoreError> {
        let written = encode_expenses(&self.expenses)
            .and_then(|json| self.storage.set(&self.key, &json));

        match written {
            Ok(()) => {
                self.dirty = false;
                self.sync_mirror();
                self.feed.publish(Arc::from(self.expenses.clone()));
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                tracing::warn!(key = %self.key, error = %e, "failed to persist ledger");
                Err(match e {
                    CoreError::PersistenceUnavailable(_) => e,
                    other => CoreError::PersistenceUnavailable(other.to_string()),
                })
            }
        }
    }

    /// Replay queued writes into the mirror. Failures are logged and dropped.
    fn sync_mirror(&mut self) {
        let ops = std::mem::take(&mut self.pending_mirror);
        let Some(mirror) = self.mirror.as_mut() else {
            return;
        };
        for op in ops {
            let (id, result) = match &op {
                MirrorOp::Insert(expense) => (expense.id, mirror.insert(expense)),
                MirrorOp::Delete(id) => (*id, mirror.delete(*id)),
            };
            if let Err(e) = result {
                tracing::warn!(mirror = mirror.name(), %id, error = %e, ?op, "mirror write failed");
            }
        }
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Copy of the whole ledger, newest first.
    #[must_use]
    pub fn get_all(&self) -> Vec<Expense> {
        self.expenses.clone()
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// The `n` newest expenses.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<Expense> {
        aggregator::recent(&self.expenses, n)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    // ── Current-month rollups ───────────────────────────────────────
    //
    // "Current month" is read from the wall clock on every call.

    #[must_use]
    pub fn total_for_current_month(&self) -> f64 {
        aggregator::total_for_month(&self.expenses, &Local::now())
    }

    #[must_use]
    pub fn totals_by_category_for_current_month(&self) -> BTreeMap<String, f64> {
        aggregator::totals_by_category_for_month(&self.expenses, &Local::now())
    }

    #[must_use]
    pub fn category_breakdown_for_current_month(&self) -> Vec<CategoryShare> {
        aggregator::category_breakdown(&self.expenses, &Local::now())
    }

    #[must_use]
    pub fn category_color(&self, category: &str) -> &'static str {
        category_color(category)
    }

    // ── Change feed ─────────────────────────────────────────────────

    /// Subscribe to ledger snapshots. The listener is called right away
    /// with the latest published snapshot.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Snapshot) + Send + 'static,
    {
        self.feed.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.feed.unsubscribe(id)
    }

    #[must_use]
    pub fn latest_snapshot(&self) -> Snapshot {
        self.feed.latest()
    }

    #[must_use]
    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    // ── Mirror ──────────────────────────────────────────────────────

    #[must_use]
    pub fn mirror(&self) -> Option<&dyn ExpenseMirror> {
        self.mirror.as_deref()
    }

    /// Close the mirror connection (if any). Errors are logged; writes
    /// still waiting on a durable persist are discarded.
    pub fn close_mirror(&mut self) {
        self.pending_mirror.clear();
        if let Some(mut mirror) = self.mirror.take() {
            if let Err(e) = mirror.close() {
                tracing::warn!(mirror = mirror.name(), error = %e, "mirror close failed");
            }
        }
    }
}
