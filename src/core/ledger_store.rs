//! Owner of the transaction ledger.
//!
//! The store is the only place that mutates transactions. Every mutation is
//! applied in memory first and then written through to the key-value storage
//! collaborator; a failed write is reported as a [`PersistenceWarning`] and
//! never rolls the mutation back. The next successful write (or an explicit
//! [`LedgerStore::flush`]) brings storage back in line.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    core::{
        services::summary_service::{SummaryService, DEFAULT_RECENT_LIMIT},
        time::Clock,
    },
    domain::{
        category::CategoryRegistry,
        summary::{CategoryTotal, PeriodSummary},
        transaction::{NewTransaction, Transaction, TransactionPatch},
        window::{resolve, DateRange, TimeRange},
    },
    errors::{LedgerError, PersistenceWarning, Result},
    storage::KeyValueStorage,
};

/// Storage key the ledger snapshot lives under.
pub const STORAGE_KEY: &str = "transactions-storage";
pub const CURRENT_SCHEMA_VERSION: u8 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    schema_version: u8,
    transactions: &'a [Transaction],
}

#[derive(Deserialize)]
struct Snapshot {
    #[serde(default = "default_schema_version")]
    schema_version: u8,
    transactions: Vec<Transaction>,
}

fn default_schema_version() -> u8 {
    CURRENT_SCHEMA_VERSION
}

/// Outcome of a store mutation.
///
/// `value` reflects the in-memory change, which always succeeds.
/// `persistence` is set when the write-through to storage failed.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Mutation<T> {
    pub value: T,
    pub persistence: Option<PersistenceWarning>,
}

impl<T> Mutation<T> {
    fn new(value: T, persistence: Option<PersistenceWarning>) -> Self {
        Self { value, persistence }
    }

    pub fn is_persisted(&self) -> bool {
        self.persistence.is_none()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// In-memory ledger with write-through persistence.
pub struct LedgerStore {
    transactions: Vec<Transaction>,
    storage: Box<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
    registry: &'static CategoryRegistry,
    selected_time_range: Option<TimeRange>,
    date_range: DateRange,
    dirty: bool,
}

impl LedgerStore {
    /// Creates an empty store without reading from storage.
    pub fn new<S, C>(storage: S, clock: C) -> Self
    where
        S: KeyValueStorage + 'static,
        C: Clock + 'static,
    {
        let clock: Arc<dyn Clock> = Arc::new(clock);
        let selected = TimeRange::default();
        let date_range = resolve(selected, clock.now());
        Self {
            transactions: Vec::new(),
            storage: Box::new(storage),
            clock,
            registry: CategoryRegistry::builtin(),
            selected_time_range: Some(selected),
            date_range,
            dirty: false,
        }
    }

    /// Creates a store and loads the persisted snapshot, if any.
    ///
    /// Unreadable data or a snapshot written by a newer schema is an error;
    /// a missing key yields an empty ledger.
    pub fn open<S, C>(storage: S, clock: C) -> Result<Self>
    where
        S: KeyValueStorage + 'static,
        C: Clock + 'static,
    {
        let mut store = Self::new(storage, clock);
        if let Some(bytes) = store.storage.load(STORAGE_KEY)? {
            let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
            if snapshot.schema_version > CURRENT_SCHEMA_VERSION {
                return Err(LedgerError::UnsupportedSchema {
                    found: snapshot.schema_version,
                    supported: CURRENT_SCHEMA_VERSION,
                });
            }
            store.transactions = snapshot.transactions;
        }
        info!(
            transactions = store.transactions.len(),
            "ledger store opened"
        );
        Ok(store)
    }

    /// Swaps the category catalog used by the convenience queries.
    pub fn with_registry(mut self, registry: &'static CategoryRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &'static CategoryRegistry {
        self.registry
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Read-only view of the ledger, newest insertion first.
    pub fn snapshot(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// `true` when the last write-through failed and storage may be stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Records a new transaction with a fresh id and timestamps.
    ///
    /// No validation happens here; callers validate at the input boundary.
    pub fn add(&mut self, data: NewTransaction) -> Mutation<Transaction> {
        let txn = Transaction::from_new(data, self.clock.now());
        debug!(id = %txn.id, kind = %txn.kind, "adding transaction");
        self.transactions.insert(0, txn.clone());
        let warning = self.persist();
        Mutation::new(txn, warning)
    }

    /// Merges `patch` into the transaction with `id`.
    ///
    /// Unknown ids are a silent no-op: the value is `None` and storage is not
    /// touched.
    pub fn update(&mut self, id: Uuid, patch: TransactionPatch) -> Mutation<Option<Transaction>> {
        let now = self.clock.now();
        let Some(txn) = self.transactions.iter_mut().find(|txn| txn.id == id) else {
            debug!(%id, "update ignored for unknown transaction");
            return Mutation::new(None, None);
        };
        txn.apply(patch);
        txn.updated_at = next_timestamp(now, txn.updated_at);
        let updated = txn.clone();
        debug!(%id, "updated transaction");
        let warning = self.persist();
        Mutation::new(Some(updated), warning)
    }

    /// Removes the transaction with `id`, returning it. Unknown ids are a
    /// no-op.
    pub fn delete(&mut self, id: Uuid) -> Mutation<Option<Transaction>> {
        let Some(index) = self.transactions.iter().position(|txn| txn.id == id) else {
            debug!(%id, "delete ignored for unknown transaction");
            return Mutation::new(None, None);
        };
        let removed = self.transactions.remove(index);
        debug!(%id, "deleted transaction");
        let warning = self.persist();
        Mutation::new(Some(removed), warning)
    }

    /// Empties the ledger. Irreversible at this layer; confirmation is the
    /// caller's job.
    pub fn clear(&mut self) -> Mutation<usize> {
        let removed = self.transactions.len();
        self.transactions.clear();
        info!(removed, "cleared ledger");
        let warning = self.persist();
        Mutation::new(removed, warning)
    }

    /// Re-attempts the write-through of the current snapshot.
    pub fn flush(&mut self) -> Option<PersistenceWarning> {
        self.persist()
    }

    /// Selects a preset window, resolved against the store clock.
    pub fn select_time_range(&mut self, selector: TimeRange) -> DateRange {
        self.selected_time_range = Some(selector);
        self.date_range = resolve(selector, self.clock.now());
        self.date_range
    }

    /// Selects an explicit window; the preset selector is cleared.
    pub fn set_date_range(&mut self, range: DateRange) {
        self.selected_time_range = None;
        self.date_range = range;
    }

    /// Re-anchors a preset window at the current instant. Custom windows are
    /// left as they are.
    pub fn refresh_window(&mut self) -> DateRange {
        if let Some(selector) = self.selected_time_range {
            self.date_range = resolve(selector, self.clock.now());
        }
        self.date_range
    }

    pub fn selected_time_range(&self) -> Option<TimeRange> {
        self.selected_time_range
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn total_income(&self) -> f64 {
        SummaryService::total_income(&self.transactions, &self.date_range)
    }

    pub fn total_expense(&self) -> f64 {
        SummaryService::total_expense(&self.transactions, &self.date_range)
    }

    pub fn balance(&self) -> f64 {
        SummaryService::balance(&self.transactions, &self.date_range)
    }

    pub fn category_totals(&self) -> Vec<CategoryTotal> {
        SummaryService::category_totals(&self.transactions, &self.date_range, self.registry)
    }

    pub fn transactions_in_range(&self) -> Vec<&Transaction> {
        SummaryService::transactions_in_range(&self.transactions, &self.date_range)
    }

    /// Most recent transactions by date; `None` uses the default limit.
    pub fn recent_transactions(&self, limit: Option<usize>) -> Vec<&Transaction> {
        SummaryService::recent_transactions(
            &self.transactions,
            limit.unwrap_or(DEFAULT_RECENT_LIMIT),
        )
    }

    pub fn summary(&self) -> PeriodSummary {
        SummaryService::summarize(&self.transactions, &self.date_range, self.registry)
    }

    fn persist(&mut self) -> Option<PersistenceWarning> {
        match self.write_snapshot() {
            Ok(()) => {
                self.dirty = false;
                None
            }
            Err(err) => {
                self.dirty = true;
                warn!(key = STORAGE_KEY, error = %err, "write-through failed; keeping in-memory state");
                Some(PersistenceWarning {
                    key: STORAGE_KEY.to_string(),
                    message: err.to_string(),
                })
            }
        }
    }

    fn write_snapshot(&self) -> Result<()> {
        let snapshot = SnapshotRef {
            schema_version: CURRENT_SCHEMA_VERSION,
            transactions: &self.transactions,
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        self.storage.save(STORAGE_KEY, &bytes)
    }
}

/// `updated_at` must move strictly forward even if the clock has not.
/// Only the last representable instant cannot move further.
fn next_timestamp(now: DateTime<Utc>, previous: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous
            .checked_add_signed(Duration::microseconds(1))
            .unwrap_or(previous)
    }
}
