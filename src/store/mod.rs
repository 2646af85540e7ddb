//! Keyed storage consumed by the engine and services. The engine only ever
//! talks to the [`Store`] trait; [`MemoryStore`] is the reference
//! implementation and the JSON backend snapshots it to disk.

pub mod json;
pub mod memory;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    Balances, Budget, Goal, MonthKey, Notification, RecurringRule, Reminder, Transaction,
};

pub use json::{default_data_file, load_from_path, save_to_path};
pub use memory::MemoryStore;

/// Error type for storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0} was updated concurrently")]
    VersionConflict(&'static str),
    #[error("missing record: {0}")]
    Missing(&'static str),
}

/// Abstraction over the keyed persistence the engine consumes. Inserts never
/// fail on duplicates (identifiers are freshly generated), updates fail with
/// [`StoreError::Missing`] for unknown identifiers, and deletes are
/// idempotent.
pub trait Store: Send + Sync {
    // Balances (one pair per user).
    fn balances(&self, user_id: Uuid) -> Result<Option<Balances>, StoreError>;
    fn put_balances(&self, balances: &Balances) -> Result<(), StoreError>;

    // Ledger entries, queried newest first.
    fn insert_transaction(&self, transaction: &Transaction) -> Result<(), StoreError>;
    fn transaction(&self, id: Uuid) -> Result<Option<Transaction>, StoreError>;
    fn transactions_for_user(&self, user_id: Uuid) -> Result<Vec<Transaction>, StoreError>;
    fn delete_transaction(&self, id: Uuid) -> Result<(), StoreError>;

    // Budgets, queried most recent month first.
    fn insert_budget(&self, budget: &Budget) -> Result<(), StoreError>;
    fn update_budget(&self, budget: &Budget) -> Result<(), StoreError>;
    fn delete_budget(&self, id: Uuid) -> Result<(), StoreError>;
    fn budget(&self, id: Uuid) -> Result<Option<Budget>, StoreError>;
    fn budget_for_month(
        &self,
        user_id: Uuid,
        month: MonthKey,
    ) -> Result<Option<Budget>, StoreError>;
    fn budgets_for_user(&self, user_id: Uuid) -> Result<Vec<Budget>, StoreError>;

    // Goals, queried by earliest deadline first.
    fn insert_goal(&self, goal: &Goal) -> Result<(), StoreError>;
    fn update_goal(&self, goal: &Goal) -> Result<(), StoreError>;
    fn delete_goal(&self, id: Uuid) -> Result<(), StoreError>;
    fn goal(&self, id: Uuid) -> Result<Option<Goal>, StoreError>;
    fn goals_for_user(&self, user_id: Uuid) -> Result<Vec<Goal>, StoreError>;

    // Reminders, queried by earliest due date first.
    fn insert_reminder(&self, reminder: &Reminder) -> Result<(), StoreError>;
    fn update_reminder(&self, reminder: &Reminder) -> Result<(), StoreError>;
    fn delete_reminder(&self, id: Uuid) -> Result<(), StoreError>;
    fn reminder(&self, id: Uuid) -> Result<Option<Reminder>, StoreError>;
    fn reminders_for_user(&self, user_id: Uuid) -> Result<Vec<Reminder>, StoreError>;

    // Recurring rules. `update_rule` is a compare-and-set on the stored
    // version: it fails with [`StoreError::VersionConflict`] when the stored
    // version no longer matches `expected_version`.
    fn insert_rule(&self, rule: &RecurringRule) -> Result<(), StoreError>;
    fn update_rule(&self, rule: &RecurringRule, expected_version: u64) -> Result<(), StoreError>;
    fn delete_rule(&self, id: Uuid) -> Result<(), StoreError>;
    fn rule(&self, id: Uuid) -> Result<Option<RecurringRule>, StoreError>;
    fn rules_for_user(&self, user_id: Uuid) -> Result<Vec<RecurringRule>, StoreError>;

    // Notifications, queried newest first.
    fn insert_notification(&self, notification: &Notification) -> Result<(), StoreError>;
    fn notifications_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, StoreError>;
}
