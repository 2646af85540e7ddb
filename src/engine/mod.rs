//! The application engine. One orchestrator drives the recurrence scheduler,
//! the balance mutator, the ledger, the effect cascade, and the notification
//! evaluator; every trigger (manual apply, dashboard load) goes through the
//! same methods. Runs for one user are serialized behind a per-user mutex so
//! concurrent triggers cannot double-apply a rule.

pub mod balance;
pub mod cascade;
pub mod notify;
pub mod schedule;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDateTime};
use uuid::Uuid;

use crate::domain::{
    Account, Balances, Direction, MonthKey, Notification, RecurringRule, Transaction,
};
use crate::errors::EngineError;
use crate::store::{Store, StoreError};

const RECURRING_PREFIX: &str = "[Recurring] ";
const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Time source consumed by the engine when a caller omits a timestamp.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time in the local timezone.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Outcome of one batch application of due recurring rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecurringRunReport {
    pub applied: usize,
    pub skipped_insufficient_funds: usize,
}

/// Facade that coordinates balances, the ledger, aggregates, and
/// notifications over a storage backend.
pub struct Engine {
    store: Arc<dyn Store>,
    clock: Box<dyn Clock>,
    user_locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl Engine {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_clock(store, Box::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn Store>, clock: Box<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Applies every due active recurring rule for the user, then runs the
    /// notification evaluator once. A rule whose withdrawal would overdraw
    /// its account is skipped without advancing its marker, so it retries on
    /// the next eligible run; the batch continues.
    pub fn run_due_recurring_rules(
        &self,
        user_id: Uuid,
        now: NaiveDateTime,
    ) -> Result<RecurringRunReport, EngineError> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut report = RecurringRunReport::default();
        for rule in self.store.rules_for_user(user_id)? {
            if !rule.is_active || !schedule::is_due(&rule, now) {
                continue;
            }
            match self.apply_rule(&rule, now) {
                Ok(()) => {
                    tracing::info!(rule = %rule.id, user = %user_id, "applied recurring rule");
                    report.applied += 1;
                }
                Err(EngineError::InsufficientFunds {
                    account,
                    requested,
                    available,
                }) => {
                    tracing::info!(
                        rule = %rule.id,
                        user = %user_id,
                        %account,
                        requested,
                        available,
                        "skipping recurring rule, insufficient funds"
                    );
                    report.skipped_insufficient_funds += 1;
                }
                Err(other) => return Err(other),
            }
        }

        notify::evaluate(self.store.as_ref(), user_id, now)?;
        Ok(report)
    }

    /// Records a single user-entered transaction: mutates the balance,
    /// writes the ledger entry, cascades into budget and goals, and runs the
    /// notification evaluator. All-or-nothing per transaction.
    #[allow(clippy::too_many_arguments)]
    pub fn record_manual_transaction(
        &self,
        user_id: Uuid,
        direction: Direction,
        account: Account,
        amount: f64,
        description: &str,
        category: &str,
        timestamp: Option<NaiveDateTime>,
    ) -> Result<Transaction, EngineError> {
        validate_amount(amount)?;
        let description = description.trim();
        if description.is_empty() {
            return Err(EngineError::Validation("description is required".into()));
        }
        let category = normalize_category(category);

        let lock = self.user_lock(user_id);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let timestamp = timestamp.unwrap_or_else(|| self.clock.now());
        let mut balances = self.balances_or_default(user_id)?;
        let resulting = balance::apply(&mut balances, account, direction, amount)?;

        self.store.put_balances(&balances)?;
        let transaction = Transaction::new(
            user_id,
            direction,
            account,
            amount,
            description,
            category,
            timestamp,
            resulting,
        );
        self.store.insert_transaction(&transaction)?;
        cascade::apply(
            self.store.as_ref(),
            user_id,
            direction,
            account,
            amount,
            transaction.month(),
        )?;

        // Notifications are evaluated as of now even for a backdated entry,
        // so they land inside today's dedup window.
        notify::evaluate(self.store.as_ref(), user_id, self.clock.now())?;
        Ok(transaction)
    }

    /// Reverses a transaction's balance and cascade effects, then removes the
    /// ledger entry. Reversing a deposit withdraws the amount again, so it
    /// fails with `InsufficientFunds` rather than driving a balance negative.
    pub fn reverse_transaction(&self, transaction_id: Uuid) -> Result<(), EngineError> {
        let transaction = self
            .store
            .transaction(transaction_id)?
            .ok_or(EngineError::NotFound("transaction", transaction_id))?;

        let lock = self.user_lock(transaction.user_id);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        // Re-fetch under the lock: a concurrent reversal may have removed
        // the entry between the first read and the lock acquisition.
        let transaction = self
            .store
            .transaction(transaction_id)?
            .ok_or(EngineError::NotFound("transaction", transaction_id))?;

        let inverse = match transaction.direction {
            Direction::Deposit => Direction::Withdrawal,
            Direction::Withdrawal => Direction::Deposit,
        };
        let mut balances = self.balances_or_default(transaction.user_id)?;
        balance::apply(&mut balances, transaction.account, inverse, transaction.amount)?;

        self.store.put_balances(&balances)?;
        cascade::reverse(
            self.store.as_ref(),
            transaction.user_id,
            transaction.direction,
            transaction.account,
            transaction.amount,
            transaction.month(),
        )?;
        self.store.delete_transaction(transaction_id)?;
        Ok(())
    }

    /// Runs the notification evaluator for a user, returning only the newly
    /// created notifications.
    pub fn evaluate_notifications(
        &self,
        user_id: Uuid,
        now: NaiveDateTime,
    ) -> Result<Vec<Notification>, EngineError> {
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        notify::evaluate(self.store.as_ref(), user_id, now)
    }

    /// Overwrites both balances for a user, e.g. for initial setup.
    pub fn set_balances(
        &self,
        user_id: Uuid,
        current: f64,
        savings: f64,
    ) -> Result<(), EngineError> {
        if !current.is_finite() || !savings.is_finite() || current < 0.0 || savings < 0.0 {
            return Err(EngineError::Validation(
                "balances must be non-negative numbers".into(),
            ));
        }
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.store
            .put_balances(&Balances::with_amounts(user_id, current, savings))?;
        Ok(())
    }

    /// The most recent notifications for a user, newest first.
    pub fn recent_notifications(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> Result<Vec<Notification>, EngineError> {
        let mut notifications = self.store.notifications_for_user(user_id)?;
        notifications.truncate(limit);
        Ok(notifications)
    }

    /// Runs the full per-rule sequence: check the balance on a local copy,
    /// claim the rule by advancing its marker through the version CAS, then
    /// persist the balance, ledger entry, and cascade. A failed withdrawal
    /// is detected before the claim so the marker is untouched, and a rule
    /// edited concurrently fails the claim while nothing has been persisted.
    fn apply_rule(&self, rule: &RecurringRule, now: NaiveDateTime) -> Result<(), EngineError> {
        let mut balances = self.balances_or_default(rule.user_id)?;
        let resulting = balance::apply(&mut balances, rule.account, rule.direction, rule.amount)?;

        let mut claimed = rule.clone();
        claimed.last_applied = Some(now);
        claimed.version = rule.version + 1;
        self.store
            .update_rule(&claimed, rule.version)
            .map_err(|err| match err {
                StoreError::VersionConflict(entity) => {
                    EngineError::ConcurrentModification(entity)
                }
                other => EngineError::Storage(other),
            })?;

        self.store.put_balances(&balances)?;
        let transaction = Transaction::new(
            rule.user_id,
            rule.direction,
            rule.account,
            rule.amount,
            format!("{RECURRING_PREFIX}{}", rule.description),
            rule.category.clone(),
            now,
            resulting,
        );
        self.store.insert_transaction(&transaction)?;
        cascade::apply(
            self.store.as_ref(),
            rule.user_id,
            rule.direction,
            rule.account,
            rule.amount,
            MonthKey::from_date(now.date()),
        )?;
        Ok(())
    }

    fn balances_or_default(&self, user_id: Uuid) -> Result<Balances, EngineError> {
        Ok(self
            .store
            .balances(user_id)?
            .unwrap_or_else(|| Balances::new(user_id)))
    }

    fn user_lock(&self, user_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self
            .user_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(user_id).or_default().clone()
    }
}

fn validate_amount(amount: f64) -> Result<(), EngineError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(EngineError::Validation(
            "amount must be a positive number".into(),
        ));
    }
    Ok(())
}

fn normalize_category(category: &str) -> String {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        trimmed.to_string()
    }
}
