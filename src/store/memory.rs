use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Balances, Budget, Goal, MonthKey, Notification, RecurringRule, Reminder, Transaction,
};

use super::{Store, StoreError};

/// The full keyed dataset of one deployment. Serializable so the JSON
/// backend can persist and restore it as a single snapshot.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub balances: HashMap<Uuid, Balances>,
    #[serde(default)]
    pub transactions: HashMap<Uuid, Transaction>,
    #[serde(default)]
    pub budgets: HashMap<Uuid, Budget>,
    #[serde(default)]
    pub goals: HashMap<Uuid, Goal>,
    #[serde(default)]
    pub reminders: HashMap<Uuid, Reminder>,
    #[serde(default)]
    pub rules: HashMap<Uuid, RecurringRule>,
    #[serde(default)]
    pub notifications: HashMap<Uuid, Notification>,
}

/// In-memory [`Store`] over a locked [`Dataset`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Dataset>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self {
            inner: RwLock::new(dataset),
        }
    }

    /// Clones the current dataset, e.g. for persistence.
    pub fn snapshot(&self) -> Dataset {
        self.read().clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Dataset> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Dataset> {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Store for MemoryStore {
    fn balances(&self, user_id: Uuid) -> Result<Option<Balances>, StoreError> {
        Ok(self.read().balances.get(&user_id).cloned())
    }

    fn put_balances(&self, balances: &Balances) -> Result<(), StoreError> {
        self.write()
            .balances
            .insert(balances.user_id, balances.clone());
        Ok(())
    }

    fn insert_transaction(&self, transaction: &Transaction) -> Result<(), StoreError> {
        self.write()
            .transactions
            .insert(transaction.id, transaction.clone());
        Ok(())
    }

    fn transaction(&self, id: Uuid) -> Result<Option<Transaction>, StoreError> {
        Ok(self.read().transactions.get(&id).cloned())
    }

    fn transactions_for_user(&self, user_id: Uuid) -> Result<Vec<Transaction>, StoreError> {
        let mut entries: Vec<Transaction> = self
            .read()
            .transactions
            .values()
            .filter(|txn| txn.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }

    fn delete_transaction(&self, id: Uuid) -> Result<(), StoreError> {
        self.write().transactions.remove(&id);
        Ok(())
    }

    fn insert_budget(&self, budget: &Budget) -> Result<(), StoreError> {
        self.write().budgets.insert(budget.id, budget.clone());
        Ok(())
    }

    fn update_budget(&self, budget: &Budget) -> Result<(), StoreError> {
        let mut data = self.write();
        if !data.budgets.contains_key(&budget.id) {
            return Err(StoreError::Missing("budget"));
        }
        data.budgets.insert(budget.id, budget.clone());
        Ok(())
    }

    fn delete_budget(&self, id: Uuid) -> Result<(), StoreError> {
        self.write().budgets.remove(&id);
        Ok(())
    }

    fn budget(&self, id: Uuid) -> Result<Option<Budget>, StoreError> {
        Ok(self.read().budgets.get(&id).cloned())
    }

    fn budget_for_month(
        &self,
        user_id: Uuid,
        month: MonthKey,
    ) -> Result<Option<Budget>, StoreError> {
        Ok(self
            .read()
            .budgets
            .values()
            .find(|budget| budget.user_id == user_id && budget.month == month)
            .cloned())
    }

    fn budgets_for_user(&self, user_id: Uuid) -> Result<Vec<Budget>, StoreError> {
        let mut entries: Vec<Budget> = self
            .read()
            .budgets
            .values()
            .filter(|budget| budget.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.month.cmp(&a.month));
        Ok(entries)
    }

    fn insert_goal(&self, goal: &Goal) -> Result<(), StoreError> {
        self.write().goals.insert(goal.id, goal.clone());
        Ok(())
    }

    fn update_goal(&self, goal: &Goal) -> Result<(), StoreError> {
        let mut data = self.write();
        if !data.goals.contains_key(&goal.id) {
            return Err(StoreError::Missing("goal"));
        }
        data.goals.insert(goal.id, goal.clone());
        Ok(())
    }

    fn delete_goal(&self, id: Uuid) -> Result<(), StoreError> {
        self.write().goals.remove(&id);
        Ok(())
    }

    fn goal(&self, id: Uuid) -> Result<Option<Goal>, StoreError> {
        Ok(self.read().goals.get(&id).cloned())
    }

    fn goals_for_user(&self, user_id: Uuid) -> Result<Vec<Goal>, StoreError> {
        let mut entries: Vec<Goal> = self
            .read()
            .goals
            .values()
            .filter(|goal| goal.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by_key(|goal| goal.deadline);
        Ok(entries)
    }

    fn insert_reminder(&self, reminder: &Reminder) -> Result<(), StoreError> {
        self.write().reminders.insert(reminder.id, reminder.clone());
        Ok(())
    }

    fn update_reminder(&self, reminder: &Reminder) -> Result<(), StoreError> {
        let mut data = self.write();
        if !data.reminders.contains_key(&reminder.id) {
            return Err(StoreError::Missing("reminder"));
        }
        data.reminders.insert(reminder.id, reminder.clone());
        Ok(())
    }

    fn delete_reminder(&self, id: Uuid) -> Result<(), StoreError> {
        self.write().reminders.remove(&id);
        Ok(())
    }

    fn reminder(&self, id: Uuid) -> Result<Option<Reminder>, StoreError> {
        Ok(self.read().reminders.get(&id).cloned())
    }

    fn reminders_for_user(&self, user_id: Uuid) -> Result<Vec<Reminder>, StoreError> {
        let mut entries: Vec<Reminder> = self
            .read()
            .reminders
            .values()
            .filter(|reminder| reminder.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by_key(|reminder| reminder.due_date);
        Ok(entries)
    }

    fn insert_rule(&self, rule: &RecurringRule) -> Result<(), StoreError> {
        self.write().rules.insert(rule.id, rule.clone());
        Ok(())
    }

    fn update_rule(&self, rule: &RecurringRule, expected_version: u64) -> Result<(), StoreError> {
        let mut data = self.write();
        let stored = data
            .rules
            .get(&rule.id)
            .ok_or(StoreError::Missing("recurring rule"))?;
        if stored.version != expected_version {
            return Err(StoreError::VersionConflict("recurring rule"));
        }
        data.rules.insert(rule.id, rule.clone());
        Ok(())
    }

    fn delete_rule(&self, id: Uuid) -> Result<(), StoreError> {
        self.write().rules.remove(&id);
        Ok(())
    }

    fn rule(&self, id: Uuid) -> Result<Option<RecurringRule>, StoreError> {
        Ok(self.read().rules.get(&id).cloned())
    }

    fn rules_for_user(&self, user_id: Uuid) -> Result<Vec<RecurringRule>, StoreError> {
        let mut entries: Vec<RecurringRule> = self
            .read()
            .rules
            .values()
            .filter(|rule| rule.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by_key(|rule| rule.id);
        Ok(entries)
    }

    fn insert_notification(&self, notification: &Notification) -> Result<(), StoreError> {
        self.write()
            .notifications
            .insert(notification.id, notification.clone());
        Ok(())
    }

    fn notifications_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, StoreError> {
        let mut entries: Vec<Notification> = self
            .read()
            .notifications
            .values()
            .filter(|notification| notification.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }
}
