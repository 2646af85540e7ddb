use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use finance_core::domain::{
    Account, Balances, Budget, Direction, Frequency, Goal, MonthKey, Notification, RecurringRule,
    Reminder, Transaction,
};
use finance_core::engine::Engine;
use finance_core::errors::EngineError;
use finance_core::store::{MemoryStore, Store, StoreError};

fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

fn engine() -> Engine {
    Engine::new(Arc::new(MemoryStore::new()))
}

fn daily_rule(user: Uuid, direction: Direction, account: Account, amount: f64) -> RecurringRule {
    RecurringRule::new(
        user,
        direction,
        account,
        amount,
        "Gym membership",
        "Health",
        Frequency::Daily,
    )
}

#[test]
fn applying_a_due_rule_moves_money_and_writes_the_ledger() {
    let engine = engine();
    let user = Uuid::new_v4();
    engine.set_balances(user, 100.0, 0.0).unwrap();
    engine
        .store()
        .insert_rule(&daily_rule(user, Direction::Withdrawal, Account::Current, 30.0))
        .unwrap();

    let report = engine.run_due_recurring_rules(user, at(2025, 6, 10)).unwrap();
    assert_eq!(report.applied, 1);
    assert_eq!(report.skipped_insufficient_funds, 0);

    let balances = engine.store().balances(user).unwrap().unwrap();
    assert_eq!(balances.current, 70.0);

    let ledger = engine.store().transactions_for_user(user).unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].description, "[Recurring] Gym membership");
    assert_eq!(ledger[0].category, "Health");
    assert_eq!(ledger[0].resulting_balance, 70.0);
}

#[test]
fn second_run_within_the_same_period_is_a_no_op() {
    let engine = engine();
    let user = Uuid::new_v4();
    engine.set_balances(user, 100.0, 0.0).unwrap();
    engine
        .store()
        .insert_rule(&daily_rule(user, Direction::Withdrawal, Account::Current, 30.0))
        .unwrap();

    let first = engine.run_due_recurring_rules(user, at(2025, 6, 10)).unwrap();
    assert_eq!(first.applied, 1);

    let second = engine.run_due_recurring_rules(user, at(2025, 6, 10)).unwrap();
    assert_eq!(second.applied, 0);

    assert_eq!(engine.store().balances(user).unwrap().unwrap().current, 70.0);
    assert_eq!(engine.store().transactions_for_user(user).unwrap().len(), 1);
}

#[test]
fn insufficient_funds_skips_without_advancing_the_marker() {
    let engine = engine();
    let user = Uuid::new_v4();
    engine.set_balances(user, 20.0, 0.0).unwrap();
    let rule = daily_rule(user, Direction::Withdrawal, Account::Current, 50.0);
    engine.store().insert_rule(&rule).unwrap();

    let report = engine.run_due_recurring_rules(user, at(2025, 6, 10)).unwrap();
    assert_eq!(report.applied, 0);
    assert_eq!(report.skipped_insufficient_funds, 1);

    // Nothing moved, nothing recorded, marker untouched.
    assert_eq!(engine.store().balances(user).unwrap().unwrap().current, 20.0);
    assert!(engine.store().transactions_for_user(user).unwrap().is_empty());
    let stored = engine.store().rule(rule.id).unwrap().unwrap();
    assert!(stored.last_applied.is_none());

    // Funded later the same day, the rule applies on retry.
    engine.set_balances(user, 80.0, 0.0).unwrap();
    let retry = engine.run_due_recurring_rules(user, at(2025, 6, 10)).unwrap();
    assert_eq!(retry.applied, 1);
    assert_eq!(engine.store().balances(user).unwrap().unwrap().current, 30.0);
}

#[test]
fn one_underfunded_rule_does_not_abort_the_batch() {
    let engine = engine();
    let user = Uuid::new_v4();
    engine.set_balances(user, 40.0, 0.0).unwrap();

    let mut expensive = daily_rule(user, Direction::Withdrawal, Account::Current, 500.0);
    expensive.description = "Rent".into();
    engine.store().insert_rule(&expensive).unwrap();
    engine
        .store()
        .insert_rule(&daily_rule(user, Direction::Withdrawal, Account::Current, 10.0))
        .unwrap();
    engine
        .store()
        .insert_rule(&daily_rule(user, Direction::Deposit, Account::Savings, 25.0))
        .unwrap();

    let report = engine.run_due_recurring_rules(user, at(2025, 6, 10)).unwrap();
    assert_eq!(report.applied, 2);
    assert_eq!(report.skipped_insufficient_funds, 1);

    let balances = engine.store().balances(user).unwrap().unwrap();
    assert_eq!(balances.current, 30.0);
    assert_eq!(balances.savings, 25.0);
}

#[test]
fn inactive_rules_are_ignored() {
    let engine = engine();
    let user = Uuid::new_v4();
    engine.set_balances(user, 100.0, 0.0).unwrap();
    let mut rule = daily_rule(user, Direction::Withdrawal, Account::Current, 30.0);
    rule.is_active = false;
    engine.store().insert_rule(&rule).unwrap();

    let report = engine.run_due_recurring_rules(user, at(2025, 6, 10)).unwrap();
    assert_eq!(report.applied, 0);
    assert_eq!(engine.store().balances(user).unwrap().unwrap().current, 100.0);
}

#[test]
fn monthly_rule_on_day_31_never_fires_in_february() {
    let engine = engine();
    let user = Uuid::new_v4();
    engine.set_balances(user, 1000.0, 0.0).unwrap();
    let rule = RecurringRule::new(
        user,
        Direction::Withdrawal,
        Account::Current,
        50.0,
        "Rent",
        "Housing",
        Frequency::Monthly { day_of_month: 31 },
    );
    engine.store().insert_rule(&rule).unwrap();

    for day in 1..=28 {
        let report = engine.run_due_recurring_rules(user, at(2025, 2, day)).unwrap();
        assert_eq!(report.applied, 0, "fired on 2025-02-{day:02}");
    }

    // It does fire in a 31-day month.
    let march = engine.run_due_recurring_rules(user, at(2025, 3, 31)).unwrap();
    assert_eq!(march.applied, 1);
}

#[test]
fn rule_application_cascades_into_budget_and_goals() {
    let engine = engine();
    let user = Uuid::new_v4();
    engine.set_balances(user, 500.0, 0.0).unwrap();
    engine
        .store()
        .insert_budget(&Budget::new(user, MonthKey::new(2025, 6).unwrap(), 400.0))
        .unwrap();
    engine
        .store()
        .insert_goal(&Goal::new(
            user,
            "Holiday",
            2000.0,
            NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        ))
        .unwrap();

    engine
        .store()
        .insert_rule(&daily_rule(user, Direction::Withdrawal, Account::Current, 60.0))
        .unwrap();
    engine
        .store()
        .insert_rule(&daily_rule(user, Direction::Deposit, Account::Savings, 75.0))
        .unwrap();

    engine.run_due_recurring_rules(user, at(2025, 6, 10)).unwrap();

    let budget = engine
        .store()
        .budget_for_month(user, MonthKey::new(2025, 6).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(budget.spent_so_far, 60.0);

    let goals = engine.store().goals_for_user(user).unwrap();
    assert_eq!(goals[0].progress, 75.0);
}

/// Store that edits every rule (bumping its version) right after the engine
/// reads the rule list, once, mimicking a rule update racing an engine run.
struct EditRacingStore {
    inner: MemoryStore,
    raced: AtomicBool,
}

impl EditRacingStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            raced: AtomicBool::new(false),
        }
    }
}

impl Store for EditRacingStore {
    fn balances(&self, user_id: Uuid) -> Result<Option<Balances>, StoreError> {
        self.inner.balances(user_id)
    }
    fn put_balances(&self, balances: &Balances) -> Result<(), StoreError> {
        self.inner.put_balances(balances)
    }
    fn insert_transaction(&self, transaction: &Transaction) -> Result<(), StoreError> {
        self.inner.insert_transaction(transaction)
    }
    fn transaction(&self, id: Uuid) -> Result<Option<Transaction>, StoreError> {
        self.inner.transaction(id)
    }
    fn transactions_for_user(&self, user_id: Uuid) -> Result<Vec<Transaction>, StoreError> {
        self.inner.transactions_for_user(user_id)
    }
    fn delete_transaction(&self, id: Uuid) -> Result<(), StoreError> {
        self.inner.delete_transaction(id)
    }
    fn insert_budget(&self, budget: &Budget) -> Result<(), StoreError> {
        self.inner.insert_budget(budget)
    }
    fn update_budget(&self, budget: &Budget) -> Result<(), StoreError> {
        self.inner.update_budget(budget)
    }
    fn delete_budget(&self, id: Uuid) -> Result<(), StoreError> {
        self.inner.delete_budget(id)
    }
    fn budget(&self, id: Uuid) -> Result<Option<Budget>, StoreError> {
        self.inner.budget(id)
    }
    fn budget_for_month(
        &self,
        user_id: Uuid,
        month: MonthKey,
    ) -> Result<Option<Budget>, StoreError> {
        self.inner.budget_for_month(user_id, month)
    }
    fn budgets_for_user(&self, user_id: Uuid) -> Result<Vec<Budget>, StoreError> {
        self.inner.budgets_for_user(user_id)
    }
    fn insert_goal(&self, goal: &Goal) -> Result<(), StoreError> {
        self.inner.insert_goal(goal)
    }
    fn update_goal(&self, goal: &Goal) -> Result<(), StoreError> {
        self.inner.update_goal(goal)
    }
    fn delete_goal(&self, id: Uuid) -> Result<(), StoreError> {
        self.inner.delete_goal(id)
    }
    fn goal(&self, id: Uuid) -> Result<Option<Goal>, StoreError> {
        self.inner.goal(id)
    }
    fn goals_for_user(&self, user_id: Uuid) -> Result<Vec<Goal>, StoreError> {
        self.inner.goals_for_user(user_id)
    }
    fn insert_reminder(&self, reminder: &Reminder) -> Result<(), StoreError> {
        self.inner.insert_reminder(reminder)
    }
    fn update_reminder(&self, reminder: &Reminder) -> Result<(), StoreError> {
        self.inner.update_reminder(reminder)
    }
    fn delete_reminder(&self, id: Uuid) -> Result<(), StoreError> {
        self.inner.delete_reminder(id)
    }
    fn reminder(&self, id: Uuid) -> Result<Option<Reminder>, StoreError> {
        self.inner.reminder(id)
    }
    fn reminders_for_user(&self, user_id: Uuid) -> Result<Vec<Reminder>, StoreError> {
        self.inner.reminders_for_user(user_id)
    }
    fn insert_rule(&self, rule: &RecurringRule) -> Result<(), StoreError> {
        self.inner.insert_rule(rule)
    }
    fn update_rule(&self, rule: &RecurringRule, expected_version: u64) -> Result<(), StoreError> {
        self.inner.update_rule(rule, expected_version)
    }
    fn delete_rule(&self, id: Uuid) -> Result<(), StoreError> {
        self.inner.delete_rule(id)
    }
    fn rule(&self, id: Uuid) -> Result<Option<RecurringRule>, StoreError> {
        self.inner.rule(id)
    }
    fn rules_for_user(&self, user_id: Uuid) -> Result<Vec<RecurringRule>, StoreError> {
        let rules = self.inner.rules_for_user(user_id)?;
        if !self.raced.swap(true, Ordering::SeqCst) {
            for rule in &rules {
                let mut edited = rule.clone();
                edited.description = "Edited elsewhere".into();
                edited.version = rule.version + 1;
                self.inner.update_rule(&edited, rule.version)?;
            }
        }
        Ok(rules)
    }
    fn insert_notification(&self, notification: &Notification) -> Result<(), StoreError> {
        self.inner.insert_notification(notification)
    }
    fn notifications_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, StoreError> {
        self.inner.notifications_for_user(user_id)
    }
}

#[test]
fn racing_rule_edit_conflicts_before_any_money_moves() {
    let store = Arc::new(EditRacingStore::new());
    let engine = Engine::new(store.clone());
    let user = Uuid::new_v4();
    engine.set_balances(user, 100.0, 0.0).unwrap();
    let rule = daily_rule(user, Direction::Withdrawal, Account::Current, 30.0);
    store.insert_rule(&rule).unwrap();

    let err = engine
        .run_due_recurring_rules(user, at(2025, 6, 10))
        .expect_err("stale rule version must conflict");
    assert!(matches!(err, EngineError::ConcurrentModification(_)));

    // The claim failed first, so no balance, ledger, or marker change.
    assert_eq!(engine.store().balances(user).unwrap().unwrap().current, 100.0);
    assert!(engine.store().transactions_for_user(user).unwrap().is_empty());
    let stored = engine.store().rule(rule.id).unwrap().unwrap();
    assert!(stored.last_applied.is_none());

    // The retry sees the edited rule and applies it exactly once.
    let retry = engine.run_due_recurring_rules(user, at(2025, 6, 10)).unwrap();
    assert_eq!(retry.applied, 1);
    assert_eq!(engine.store().balances(user).unwrap().unwrap().current, 70.0);
    assert_eq!(engine.store().transactions_for_user(user).unwrap().len(), 1);
}

#[test]
fn marker_advance_bumps_the_rule_version() {
    let engine = engine();
    let user = Uuid::new_v4();
    engine.set_balances(user, 100.0, 0.0).unwrap();
    let rule = daily_rule(user, Direction::Withdrawal, Account::Current, 10.0);
    engine.store().insert_rule(&rule).unwrap();

    engine.run_due_recurring_rules(user, at(2025, 6, 10)).unwrap();

    let stored = engine.store().rule(rule.id).unwrap().unwrap();
    assert_eq!(stored.version, 1);
    assert_eq!(stored.last_applied, Some(at(2025, 6, 10)));
}
