//! Business logic helpers for bill reminders.

use chrono::{Months, NaiveDate};
use uuid::Uuid;

use crate::domain::Reminder;
use crate::services::{ServiceError, ServiceResult};
use crate::store::Store;

/// Provides validated CRUD helpers for reminders, including the paid-to-next
/// roll-forward for recurring templates.
pub struct ReminderService;

impl ReminderService {
    pub fn create(
        store: &dyn Store,
        user_id: Uuid,
        amount: f64,
        description: &str,
        due_date: NaiveDate,
        is_recurring: bool,
    ) -> ServiceResult<Reminder> {
        let description = validate(amount, description)?;
        let reminder = Reminder::new(user_id, amount, description, due_date, is_recurring);
        store.insert_reminder(&reminder)?;
        Ok(reminder)
    }

    pub fn update(
        store: &dyn Store,
        id: Uuid,
        amount: f64,
        description: &str,
        due_date: NaiveDate,
        is_recurring: bool,
    ) -> ServiceResult<Reminder> {
        let description = validate(amount, description)?;
        let mut reminder = store
            .reminder(id)?
            .ok_or(ServiceError::NotFound("reminder"))?;
        reminder.amount = amount;
        reminder.description = description;
        reminder.due_date = due_date;
        reminder.is_recurring = is_recurring;
        store.update_reminder(&reminder)?;
        Ok(reminder)
    }

    /// Marks the reminder paid. For a recurring template this spawns exactly
    /// one successor due a calendar month later (day clamped to shorter
    /// months), returned alongside the paid reminder.
    pub fn mark_paid(
        store: &dyn Store,
        id: Uuid,
    ) -> ServiceResult<(Reminder, Option<Reminder>)> {
        let mut reminder = store
            .reminder(id)?
            .ok_or(ServiceError::NotFound("reminder"))?;
        reminder.is_paid = true;
        store.update_reminder(&reminder)?;

        let successor = if reminder.is_recurring {
            let next_due = reminder
                .due_date
                .checked_add_months(Months::new(1))
                .ok_or_else(|| ServiceError::Invalid("due date out of range".into()))?;
            let next = Reminder::new(
                reminder.user_id,
                reminder.amount,
                reminder.description.clone(),
                next_due,
                true,
            );
            store.insert_reminder(&next)?;
            Some(next)
        } else {
            None
        };

        Ok((reminder, successor))
    }

    pub fn remove(store: &dyn Store, id: Uuid) -> ServiceResult<()> {
        store
            .reminder(id)?
            .ok_or(ServiceError::NotFound("reminder"))?;
        store.delete_reminder(id)?;
        Ok(())
    }

    /// All reminders for the user, earliest due date first.
    pub fn list(store: &dyn Store, user_id: Uuid) -> ServiceResult<Vec<Reminder>> {
        Ok(store.reminders_for_user(user_id)?)
    }
}

fn validate(amount: f64, description: &str) -> ServiceResult<String> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ServiceError::Invalid(
            "amount must be a positive number".into(),
        ));
    }
    let description = description.trim();
    if description.is_empty() {
        return Err(ServiceError::Invalid("description is required".into()));
    }
    Ok(description.to_string())
}
