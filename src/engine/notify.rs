//! The notification evaluator. Inspects the current month's budget, every
//! goal, and unpaid reminders, emitting at most one notification per distinct
//! message per user per calendar day. Budget tiers are checked highest-first
//! and only the first match emits; the three checks are independent of each
//! other.

use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::domain::{MonthKey, Notification, Severity};
use crate::errors::EngineError;
use crate::store::Store;

const REMINDER_WINDOW_DAYS: i64 = 3;

/// Runs all checks for a user at `now` and returns the newly created
/// notifications. Idempotent within a calendar day for unchanged inputs.
pub fn evaluate(
    store: &dyn Store,
    user_id: Uuid,
    now: NaiveDateTime,
) -> Result<Vec<Notification>, EngineError> {
    let today = now.date();
    let mut created = Vec::new();

    if let Some(budget) = store.budget_for_month(user_id, MonthKey::from_date(today))? {
        if let Some((message, severity)) = budget_message(budget.spent_percentage()) {
            emit(store, user_id, message, severity, now, &mut created)?;
        }
    }

    for goal in store.goals_for_user(user_id)? {
        let days_left = (goal.deadline - today).num_days();
        let total_days = (goal.deadline - goal.created_at).num_days();
        let midpoint = total_days as f64 / 2.0;
        if days_left > 0 && days_left as f64 <= midpoint && goal.progress_percentage() < 50.0 {
            let message = format!("You're behind on your \"{}\" goal", goal.description);
            emit(store, user_id, message, Severity::Warning, now, &mut created)?;
        }
    }

    for reminder in store.reminders_for_user(user_id)? {
        if reminder.is_paid {
            continue;
        }
        let days_until_due = (reminder.due_date - today).num_days();
        if (0..=REMINDER_WINDOW_DAYS).contains(&days_until_due) {
            let message = format!(
                "Reminder: {} (${:.2}) due in {} day(s)",
                reminder.description, reminder.amount, days_until_due
            );
            emit(store, user_id, message, Severity::Alert, now, &mut created)?;
        }
    }

    Ok(created)
}

/// Highest matching budget tier, if any.
fn budget_message(percentage: f64) -> Option<(String, Severity)> {
    if percentage >= 100.0 {
        Some((
            format!("Budget exceeded by {:.1}%", percentage - 100.0),
            Severity::Critical,
        ))
    } else if percentage >= 95.0 {
        Some(("Critical: almost at limit".into(), Severity::Critical))
    } else if percentage >= 90.0 {
        Some(("Alert: 90% of budget used".into(), Severity::Alert))
    } else if percentage >= 80.0 {
        Some(("Warning: 80% of budget spent".into(), Severity::Warning))
    } else {
        None
    }
}

/// Inserts the notification unless an identical message already exists for
/// this user since local midnight.
fn emit(
    store: &dyn Store,
    user_id: Uuid,
    message: String,
    severity: Severity,
    now: NaiveDateTime,
    created: &mut Vec<Notification>,
) -> Result<(), EngineError> {
    if already_notified_today(store, user_id, &message, now.date())? {
        tracing::debug!(user = %user_id, %message, "suppressing duplicate notification");
        return Ok(());
    }
    let notification = Notification::new(user_id, message, severity, now);
    store.insert_notification(&notification)?;
    created.push(notification);
    Ok(())
}

fn already_notified_today(
    store: &dyn Store,
    user_id: Uuid,
    message: &str,
    today: NaiveDate,
) -> Result<bool, EngineError> {
    let midnight = today.and_hms_opt(0, 0, 0).unwrap();
    Ok(store
        .notifications_for_user(user_id)?
        .iter()
        .any(|existing| existing.message == message && existing.created_at >= midnight))
}
