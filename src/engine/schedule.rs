//! Recurrence scheduling: decides whether a rule fires at a given instant.
//! `last_applied` advances only after a successful application, so a skipped
//! rule is retried on the next eligible run.

use chrono::{Datelike, NaiveDateTime};

use crate::domain::{Frequency, RecurringRule};

/// Returns whether `rule` is due at `now`.
pub fn is_due(rule: &RecurringRule, now: NaiveDateTime) -> bool {
    match rule.frequency {
        Frequency::Daily => rule
            .last_applied
            .map_or(true, |last| last.date() != now.date()),
        Frequency::Weekly => rule
            .last_applied
            .map_or(true, |last| (now - last).num_days() >= 7),
        Frequency::Monthly { day_of_month } => {
            now.day() == day_of_month
                && rule.last_applied.map_or(true, |last| {
                    (last.year(), last.month()) != (now.year(), now.month())
                })
        }
    }
}
