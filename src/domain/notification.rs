use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::Severity;

/// A user-facing alert raised by the notification evaluator. The evaluator
/// suppresses duplicates keyed by (user, exact message text, calendar day).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub severity: Severity,
    pub created_at: NaiveDateTime,
}

impl Notification {
    pub fn new(
        user_id: Uuid,
        message: impl Into<String>,
        severity: Severity,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            message: message.into(),
            severity,
            created_at,
        }
    }
}
