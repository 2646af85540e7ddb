use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A bill reminder. Marking a recurring reminder paid spawns exactly one
/// successor due a calendar month later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    pub description: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub is_recurring: bool,
}

impl Reminder {
    pub fn new(
        user_id: Uuid,
        amount: f64,
        description: impl Into<String>,
        due_date: NaiveDate,
        is_recurring: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            amount,
            description: description.into(),
            due_date,
            is_paid: false,
            is_recurring,
        }
    }
}
