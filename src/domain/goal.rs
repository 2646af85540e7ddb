use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A savings goal. `progress` counts total savings deposited since creation;
/// every savings deposit adds its full amount to every goal independently,
/// it is not an allocated share.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub target_amount: f64,
    pub progress: f64,
    pub deadline: NaiveDate,
    pub created_at: NaiveDate,
}

impl Goal {
    pub fn new(
        user_id: Uuid,
        description: impl Into<String>,
        target_amount: f64,
        deadline: NaiveDate,
        created_at: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            description: description.into(),
            target_amount,
            progress: 0.0,
            deadline,
            created_at,
        }
    }

    pub fn progress_percentage(&self) -> f64 {
        (self.progress / self.target_amount) * 100.0
    }
}
