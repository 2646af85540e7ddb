use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::MonthKey;

/// A monthly spending guardrail. `spent_so_far` is a running total of
/// withdrawals maintained incrementally by the effect cascade, not recomputed
/// from the ledger. At most one budget exists per user per month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub month: MonthKey,
    pub limit: f64,
    pub spent_so_far: f64,
}

impl Budget {
    pub fn new(user_id: Uuid, month: MonthKey, limit: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            month,
            limit,
            spent_so_far: 0.0,
        }
    }

    /// Spent-to-limit ratio as a percentage.
    pub fn spent_percentage(&self) -> f64 {
        (self.spent_so_far / self.limit) * 100.0
    }
}
