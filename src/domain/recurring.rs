use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Account, Direction};

/// How often a recurring rule fires.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    /// Fires when today's day-of-month matches. A day beyond the length of
    /// the current month never fires that month; it is not clamped.
    Monthly { day_of_month: u32 },
}

/// A user-defined template that periodically generates a transaction.
/// `last_applied` is the sole de-duplication marker and is persisted together
/// with the balance and ledger writes of an application. `version` backs the
/// store's compare-and-set so concurrent engine runs cannot both apply the
/// same rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringRule {
    pub id: Uuid,
    pub user_id: Uuid,
    pub direction: Direction,
    pub account: Account,
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub frequency: Frequency,
    #[serde(default)]
    pub last_applied: Option<NaiveDateTime>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub version: u64,
}

fn default_active() -> bool {
    true
}

impl RecurringRule {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: Uuid,
        direction: Direction,
        account: Account,
        amount: f64,
        description: impl Into<String>,
        category: impl Into<String>,
        frequency: Frequency,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            direction,
            account,
            amount,
            description: description.into(),
            category: category.into(),
            frequency,
            last_applied: None,
            is_active: true,
            version: 0,
        }
    }
}
