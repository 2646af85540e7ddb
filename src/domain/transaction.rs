use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::{Account, Direction, MonthKey};

/// An immutable ledger entry. `resulting_balance` is a snapshot of the
/// mutated account taken immediately after the movement was applied; it is
/// never recomputed later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub direction: Direction,
    pub account: Account,
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub timestamp: NaiveDateTime,
    pub resulting_balance: f64,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: Uuid,
        direction: Direction,
        account: Account,
        amount: f64,
        description: impl Into<String>,
        category: impl Into<String>,
        timestamp: NaiveDateTime,
        resulting_balance: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            direction,
            account,
            amount,
            description: description.into(),
            category: category.into(),
            timestamp,
            resulting_balance,
        }
    }

    /// Calendar month this entry belongs to, for budget addressing.
    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.timestamp.date())
    }
}
