use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::Account;

/// The two named balances owned by a user. Mutated only through the balance
/// mutator so every change leaves a matching ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Balances {
    pub user_id: Uuid,
    pub current: f64,
    pub savings: f64,
}

impl Balances {
    /// Creates a zeroed balance pair for a user.
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            current: 0.0,
            savings: 0.0,
        }
    }

    pub fn with_amounts(user_id: Uuid, current: f64, savings: f64) -> Self {
        Self {
            user_id,
            current,
            savings,
        }
    }

    pub fn amount_in(&self, account: Account) -> f64 {
        match account {
            Account::Current => self.current,
            Account::Savings => self.savings,
        }
    }

    pub fn set(&mut self, account: Account, value: f64) {
        match account {
            Account::Current => self.current = value,
            Account::Savings => self.savings = value,
        }
    }
}
