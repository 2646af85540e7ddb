//! The effect cascade: propagates an applied ledger movement into the budget
//! and goal aggregates. Budgets track withdrawals for their month; goals
//! track savings deposits. A savings deposit adds its full amount to every
//! goal independently, it is not split across goals.

use uuid::Uuid;

use crate::domain::{Account, Direction, MonthKey};
use crate::store::{Store, StoreError};

/// Folds an applied movement into the month's budget and the user's goals.
/// A missing budget for the month is a no-op, not an error.
pub fn apply(
    store: &dyn Store,
    user_id: Uuid,
    direction: Direction,
    account: Account,
    amount: f64,
    month: MonthKey,
) -> Result<(), StoreError> {
    if direction == Direction::Withdrawal {
        if let Some(mut budget) = store.budget_for_month(user_id, month)? {
            budget.spent_so_far += amount;
            store.update_budget(&budget)?;
        }
    }
    if direction == Direction::Deposit && account == Account::Savings {
        for mut goal in store.goals_for_user(user_id)? {
            goal.progress += amount;
            store.update_goal(&goal)?;
        }
    }
    Ok(())
}

/// Reverses [`apply`] for the same movement, clamping both aggregates at
/// zero. Used when a ledger entry is deleted.
pub fn reverse(
    store: &dyn Store,
    user_id: Uuid,
    direction: Direction,
    account: Account,
    amount: f64,
    month: MonthKey,
) -> Result<(), StoreError> {
    if direction == Direction::Withdrawal {
        if let Some(mut budget) = store.budget_for_month(user_id, month)? {
            budget.spent_so_far = (budget.spent_so_far - amount).max(0.0);
            store.update_budget(&budget)?;
        }
    }
    if direction == Direction::Deposit && account == Account::Savings {
        for mut goal in store.goals_for_user(user_id)? {
            goal.progress = (goal.progress - amount).max(0.0);
            store.update_goal(&goal)?;
        }
    }
    Ok(())
}
