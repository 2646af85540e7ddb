//! The balance mutator: the only code path that changes an account balance.
//! It touches exactly one named account and enforces non-negativity; amount
//! positivity is validated at the engine boundary before this runs.

use crate::domain::{Account, Balances, Direction};
use crate::errors::EngineError;

/// Applies a signed movement to one account and returns the new balance.
/// A withdrawal exceeding the balance fails with
/// [`EngineError::InsufficientFunds`] and leaves the pair untouched.
pub fn apply(
    balances: &mut Balances,
    account: Account,
    direction: Direction,
    amount: f64,
) -> Result<f64, EngineError> {
    let available = balances.amount_in(account);
    let updated = match direction {
        Direction::Deposit => available + amount,
        Direction::Withdrawal => {
            if available < amount {
                return Err(EngineError::InsufficientFunds {
                    account,
                    requested: amount,
                    available,
                });
            }
            available - amount
        }
    };
    balances.set(account, updated);
    Ok(updated)
}
