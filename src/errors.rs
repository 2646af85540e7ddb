use thiserror::Error;
use uuid::Uuid;

use crate::domain::Account;
use crate::store::StoreError;

/// Error type that captures failures of the application engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("insufficient funds in {account} account: requested {requested:.2}, available {available:.2}")]
    InsufficientFunds {
        account: Account,
        requested: f64,
        available: f64,
    },
    #[error("{0} not found: {1}")]
    NotFound(&'static str, Uuid),
    #[error("concurrent modification of {0}; retry the item")]
    ConcurrentModification(&'static str),
    #[error(transparent)]
    Storage(#[from] StoreError),
}
