//! Validated CRUD and reporting helpers for the collaborators around the
//! engine. Services are stateless and operate directly on the store; the
//! engine owns every operation that moves money.

pub mod budget_service;
pub mod goal_service;
pub mod recurring_service;
pub mod reminder_service;
pub mod summary_service;

pub use budget_service::BudgetService;
pub use goal_service::GoalService;
pub use recurring_service::RecurringService;
pub use reminder_service::ReminderService;
pub use summary_service::{MonthlySummary, SummaryService};

use crate::store::StoreError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Invalid(String),
    #[error("{0} not found")]
    NotFound(&'static str),
}
