//! Business logic helpers for managing monthly budgets.

use uuid::Uuid;

use crate::domain::{Budget, MonthKey};
use crate::services::{ServiceError, ServiceResult};
use crate::store::Store;

/// Provides validated CRUD helpers for budgets. A user may hold at most one
/// budget per calendar month.
pub struct BudgetService;

impl BudgetService {
    /// Creates a budget for the month, rejecting duplicates.
    pub fn create(
        store: &dyn Store,
        user_id: Uuid,
        month: MonthKey,
        limit: f64,
    ) -> ServiceResult<Budget> {
        validate_limit(limit)?;
        if store.budget_for_month(user_id, month)?.is_some() {
            return Err(ServiceError::Invalid(format!(
                "budget for {month} already exists"
            )));
        }
        let budget = Budget::new(user_id, month, limit);
        store.insert_budget(&budget)?;
        Ok(budget)
    }

    /// Parses a `YYYY-MM` key and creates the budget.
    pub fn create_from_key(
        store: &dyn Store,
        user_id: Uuid,
        month: &str,
        limit: f64,
    ) -> ServiceResult<Budget> {
        let month: MonthKey = month.parse().map_err(ServiceError::Invalid)?;
        Self::create(store, user_id, month, limit)
    }

    /// Replaces the spending limit; the running total is untouched.
    pub fn update_limit(store: &dyn Store, id: Uuid, limit: f64) -> ServiceResult<Budget> {
        validate_limit(limit)?;
        let mut budget = store.budget(id)?.ok_or(ServiceError::NotFound("budget"))?;
        budget.limit = limit;
        store.update_budget(&budget)?;
        Ok(budget)
    }

    pub fn remove(store: &dyn Store, id: Uuid) -> ServiceResult<()> {
        store.budget(id)?.ok_or(ServiceError::NotFound("budget"))?;
        store.delete_budget(id)?;
        Ok(())
    }

    /// All budgets for the user, most recent month first.
    pub fn list(store: &dyn Store, user_id: Uuid) -> ServiceResult<Vec<Budget>> {
        Ok(store.budgets_for_user(user_id)?)
    }
}

fn validate_limit(limit: f64) -> ServiceResult<()> {
    if !limit.is_finite() || limit <= 0.0 {
        return Err(ServiceError::Invalid(
            "budget amount must be a positive number".into(),
        ));
    }
    Ok(())
}
