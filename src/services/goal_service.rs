//! Business logic helpers for managing savings goals.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::Goal;
use crate::services::{ServiceError, ServiceResult};
use crate::store::Store;

/// Provides validated CRUD helpers for savings goals. Progress itself is
/// owned by the effect cascade and never edited here.
pub struct GoalService;

impl GoalService {
    pub fn create(
        store: &dyn Store,
        user_id: Uuid,
        description: &str,
        target_amount: f64,
        deadline: NaiveDate,
        today: NaiveDate,
    ) -> ServiceResult<Goal> {
        let description = validate(description, target_amount, deadline, today)?;
        let goal = Goal::new(user_id, description, target_amount, deadline, today);
        store.insert_goal(&goal)?;
        Ok(goal)
    }

    /// Updates the editable fields, leaving progress and creation date alone.
    pub fn update(
        store: &dyn Store,
        id: Uuid,
        description: &str,
        target_amount: f64,
        deadline: NaiveDate,
        today: NaiveDate,
    ) -> ServiceResult<Goal> {
        let description = validate(description, target_amount, deadline, today)?;
        let mut goal = store.goal(id)?.ok_or(ServiceError::NotFound("goal"))?;
        goal.description = description;
        goal.target_amount = target_amount;
        goal.deadline = deadline;
        store.update_goal(&goal)?;
        Ok(goal)
    }

    pub fn remove(store: &dyn Store, id: Uuid) -> ServiceResult<()> {
        store.goal(id)?.ok_or(ServiceError::NotFound("goal"))?;
        store.delete_goal(id)?;
        Ok(())
    }

    /// All goals for the user, earliest deadline first.
    pub fn list(store: &dyn Store, user_id: Uuid) -> ServiceResult<Vec<Goal>> {
        Ok(store.goals_for_user(user_id)?)
    }
}

fn validate(
    description: &str,
    target_amount: f64,
    deadline: NaiveDate,
    today: NaiveDate,
) -> ServiceResult<String> {
    if !target_amount.is_finite() || target_amount <= 0.0 {
        return Err(ServiceError::Invalid(
            "target amount must be a positive number".into(),
        ));
    }
    if deadline <= today {
        return Err(ServiceError::Invalid(
            "deadline must be in the future".into(),
        ));
    }
    let description = description.trim();
    if description.is_empty() {
        return Err(ServiceError::Invalid("description is required".into()));
    }
    Ok(description.to_string())
}
