//! Business logic helpers for recurring-transaction rules. Application of a
//! due rule belongs to the engine; this service only manages the templates.

use uuid::Uuid;

use crate::domain::{Account, Direction, Frequency, RecurringRule};
use crate::services::{ServiceError, ServiceResult};
use crate::store::Store;

/// Provides validated CRUD helpers for recurring rules.
pub struct RecurringService;

impl RecurringService {
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        store: &dyn Store,
        user_id: Uuid,
        direction: Direction,
        account: Account,
        amount: f64,
        description: &str,
        category: &str,
        frequency: Frequency,
    ) -> ServiceResult<RecurringRule> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ServiceError::Invalid(
                "amount must be a positive number".into(),
            ));
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(ServiceError::Invalid("description is required".into()));
        }
        if let Frequency::Monthly { day_of_month } = frequency {
            if !(1..=31).contains(&day_of_month) {
                return Err(ServiceError::Invalid(
                    "day of month must be 1-31".into(),
                ));
            }
        }
        let category = category.trim();
        let category = if category.is_empty() {
            "Uncategorized"
        } else {
            category
        };

        let rule = RecurringRule::new(
            user_id,
            direction,
            account,
            amount,
            description,
            category,
            frequency,
        );
        store.insert_rule(&rule)?;
        Ok(rule)
    }

    /// Updates the descriptive fields and the active flag. Frequency, amount,
    /// and the application marker are immutable once created.
    pub fn update(
        store: &dyn Store,
        id: Uuid,
        description: &str,
        category: &str,
        is_active: bool,
    ) -> ServiceResult<RecurringRule> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ServiceError::Invalid("description is required".into()));
        }
        let rule = store.rule(id)?.ok_or(ServiceError::NotFound("recurring rule"))?;
        let mut updated = rule.clone();
        updated.description = description.to_string();
        updated.category = if category.trim().is_empty() {
            "Uncategorized".to_string()
        } else {
            category.trim().to_string()
        };
        updated.is_active = is_active;
        updated.version = rule.version + 1;
        store.update_rule(&updated, rule.version)?;
        Ok(updated)
    }

    pub fn remove(store: &dyn Store, id: Uuid) -> ServiceResult<()> {
        store.rule(id)?.ok_or(ServiceError::NotFound("recurring rule"))?;
        store.delete_rule(id)?;
        Ok(())
    }

    pub fn list(store: &dyn Store, user_id: Uuid) -> ServiceResult<Vec<RecurringRule>> {
        Ok(store.rules_for_user(user_id)?)
    }
}
