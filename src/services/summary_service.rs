//! Monthly reporting over the ledger.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::domain::{Direction, MonthKey};
use crate::services::ServiceResult;
use crate::store::Store;

/// Income, expenses, and the per-category withdrawal breakdown for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub month: MonthKey,
    pub total_income: f64,
    pub total_expenses: f64,
    pub by_category: BTreeMap<String, f64>,
}

pub struct SummaryService;

impl SummaryService {
    /// Summarizes the user's ledger entries for a calendar month. Deposits
    /// count as income, withdrawals as expenses; only withdrawals contribute
    /// to the category breakdown.
    pub fn monthly(
        store: &dyn Store,
        user_id: Uuid,
        month: MonthKey,
    ) -> ServiceResult<MonthlySummary> {
        let mut summary = MonthlySummary {
            month,
            total_income: 0.0,
            total_expenses: 0.0,
            by_category: BTreeMap::new(),
        };
        for transaction in store.transactions_for_user(user_id)? {
            if transaction.month() != month {
                continue;
            }
            match transaction.direction {
                Direction::Deposit => summary.total_income += transaction.amount,
                Direction::Withdrawal => {
                    summary.total_expenses += transaction.amount;
                    *summary
                        .by_category
                        .entry(transaction.category.clone())
                        .or_insert(0.0) += transaction.amount;
                }
            }
        }
        Ok(summary)
    }
}
