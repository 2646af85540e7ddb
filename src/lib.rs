//! Finance Core provides the balance, ledger, budgeting, goal, reminder, and
//! recurring-transaction primitives behind a personal-finance tracker, plus
//! the application engine that keeps them mutually consistent.

pub mod domain;
pub mod engine;
pub mod errors;
pub mod services;
pub mod store;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("finance_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
        tracing::info!("Finance Core tracing initialized.");
    });
}
