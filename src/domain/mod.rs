//! Domain entities shared by the engine, the store, and the service layer.

pub mod budget;
pub mod common;
pub mod goal;
pub mod notification;
pub mod profile;
pub mod recurring;
pub mod reminder;
pub mod transaction;

pub use budget::Budget;
pub use common::{Account, Direction, MonthKey, Severity};
pub use goal::Goal;
pub use notification::Notification;
pub use profile::Balances;
pub use recurring::{Frequency, RecurringRule};
pub use reminder::Reminder;
pub use transaction::Transaction;
