pub mod error;
pub mod tolerance;
pub mod traits;
pub mod transaction;

pub use error::{HfsError, Result};
pub use tolerance::Tolerance;
pub use transaction::{run_in_transaction, NoTransactions, Transaction, TransactionManager};
