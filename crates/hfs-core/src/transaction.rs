//! Scoped commit/rollback around mutations a host performs with engine output.
//!
//! The engine never mutates host state itself. Hosts that own an undo stack
//! implement [`TransactionManager`] and the engine brackets each request with
//! [`run_in_transaction`].

use log::{debug, warn};

use crate::error::Result;

/// An open transaction. Exactly one of `commit` or `abort` is called.
pub trait Transaction {
    fn commit(self) -> Result<()>;
    fn abort(self);
}

/// Host capability that opens named transactions.
pub trait TransactionManager {
    type Transaction: Transaction;

    fn start(&mut self, name: &str) -> Result<Self::Transaction>;
}

/// Run `body` inside a transaction named `name`.
///
/// Commits when `body` succeeds and aborts when it fails. The error from
/// `body` is returned unchanged; nothing is retried.
pub fn run_in_transaction<M, T, F>(manager: &mut M, name: &str, body: F) -> Result<T>
where
    M: TransactionManager,
    F: FnOnce() -> Result<T>,
{
    let transaction = manager.start(name)?;
    debug!("transaction '{}' started", name);
    match body() {
        Ok(value) => {
            transaction.commit()?;
            debug!("transaction '{}' committed", name);
            Ok(value)
        }
        Err(err) => {
            warn!("transaction '{}' aborted: {}", name, err);
            transaction.abort();
            Err(err)
        }
    }
}

/// Transaction manager for hosts without an undo stack.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTransactions;

#[derive(Debug)]
pub struct NoTransaction;

impl Transaction for NoTransaction {
    fn commit(self) -> Result<()> {
        Ok(())
    }

    fn abort(self) {}
}

impl TransactionManager for NoTransactions {
    type Transaction = NoTransaction;

    fn start(&mut self, _name: &str) -> Result<NoTransaction> {
        Ok(NoTransaction)
    }
}
