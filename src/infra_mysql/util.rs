use super::repo_tx_mysql::MySqlTx;
use crate::application_port::BuddyError;
use crate::domain_port::*;

/// Recovers the concrete transaction behind a `StorageTx` handed to a MySQL repo.
///
/// The server wires MySQL repos only with `MySqlTxManager`, so every transaction
/// reaching this function is a `MySqlTx`.
pub fn downcast<'a, 't>(tx: &'a mut dyn StorageTx<'t>) -> &'a mut MySqlTx<'t> {
    // SAFETY: see the wiring contract above; the vtable is discarded and the data
    // pointer is reinterpreted as the only `StorageTx` type this backend creates.
    unsafe {
        let p: *mut (dyn StorageTx<'t> + 'a) = tx;
        let p = p as *mut MySqlTx<'t>;
        &mut *p
    }
}

pub fn store_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> BuddyError {
    move |e| BuddyError::Store(format!("{context}: {e}"))
}
