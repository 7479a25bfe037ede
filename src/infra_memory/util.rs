use super::repo_tx_memory::MemoryTx;
use crate::application_port::BuddyError;
use crate::domain_port::StorageTx;

pub fn downcast<'a, 't>(tx: &'a mut dyn StorageTx<'t>) -> Result<&'a mut MemoryTx, BuddyError> {
    tx.as_any_mut()
        .and_then(|any| any.downcast_mut::<MemoryTx>())
        .ok_or_else(|| BuddyError::Store("transaction does not belong to the memory store".into()))
}
