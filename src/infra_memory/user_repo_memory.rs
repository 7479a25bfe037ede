use super::util::downcast;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;

pub struct MemoryUserRepo;

#[async_trait::async_trait]
impl UserRepo for MemoryUserRepo {
    async fn get_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
    ) -> Result<Option<UserRecord>, BuddyError> {
        let tx = downcast(tx)?;
        Ok(tx.state().users.get(&user_id).cloned())
    }

    async fn get_many_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_ids: &[UserId],
    ) -> Result<Vec<UserRecord>, BuddyError> {
        let tx = downcast(tx)?;
        let users = &tx.state().users;

        let mut out: Vec<UserRecord> = user_ids
            .iter()
            .filter_map(|id| users.get(id).cloned())
            .collect();
        out.sort_by_key(|u| u.user_id);
        out.dedup_by_key(|u| u.user_id);
        Ok(out)
    }

    async fn lock_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
    ) -> Result<bool, BuddyError> {
        // the transaction already holds the store lock
        let tx = downcast(tx)?;
        Ok(tx.state().users.contains_key(&user_id))
    }

    async fn set_pairing_enabled_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
        enabled: bool,
    ) -> Result<bool, BuddyError> {
        let tx = downcast(tx)?;
        match tx.state().users.get_mut(&user_id) {
            Some(user) => {
                user.pairing_enabled = enabled;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
