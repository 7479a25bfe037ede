use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;

#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    async fn get_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
    ) -> Result<Option<UserRecord>, BuddyError>;

    /// Rows for the ids that exist, ascending by id.
    async fn get_many_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_ids: &[UserId],
    ) -> Result<Vec<UserRecord>, BuddyError>;

    /// Existence check that holds the user's row until the transaction ends.
    async fn lock_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
    ) -> Result<bool, BuddyError>;

    /// Returns false when no such user exists.
    async fn set_pairing_enabled_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
        enabled: bool,
    ) -> Result<bool, BuddyError>;
}
