use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;

/// Symmetric buddy links, one record per unordered pair.
#[async_trait::async_trait]
pub trait BuddyRepo: Send + Sync {
    /// Returns false if the link already existed.
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        pair: UserPair,
    ) -> Result<bool, BuddyError>;

    /// Returns false if there was nothing to delete.
    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        pair: UserPair,
    ) -> Result<bool, BuddyError>;

    /// Every user linked to `user_id`, blocks not applied, ascending.
    async fn list_neighbor_ids_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
    ) -> Result<Vec<UserId>, BuddyError>;
}
