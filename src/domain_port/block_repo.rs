use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::repo_tx::StorageTx;

/// Directional block records `(blocker, blocked)`.
#[async_trait::async_trait]
pub trait BlockRepo: Send + Sync {
    /// Returns false if the block already existed.
    async fn insert_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        blocker: UserId,
        blocked: UserId,
    ) -> Result<bool, BuddyError>;

    async fn delete_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        blocker: UserId,
        blocked: UserId,
    ) -> Result<bool, BuddyError>;

    async fn is_blocked_either_way_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        pair: UserPair,
    ) -> Result<bool, BuddyError>;

    /// Users blocked by `user_id` plus users blocking `user_id`.
    async fn list_counterparts_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        user_id: UserId,
    ) -> Result<Vec<UserId>, BuddyError>;

    /// Ascending.
    async fn list_blocked_by_in_tx<'t>(
        &self,
        tx: &mut dyn StorageTx<'t>,
        blocker: UserId,
    ) -> Result<Vec<UserId>, BuddyError>;
}
