use crate::application_port::{BuddyError, BuddyService, UserService};
use crate::domain_model::{UserId, UserView};
use crate::domain_port::{TxManager, UserRepo};
use std::sync::Arc;
use tracing::info;

/// Session-scoped user operations. Views come from the buddy service so the
/// buddy count is always derived the same way.
pub struct RealUserService {
    user_repo: Arc<dyn UserRepo>,
    buddy_service: Arc<dyn BuddyService>,
    tx_manager: Arc<dyn TxManager>,
}

impl RealUserService {
    pub fn new(
        user_repo: Arc<dyn UserRepo>,
        buddy_service: Arc<dyn BuddyService>,
        tx_manager: Arc<dyn TxManager>,
    ) -> RealUserService {
        RealUserService {
            user_repo,
            buddy_service,
            tx_manager,
        }
    }
}

#[async_trait::async_trait]
impl UserService for RealUserService {
    async fn get_self(&self, me: UserId) -> Result<UserView, BuddyError> {
        self.buddy_service.get_user(me).await
    }

    async fn get_user(&self, user_id: UserId) -> Result<UserView, BuddyError> {
        self.buddy_service.get_user(user_id).await
    }

    async fn set_pairing_enabled(&self, me: UserId, enabled: bool) -> Result<(), BuddyError> {
        let mut tx = self
            .tx_manager
            .begin()
            .await
            .map_err(|e| BuddyError::Store(e.to_string()))?;

        if !self
            .user_repo
            .set_pairing_enabled_in_tx(&mut *tx, me, enabled)
            .await?
        {
            return Err(BuddyError::UserNotFound);
        }

        tx.commit()
            .await
            .map_err(|e| BuddyError::Store(e.to_string()))?;

        info!(%me, enabled, "pairing toggled");
        Ok(())
    }
}
