use crate::application_port::BuddyError;
use crate::domain_model::{UserId, UserView};

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    async fn get_self(&self, me: UserId) -> Result<UserView, BuddyError>;
    async fn get_user(&self, user_id: UserId) -> Result<UserView, BuddyError>;
    async fn set_pairing_enabled(&self, me: UserId, enabled: bool) -> Result<(), BuddyError>;
}
