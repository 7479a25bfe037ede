use crate::domain_model::*;

/// Coarse classification the request boundary maps onto status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    Storage,
}

#[derive(Debug, thiserror::Error)]
pub enum BuddyError {
    #[error("user not found")]
    UserNotFound,
    #[error("course not found")]
    CourseNotFound,
    #[error("cannot target yourself")]
    SelfTarget,
    #[error("pair is blocked")]
    Blocked,
    #[error("store error: {0}")]
    Store(String),
}

impl BuddyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuddyError::UserNotFound | BuddyError::CourseNotFound => ErrorKind::NotFound,
            BuddyError::SelfTarget | BuddyError::Blocked => ErrorKind::Forbidden,
            BuddyError::Store(_) => ErrorKind::Storage,
        }
    }
}

/// Owner of the buddy relation and the block relation.
///
/// Every listing is ascending by user id and excludes pairs blocked in either
/// direction. Every mutation commits in one transaction.
#[async_trait::async_trait]
pub trait BuddyService: Send + Sync {
    async fn get_user(&self, user_id: UserId) -> Result<UserView, BuddyError>;
    async fn list_buddies(&self, me: UserId) -> Result<Vec<UserView>, BuddyError>;
    async fn list_buddies_in_course(
        &self,
        me: UserId,
        course_id: CourseId,
    ) -> Result<Vec<UserView>, BuddyError>;
    async fn list_blocked(&self, me: UserId) -> Result<Vec<UserView>, BuddyError>;
    async fn add_buddy(&self, me: UserId, other: UserId) -> Result<(), BuddyError>;
    async fn remove_buddy(&self, me: UserId, other: UserId) -> Result<(), BuddyError>;
    async fn block(&self, me: UserId, other: UserId) -> Result<(), BuddyError>;
    /// Lifts only `me`'s block on `other`. A dissolved link is not restored.
    async fn unblock(&self, me: UserId, other: UserId) -> Result<(), BuddyError>;
}
