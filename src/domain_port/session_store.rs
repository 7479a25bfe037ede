use crate::domain_model::*;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("store error: {0}")]
    Store(String),
}

/// Server-side sessions carrying the `UserId` attribute.
///
/// Sessions are opened by the authentication collaborator; this service only
/// resolves them on each request.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a session for `user_id` and return its id.
    async fn open(&self, user_id: UserId) -> Result<String, SessionError>;
    /// `None` for unknown or expired sessions.
    async fn resolve(&self, session_id: &str) -> Result<Option<UserId>, SessionError>;
    async fn close(&self, session_id: &str) -> Result<(), SessionError>;
}
