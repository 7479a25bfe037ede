use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

pub struct MemorySessionStore {
    sessions: DashMap<String, (UserId, DateTime<Utc>)>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        MemorySessionStore {
            sessions: DashMap::new(),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Registers a fixed session id that never expires. Used for local development,
    /// where no authentication service is around to open sessions.
    pub fn pin(&self, session_id: impl Into<String>, user_id: UserId) {
        self.sessions
            .insert(session_id.into(), (user_id, DateTime::<Utc>::MAX_UTC));
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn open(&self, user_id: UserId) -> Result<String, SessionError> {
        let now = Utc::now();
        self.sessions.retain(|_, (_, expire_at)| *expire_at > now);

        let session_id = nanoid::nanoid!(32);
        self.sessions
            .insert(session_id.clone(), (user_id, now + self.ttl));
        Ok(session_id)
    }

    async fn resolve(&self, session_id: &str) -> Result<Option<UserId>, SessionError> {
        let now = Utc::now();
        let found = self
            .sessions
            .get(session_id)
            .map(|entry| *entry.value());

        match found {
            Some((user_id, expire_at)) if expire_at > now => Ok(Some(user_id)),
            Some(_) => {
                self.sessions.remove(session_id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn close(&self, session_id: &str) -> Result<(), SessionError> {
        self.sessions.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_resolve_close() {
        let store = MemorySessionStore::new(60);
        let session = store.open(UserId(2)).await.unwrap();

        assert_eq!(store.resolve(&session).await.unwrap(), Some(UserId(2)));
        assert_eq!(store.resolve("nope").await.unwrap(), None);

        store.close(&session).await.unwrap();
        assert_eq!(store.resolve(&session).await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_session_resolves_to_none() {
        let store = MemorySessionStore::new(0);
        let session = store.open(UserId(2)).await.unwrap();
        assert_eq!(store.resolve(&session).await.unwrap(), None);
    }

    #[tokio::test]
    async fn open_drops_expired_sessions() {
        let store = MemorySessionStore::new(0);
        for _ in 0..3 {
            store.open(UserId(2)).await.unwrap();
        }
        assert_eq!(store.sessions.len(), 1);
    }

    #[tokio::test]
    async fn pinned_session_survives_pruning() {
        let store = MemorySessionStore::new(0);
        store.pin("dev1", UserId(1));
        store.open(UserId(2)).await.unwrap();
        store.open(UserId(2)).await.unwrap();

        assert_eq!(store.resolve("dev1").await.unwrap(), Some(UserId(1)));
    }
}
