use crate::domain_model::*;
use crate::domain_port::*;
use redis::aio::ConnectionManager;
use redis::{
    AsyncCommands, FromRedisValue, RedisError, RedisResult, RedisWrite, ToRedisArgs, Value,
};

/// Sessions as `{prefix}:{session_id} -> user id` with a sliding TTL.
pub struct RedisSessionStore {
    conn: ConnectionManager,
    prefix: String,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>, ttl_secs: u64) -> Self {
        RedisSessionStore {
            conn,
            prefix: prefix.into(),
            ttl_secs,
        }
    }

    fn key(&self, session_id: &str) -> String {
        format!("{}:{}", self.prefix, session_id)
    }
}

impl ToRedisArgs for UserId {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + RedisWrite,
    {
        out.write_arg(self.to_string().as_bytes())
    }
}

impl FromRedisValue for UserId {
    fn from_redis_value(v: &Value) -> RedisResult<Self> {
        let s: String = redis::from_redis_value(v)?;
        s.parse::<UserId>().map_err(|e| {
            RedisError::from((
                redis::ErrorKind::TypeError,
                "invalid UserId string",
                e.to_string(),
            ))
        })
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    async fn open(&self, user_id: UserId) -> Result<String, SessionError> {
        let session_id = nanoid::nanoid!(32);
        let key = self.key(&session_id);
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(&key, &user_id, self.ttl_secs)
            .await
            .map_err(|e| SessionError::Store(e.to_string()))?;
        Ok(session_id)
    }

    async fn resolve(&self, session_id: &str) -> Result<Option<UserId>, SessionError> {
        let key = self.key(session_id);
        let mut conn = self.conn.clone();
        let user_id: Option<UserId> = conn
            .get(&key)
            .await
            .map_err(|e| SessionError::Store(e.to_string()))?;
        if user_id.is_some() {
            let _: bool = conn
                .expire(&key, self.ttl_secs as i64)
                .await
                .map_err(|e| SessionError::Store(e.to_string()))?;
        }
        Ok(user_id)
    }

    async fn close(&self, session_id: &str) -> Result<(), SessionError> {
        let key = self.key(session_id);
        let mut conn = self.conn.clone();
        let _: () = conn
            .del(&key)
            .await
            .map_err(|e| SessionError::Store(e.to_string()))?;
        Ok(())
    }
}
