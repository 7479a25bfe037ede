use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::{Seed, UserId};
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::server::*;
use crate::settings::Settings;
use sqlx::MySqlPool;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct Persistence {
    tx_manager: Arc<dyn TxManager>,
    user_repo: Arc<dyn UserRepo>,
    buddy_repo: Arc<dyn BuddyRepo>,
    block_repo: Arc<dyn BlockRepo>,
    course_repo: Arc<dyn CourseRepo>,
    pool: Option<MySqlPool>,
}

impl Persistence {
    async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        match settings.store.backend.as_str() {
            "memory" => {
                let seed = match settings.store.seed_path.as_deref() {
                    Some(path) => Seed::from_json_file(path)?,
                    None => Seed::default(),
                };
                info!(users = seed.users.len(), "memory store seeded");
                Ok(Self {
                    tx_manager: Arc::new(MemoryTxManager::new(MemoryState::from_seed(&seed)?)),
                    user_repo: Arc::new(MemoryUserRepo),
                    buddy_repo: Arc::new(MemoryBuddyRepo),
                    block_repo: Arc::new(MemoryBlockRepo),
                    course_repo: Arc::new(MemoryCourseRepo),
                    pool: None,
                })
            }
            "mysql" => {
                let dsn = settings
                    .store
                    .mysql_dsn
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("store.mysql_dsn is not set"))?;
                let tx_manager =
                    MySqlTxManager::connect(dsn, settings.store.max_connections).await?;
                let pool = tx_manager.pool().clone();
                Ok(Self {
                    tx_manager: Arc::new(tx_manager),
                    user_repo: Arc::new(MySqlUserRepo),
                    buddy_repo: Arc::new(MySqlBuddyRepo),
                    block_repo: Arc::new(MySqlBlockRepo),
                    course_repo: Arc::new(MySqlCourseRepo),
                    pool: Some(pool),
                })
            }
            other => Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        }
    }
}

pub struct Server {
    pub user_service: Arc<dyn UserService>,
    pub buddy_service: Arc<dyn BuddyService>,
    pub session_store: Arc<dyn SessionStore>,
    notifier_handle: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
    pool: Option<MySqlPool>,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        settings.validate()?;

        let cancel = CancellationToken::new();
        let persistence = Persistence::try_new(settings).await?;

        let session_store: Arc<dyn SessionStore> = match settings.session.backend.as_str() {
            "memory" => {
                let store = MemorySessionStore::new(settings.session.ttl_secs);
                for (session_id, user_id) in &settings.session.dev_sessions {
                    store.pin(session_id.clone(), UserId(*user_id));
                }
                if !settings.session.dev_sessions.is_empty() {
                    warn!(
                        count = settings.session.dev_sessions.len(),
                        "pinned development sessions are enabled"
                    );
                }
                Arc::new(store)
            }
            "redis" => {
                let dsn = settings
                    .session
                    .redis_dsn
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("session.redis_dsn is not set"))?;
                let redis_manager = redis::Client::open(dsn)?
                    .get_connection_manager()
                    .await?;
                Arc::new(RedisSessionStore::new(
                    redis_manager,
                    settings.session.key_prefix.clone(),
                    settings.session.ttl_secs,
                ))
            }
            other => return Err(anyhow::anyhow!("Unknown session backend: {}", other)),
        };

        let (event_sink, notifier_handle): (Arc<dyn BuddyEventSink>, Option<JoinHandle<()>>) =
            match settings.socketio.backend.as_str() {
                "log" => (Arc::new(LogNotifier), None),
                "socket" => {
                    let address = format!("{}:{}", settings.socketio.host, settings.socketio.port);
                    let (notifier, handle) = SocketNotifier::spawn(address, cancel.clone());
                    (Arc::new(notifier), Some(handle))
                }
                other => return Err(anyhow::anyhow!("Unknown socketio backend: {}", other)),
            };

        let buddy_service: Arc<dyn BuddyService> = Arc::new(RealBuddyService::new(
            persistence.user_repo.clone(),
            persistence.buddy_repo,
            persistence.block_repo,
            persistence.course_repo,
            event_sink,
            persistence.tx_manager.clone(),
        ));

        let user_service: Arc<dyn UserService> = Arc::new(RealUserService::new(
            persistence.user_repo,
            buddy_service.clone(),
            persistence.tx_manager,
        ));

        info!("server started");

        Ok(Self {
            user_service,
            buddy_service,
            session_store,
            notifier_handle: Mutex::new(notifier_handle),
            cancel,
            pool: persistence.pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        self.cancel.cancel();

        let handle = self.notifier_handle.lock().ok().and_then(|mut lock| lock.take());
        if let Some(handle) = handle {
            let r = handle.await;
            info!("notifier handle dropped: {:?}", r);
        }

        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
