use anyhow::{Result, anyhow, bail};
use config::{Config, File};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub http: Http,
    pub log: Log,
    pub session: Session,
    pub socketio: SocketIo,
    pub store: Store,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Http {
    pub address: String,
    /// TLS is enabled only when both paths are set.
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub backend: String, // "memory" or "redis"
    pub redis_dsn: Option<String>,
    pub key_prefix: String,
    pub ttl_secs: u64,
    /// Fixed session id to user id, honoured by the memory backend only.
    #[serde(default)]
    pub dev_sessions: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SocketIo {
    pub backend: String, // "log" or "socket"
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Store {
    pub backend: String, // "memory" or "mysql"
    pub mysql_dsn: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// JSON seed for the memory backend.
    pub seed_path: Option<String>,
}

fn default_max_connections() -> u32 {
    10
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        match self.store.backend.as_str() {
            "memory" => {}
            "mysql" if self.store.mysql_dsn.is_some() => {}
            "mysql" => bail!("store.mysql_dsn is required for the mysql backend"),
            other => bail!("Unknown store backend: {}", other),
        }
        match self.session.backend.as_str() {
            "memory" => {}
            "redis" if !self.session.dev_sessions.is_empty() => {
                bail!("session.dev_sessions is only supported by the memory backend")
            }
            "redis" if self.session.redis_dsn.is_some() => {}
            "redis" => bail!("session.redis_dsn is required for the redis backend"),
            other => bail!("Unknown session backend: {}", other),
        }
        match self.socketio.backend.as_str() {
            "log" | "socket" => {}
            other => bail!("Unknown socketio backend: {}", other),
        }
        if self.http.cert_path.is_some() != self.http.key_path.is_some() {
            bail!("http.cert_path and http.key_path must be set together");
        }
        Ok(())
    }
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_settings_parse() {
        let dev = parse_settings(Some("settings/dev.toml")).unwrap();
        assert_eq!(dev.store.backend, "memory");
        assert_eq!(dev.socketio.port, 8085);
        assert_eq!(dev.session.dev_sessions.get("dev1"), Some(&1));

        let release = parse_settings(Some("settings/release.toml")).unwrap();
        assert_eq!(release.store.backend, "mysql");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(parse_settings(Some("settings/does-not-exist.toml")).is_err());
    }

    #[test]
    fn mysql_without_dsn_is_rejected() {
        let mut settings = parse_settings(Some("settings/dev.toml")).unwrap();
        settings.store.backend = "mysql".into();
        settings.store.mysql_dsn = None;
        assert!(settings.validate().is_err());

        settings.store.backend = "sqlite".into();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn half_configured_tls_is_rejected() {
        let mut settings = parse_settings(Some("settings/dev.toml")).unwrap();
        settings.http.cert_path = Some("cert.pem".into());
        settings.http.key_path = None;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn dev_sessions_need_memory_backend() {
        let mut settings = parse_settings(Some("settings/dev.toml")).unwrap();
        settings.session.backend = "redis".into();
        settings.session.redis_dsn = Some("redis://127.0.0.1/".into());
        assert!(settings.validate().is_err());

        settings.session.dev_sessions.clear();
        assert!(settings.validate().is_ok());
    }
}
