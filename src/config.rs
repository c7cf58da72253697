use std::env;
use std::time::Duration;

use deadpool_postgres::{Config as PgConfig, PoolConfig};

use crate::error::DbError;
use crate::types::DatabaseType;

/// Server configuration, loaded from environment variables exactly once at
/// startup. Nothing re-reads the environment after this.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Which backend to run against.
    pub backend: DatabaseType,
    /// Path to the SQLite database file.
    pub sqlite_path: String,
    /// Postgres connection settings (ignored when the backend is SQLite).
    pub pg: PgSettings,
}

/// Connection and pool settings for the Postgres backend.
#[derive(Debug, Clone)]
pub struct PgSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    /// Bounded pool size.
    pub pool_max_size: usize,
    /// Timeout for establishing / waiting on a connection.
    pub connect_timeout: Duration,
    /// TCP keepalive idle interval, standing in for an idle timeout.
    pub idle_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Config` for unparseable values, including an
    /// unknown `TASKBOARD_DB_BACKEND`.
    pub fn from_env() -> Result<Self, DbError> {
        let backend = match env::var("TASKBOARD_DB_BACKEND") {
            Ok(v) => match v.to_lowercase().as_str() {
                "sqlite" => DatabaseType::Sqlite,
                "postgres" | "postgresql" => DatabaseType::Postgres,
                other => {
                    return Err(DbError::Config(format!(
                        "unknown TASKBOARD_DB_BACKEND '{other}' (expected sqlite or postgres)"
                    )));
                }
            },
            Err(_) => DatabaseType::Sqlite,
        };

        Ok(Self {
            host: env::var("TASKBOARD_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env("TASKBOARD_PORT", 3000)?,
            backend,
            sqlite_path: env::var("TASKBOARD_SQLITE_PATH")
                .unwrap_or_else(|_| "taskboard.db".to_string()),
            pg: PgSettings {
                host: env::var("TASKBOARD_PG_HOST").unwrap_or_else(|_| "localhost".to_string()),
                port: parse_env("TASKBOARD_PG_PORT", 5432)?,
                user: env::var("TASKBOARD_PG_USER").unwrap_or_else(|_| "postgres".to_string()),
                password: env::var("TASKBOARD_PG_PASSWORD").unwrap_or_default(),
                dbname: env::var("TASKBOARD_PG_DBNAME")
                    .unwrap_or_else(|_| "taskboard".to_string()),
                pool_max_size: parse_env("TASKBOARD_PG_POOL_SIZE", 16)?,
                connect_timeout: Duration::from_secs(parse_env(
                    "TASKBOARD_PG_CONNECT_TIMEOUT_SECS",
                    5,
                )?),
                idle_timeout: Duration::from_secs(parse_env(
                    "TASKBOARD_PG_IDLE_TIMEOUT_SECS",
                    600,
                )?),
            },
        })
    }

    /// Address the HTTP listener binds to.
    #[must_use]
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the deadpool config for the Postgres backend.
    #[must_use]
    pub fn pg_config(&self) -> PgConfig {
        let mut cfg = PgConfig::new();
        cfg.host = Some(self.pg.host.clone());
        cfg.port = Some(self.pg.port);
        cfg.user = Some(self.pg.user.clone());
        cfg.password = Some(self.pg.password.clone());
        cfg.dbname = Some(self.pg.dbname.clone());
        cfg.connect_timeout = Some(self.pg.connect_timeout);
        cfg.keepalives_idle = Some(self.pg.idle_timeout);

        let mut pool_cfg = PoolConfig::new(self.pg.pool_max_size);
        pool_cfg.timeouts.create = Some(self.pg.connect_timeout);
        pool_cfg.timeouts.wait = Some(self.pg.connect_timeout);
        cfg.pool = Some(pool_cfg);

        cfg
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, DbError> {
    match env::var(name) {
        Ok(v) => v
            .parse()
            .map_err(|_| DbError::Config(format!("invalid value for {name}: '{v}'"))),
        Err(_) => Ok(default),
    }
}
