use clap::Parser;
use tracing_subscriber::EnvFilter;

use taskboard::http::{self, AppState};
use taskboard::{AppConfig, Database, DatabaseType, Store, schema};

/// Task-tracking HTTP backend.
#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about)]
struct Cli {
    /// Address to listen on (overrides TASKBOARD_HOST/TASKBOARD_PORT)
    #[arg(long)]
    listen: Option<String>,

    /// Backend to run against (overrides TASKBOARD_DB_BACKEND)
    #[arg(long, value_enum)]
    database: Option<DatabaseType>,

    /// SQLite database file (overrides TASKBOARD_SQLITE_PATH)
    #[arg(long)]
    sqlite_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(database) = cli.database {
        config.backend = database;
    }
    if let Some(path) = cli.sqlite_path {
        config.sqlite_path = path;
    }
    let addr = cli.listen.unwrap_or_else(|| config.server_addr());

    let db = Database::connect(&config).await?;
    {
        let mut conn = db.pool.get_connection().await?;
        schema::ensure_schema(&mut conn).await?;
    }

    let state = AppState {
        store: Store::new(db),
    };
    let app = http::router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, backend = ?config.backend, "taskboard listening");
    axum::serve(listener, app).await?;

    Ok(())
}
