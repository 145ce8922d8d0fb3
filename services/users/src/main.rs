use std::sync::Arc;

use anyhow::{Context, Result};
use common::database::{self, DatabaseConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use users::{
    AppState, MIGRATOR,
    config::{ServerConfig, StorageBackend},
    create_router,
    password::PasswordStorage,
    repositories::{InMemoryUserStore, PgUserStore, UserStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting users service");

    let config = ServerConfig::from_env().context("invalid users service configuration")?;

    let user_store: Arc<dyn UserStore> = match config.storage {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = database::init_pool(&db_config).await?;

            // Check database connectivity
            if database::health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            database::run_migrations(&pool, &MIGRATOR).await?;
            Arc::new(PgUserStore::new(pool))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory user storage; registrations are lost on restart");
            Arc::new(InMemoryUserStore::new())
        }
    };

    if config.password_storage == PasswordStorage::Plain {
        warn!("Passwords are stored as submitted; set USERS_PASSWORD_STORAGE=argon2 to hash them");
    }

    let app = create_router(AppState::new(user_store, config.password_storage));

    let listener = config
        .bind()
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    info!("Users service listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
