use std::sync::Arc;

use shoplist_core::catalog::CatalogService;
use shoplist_core::config::{AppConfig, ConfigError, LoadOptions};
use shoplist_core::recommendation::{RecommendationService, RegistryError};
use shoplist_db::{connect_with_settings, migrations, DbPool, RepositoryCatalogStore};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub service: Arc<RecommendationService>,
    pub catalog: Arc<CatalogService>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("strategy registry could not be built: {0}")]
    Registry(#[from] RegistryError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let registry = config.strategy_registry()?;
    info!(
        event_name = "system.bootstrap.registry_ready",
        correlation_id = "bootstrap",
        configured_rules = config.recommendation.rules.len(),
        strategies = ?registry.registered_types(),
        "recommendation strategies registered"
    );

    let store = Arc::new(RepositoryCatalogStore::sql(db_pool.clone()));
    let service = RecommendationService::new(store.clone(), Arc::new(registry))
        .with_default_limit(config.recommendation.default_limit);
    let catalog = CatalogService::new(store);

    Ok(Application { config, db_pool, service: Arc::new(service), catalog: Arc::new(catalog) })
}
