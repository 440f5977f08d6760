use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tracing::info;
use vendas_core::config::{AppConfig, ConfigError};
use vendas_core::{CatalogService, OrderService, StoreError};
use vendas_db::{
    connect_with_config, migrations, CatalogSeed, DbPool, SeedResult, SqlCatalogRepository,
    SqlOrderRepository,
};

use crate::{api, health};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub catalog: CatalogService,
    pub orders: OrderService,
    pub seed: Option<SeedResult>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("catalog seed failed: {0}")]
    Seed(#[source] StoreError),
}

impl Application {
    /// Full HTTP surface: catalog and order API plus the health check.
    pub fn router(&self) -> Router {
        let state = api::ApiState::new(self.catalog.clone(), self.orders.clone());
        let router = api::router(state).merge(health::router(self.db_pool.clone()));

        if self.config.server.cors_permissive {
            router.layer(CorsLayer::permissive())
        } else {
            router
        }
    }
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool =
        connect_with_config(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
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

    let catalog_store = Arc::new(SqlCatalogRepository::new(db_pool.clone()));
    let order_store = Arc::new(SqlOrderRepository::new(db_pool.clone()));

    let seed = if config.catalog.seed_on_startup {
        Some(CatalogSeed::load_if_empty(catalog_store.as_ref()).await.map_err(BootstrapError::Seed)?)
    } else {
        None
    };

    let catalog = CatalogService::new(catalog_store.clone(), config.catalog.max_page_size);
    let orders = OrderService::new(catalog_store, order_store, config.orders.quantity_policy);

    Ok(Application { config, db_pool, catalog, orders, seed })
}
