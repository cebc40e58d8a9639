//! Orderdesk Order Store
//!
//! Schema lifecycle, validated order persistence, latest-N retrieval, and the
//! grouped aggregations behind the order dashboard. The presentation layer
//! (form + charts) is an external collaborator that calls in through
//! [`OrderStore`] or the individual modules.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod aggregate;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod migrator;
pub mod services;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::error;

use crate::errors::StoreError;
use crate::services::orders::OrderService;

/// Handle bundling the connection pool and the order service.
///
/// Collaborators connect once at startup, call [`OrderStore::ensure_schema`]
/// (or set `auto_migrate` in config), and halt on failure rather than accept
/// input against an unknown schema.
#[derive(Clone)]
pub struct OrderStore {
    db: Arc<DatabaseConnection>,
    orders: OrderService,
}

impl OrderStore {
    /// Connects to the store described by `cfg`, running migrations when
    /// `cfg.auto_migrate` is set.
    pub async fn connect(cfg: &config::AppConfig) -> Result<Self, StoreError> {
        let pool = db::establish_connection_from_app_config(cfg).await?;
        let store = Self::from_pool(Arc::new(pool));

        if cfg.auto_migrate {
            store.ensure_schema().await.map_err(|e| {
                error!("Failed running migrations: {}", e);
                e
            })?;
        }

        Ok(store)
    }

    /// Wraps an already-established pool.
    pub fn from_pool(db: Arc<DatabaseConnection>) -> Self {
        let orders = OrderService::new(db.clone());
        Self { db, orders }
    }

    /// Creates the order schema if it does not already exist.
    ///
    /// Idempotent: safe to call repeatedly and from concurrent process
    /// instances. On `SchemaError` callers abort startup.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        db::run_migrations(&self.db).await
    }

    /// Pings the underlying store.
    pub async fn check_connection(&self) -> Result<(), StoreError> {
        db::check_connection(&self.db).await
    }

    pub fn orders(&self) -> &OrderService {
        &self.orders
    }

    pub fn db(&self) -> &Arc<DatabaseConnection> {
        &self.db
    }
}
