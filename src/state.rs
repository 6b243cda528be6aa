use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::auth::jwt::JwtKeys;
use crate::config::{AppConfig, StoreKind};
use crate::users::{memory::InMemoryUserStore, PgUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    db: Option<PgPool>,
}

impl AppState {
    /// Connect the configured store and run migrations.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        let jwt = JwtKeys::from_config(&config.jwt);

        let (store, db) = match config.store {
            StoreKind::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL is not set")?;
                let db = PgPoolOptions::new()
                    .max_connections(config.db_max_connections)
                    .connect(url)
                    .await
                    .context("connect to database")?;
                sqlx::migrate!("./migrations")
                    .run(&db)
                    .await
                    .context("run migrations")?;
                info!("connected to postgres");
                (Arc::new(PgUserStore::new(db.clone())) as Arc<dyn UserStore>, Some(db))
            }
            StoreKind::Memory => {
                info!("using in-memory user store; data is not persisted");
                (Arc::new(InMemoryUserStore::new()) as Arc<dyn UserStore>, None)
            }
        };

        Ok(Self {
            store,
            config,
            jwt,
            db,
        })
    }

    /// Release store resources once the server has stopped.
    pub async fn shutdown(&self) {
        if let Some(db) = &self.db {
            db.close().await;
            info!("database pool closed");
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            store: StoreKind::Memory,
            database_url: None,
            db_max_connections: 1,
            jwt: crate::config::JwtConfig {
                secret: "test".into(),
            },
            host: "127.0.0.1".into(),
            port: 0,
        });

        Self {
            store: Arc::new(InMemoryUserStore::new()),
            jwt: JwtKeys::from_config(&config.jwt),
            config,
            db: None,
        }
    }
}
