//! Application state - shared across all handlers.

use std::sync::Arc;

use blogstore_core::UnitOfWork;
use blogstore_core::ports::{BlogRepository, ChangeStore, PostRepository};
use blogstore_infra::{DatabaseConfig, InMemoryStore};

/// Shared application state.
///
/// Holds only shareable handles; every request opens its own [`UnitOfWork`].
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ChangeStore>,
    pub blogs: Arc<dyn BlogRepository>,
    pub posts: Arc<dyn PostRepository>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        let state = match db_config {
            Some(config) => match blogstore_infra::database::connect(config).await {
                Ok(conn) => {
                    use blogstore_infra::{
                        PostgresBlogRepository, PostgresChangeStore, PostgresPostRepository,
                    };

                    // One pool behind every adapter.
                    let conn = Arc::new(conn);
                    Self {
                        store: Arc::new(PostgresChangeStore::new(conn.clone())),
                        blogs: Arc::new(PostgresBlogRepository::new(conn.clone())),
                        posts: Arc::new(PostgresPostRepository::new(conn)),
                    }
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Self::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let state = {
            let _ = db_config;
            tracing::info!("Running without postgres feature - using in-memory store");
            Self::in_memory()
        };

        tracing::info!("Application state initialized");
        state
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            store: store.clone(),
            blogs: store.clone(),
            posts: store,
        }
    }

    /// A fresh unit of work for one request.
    pub fn unit_of_work(&self) -> UnitOfWork {
        UnitOfWork::new(self.store.clone())
    }
}
