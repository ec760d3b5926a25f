//! # landai-db
//!
//! PostgreSQL database layer for LandAI.
//!
//! This crate provides:
//! - Connection pool management
//! - Document and message repositories with transaction-scoped (`_tx`)
//!   methods the pipeline coordinator composes into one atomic run
//! - Embedded sqlx migrations (feature `migrations`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use landai_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> landai_core::Result<()> {
//!     let db = Database::connect("postgres://localhost/landai").await?;
//!     let docs = db.documents.list_for_user(user_id).await?;
//!     Ok(())
//! }
//! ```

pub mod documents;
pub mod messages;
pub mod pool;

// Always compiled so integration tests (in tests/) can use the harness.
pub mod test_fixtures;

// Re-export core types
pub use landai_core::*;

pub use documents::PgDocumentRepository;
pub use messages::PgMessageRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Document repository.
    pub documents: PgDocumentRepository,
    /// Chat message repository.
    pub messages: PgMessageRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            documents: PgDocumentRepository::new(pool.clone()),
            messages: PgMessageRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect with default pool configuration.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Connect with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
