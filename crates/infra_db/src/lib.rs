//! Infrastructure Database Layer
//!
//! This crate provides the database infrastructure for the clinic billing
//! system on PostgreSQL using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern, providing data access
//! abstractions that hide the database implementation details from the
//! domain layer. Embedded sequences (a bill's items and payments) are
//! stored as JSONB alongside the scalar columns, so each bill remains a
//! single row that is read, modified, and written back whole.
//!
//! Bill numbers are reserved from a database sequence (`bill_number_seq`),
//! making assignment atomic under concurrent creation.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{DatabaseConfig, create_pool, BillRepository};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/clinicbill")).await?;
//! let bills = BillRepository::new(pool);
//! ```

pub mod error;
pub mod pool;
pub mod repositories;

pub use error::DatabaseError;
pub use pool::{create_lazy_pool, create_pool, create_pool_from_url, DatabaseConfig, DatabasePool};
pub use repositories::bill::{BillFilter, BillRepository};
pub use repositories::patient::{PatientPage, PatientRepository};

/// Applies the bundled schema migrations
///
/// # Errors
///
/// Returns `DatabaseError::MigrationFailed` if a migration cannot be applied
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    tracing::info!("Running database migrations");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
    tracing::info!("Database schema up to date");
    Ok(())
}
