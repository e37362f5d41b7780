//! SQLite adapters.
//!
//! One module per table. Statement functions take `&mut SqliteConnection` so
//! the same code runs on a pooled connection or inside a transaction
//! (`&mut *tx`). Each module keeps its SQL in named `const` strings.
//!
//! ## Error mapping
//!
//! | sqlx error | mapped to |
//! |---|---|
//! | `Database` (constraint, syntax, ...) | `Storage`, message names the operation |
//! | `PoolClosed` / `PoolTimedOut` | `Storage` |
//! | anything else | `Storage` |
//!
//! Zero affected rows on an insert is an `Integrity` failure; on an update by
//! primary key it is `NotFound`.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use storefront_auth::AccountError;
use storefront_cart::CartError;
use storefront_catalog::CatalogError;

pub mod account;
pub mod attribute;
pub mod cart;
pub mod catalog;
pub mod category;
pub mod family;
pub mod schema;
pub mod variant;

pub use account::SqliteAccountStore;
pub use cart::SqliteCartStore;
pub use catalog::{SqliteCatalogStore, SqliteCatalogTx};

const MAX_FILE_CONNECTIONS: u32 = 8;

/// Open a pool for `url` (`sqlite://path.db` or `sqlite::memory:`).
///
/// An in-memory database lives inside a single connection, so memory URLs get
/// a one-connection pool that never recycles it.
pub async fn connect(url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

    let pool = if is_memory_url(url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(MAX_FILE_CONNECTIONS)
            .connect_with(options)
            .await?
    };
    Ok(pool)
}

/// Connect and create any missing tables.
pub async fn connect_and_bootstrap(url: &str) -> Result<SqlitePool, sqlx::Error> {
    let pool = connect(url).await?;
    schema::bootstrap(&pool).await?;
    Ok(pool)
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

fn describe_sqlx_error(operation: &str, err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => {
            format!("database error in {operation}: {}", db_err.message())
        }
        sqlx::Error::PoolClosed => format!("connection pool closed in {operation}"),
        sqlx::Error::PoolTimedOut => format!("connection pool timed out in {operation}"),
        other => format!("sqlx error in {operation}: {other}"),
    }
}

pub(crate) fn catalog_storage_error(operation: &str, err: sqlx::Error) -> CatalogError {
    CatalogError::storage(describe_sqlx_error(operation, &err))
}

pub(crate) fn cart_storage_error(operation: &str, err: sqlx::Error) -> CartError {
    CartError::Storage(describe_sqlx_error(operation, &err))
}

pub(crate) fn account_storage_error(operation: &str, err: sqlx::Error) -> AccountError {
    AccountError::Storage(describe_sqlx_error(operation, &err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_urls_are_detected() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite://file:shop?mode=memory&cache=shared"));
        assert!(!is_memory_url("sqlite://storefront.db"));
    }

    #[test]
    fn messages_name_the_operation() {
        let err = catalog_storage_error("insert_family", sqlx::Error::PoolClosed);
        assert_eq!(
            err,
            CatalogError::Storage("connection pool closed in insert_family".into())
        );
    }
}
