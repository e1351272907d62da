//! Relational store the loader and benchmark drive
//!
//! Everything goes through [`Store`]: one blocking connection, held for the
//! whole run, with every mutation inside an explicit transaction.

mod pg;
pub mod schema;
mod sqlite;

#[cfg(test)]
pub(crate) mod testing;

use crate::config::{Backend, StoreConfig};
use crate::error::Result;
use crate::product::Product;

pub use self::pg::PostgresStore;
pub use self::sqlite::SqliteStore;

/// Client operations required from the external store
pub trait Store {
    /// Which backend this is
    fn backend(&self) -> Backend;

    /// Create the `Products` table (and any extension it needs) if absent
    fn ensure_schema(&mut self) -> Result<()>;

    /// Trade crash safety for throughput for the rest of this session
    fn relax_durability(&mut self) -> Result<()>;

    /// Undo [`Store::relax_durability`]
    fn restore_durability(&mut self) -> Result<()>;

    /// Register the parameterised product insert; later batches reuse it
    fn prepare_insert(&mut self) -> Result<()>;

    /// Insert `rows` through the prepared statement in one transaction.
    ///
    /// Nothing from the batch is visible unless the whole batch commits.
    fn insert_batch(&mut self, rows: &[Product]) -> Result<()>;

    /// Run an ad-hoc statement in its own transaction, drain the result set
    /// and commit. Returns the number of rows fetched.
    fn run_query(&mut self, sql: &str) -> Result<usize>;

    /// Run DDL statements together in a single transaction
    fn execute_ddl(&mut self, statements: &[&str]) -> Result<()>;

    /// Whether an index with this name currently exists
    fn index_exists(&mut self, name: &str) -> Result<bool>;

    /// Current number of rows in `Products`
    fn row_count(&mut self) -> Result<i64>;
}

/// Open the store described by `config`. Failure is not retried.
pub fn connect(config: &StoreConfig) -> Result<Box<dyn Store>> {
    match config.backend {
        Backend::Postgres => Ok(Box::new(PostgresStore::connect(&config.url)?)),
        Backend::Sqlite => Ok(Box::new(SqliteStore::open(&config.path)?)),
    }
}

/// Hide the password part of a connection URI for display
pub fn redact_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let authority_start = scheme_end + 3;
    let authority_end = url[authority_start..]
        .find('/')
        .map_or(url.len(), |i| authority_start + i);
    let authority = &url[authority_start..authority_end];

    let Some(at) = authority.rfind('@') else {
        return url.to_string();
    };
    let userinfo = &authority[..at];
    let Some(colon) = userinfo.find(':') else {
        return url.to_string();
    };

    format!(
        "{}{}:***{}",
        &url[..authority_start],
        &userinfo[..colon],
        &url[authority_start + at..]
    )
}
