use std::path::Path;

use rusqlite::{params, Connection};

use super::schema::{COUNT_SQL, SQLITE_INSERT_SQL, SQLITE_SCHEMA_SQL};
use super::Store;
use crate::config::Backend;
use crate::error::{BenchError, Result};
use crate::map_store_err;
use crate::product::Product;

/// SQLite store, file or in-memory.
///
/// The insert lives in the connection's statement cache; `prepare_insert`
/// parses it once and every batch picks up the cached plan.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    insert_prepared: bool,
}

impl SqliteStore {
    /// Open (or create) the database file at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| BenchError::connection(path.display(), e))?;
        tracing::info!(path = %path.display(), "opened sqlite database");
        Ok(Self::from_connection(conn))
    }

    /// Private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| BenchError::connection(":memory:", e))?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            insert_prepared: false,
        }
    }
}

impl Store for SqliteStore {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    fn ensure_schema(&mut self) -> Result<()> {
        self.conn
            .execute_batch(SQLITE_SCHEMA_SQL)
            .map_err(|e| map_store_err!("create schema", e))
    }

    fn relax_durability(&mut self) -> Result<()> {
        self.conn
            .pragma_update(None, "synchronous", "OFF")
            .map_err(|e| map_store_err!("relax durability", e))
    }

    fn restore_durability(&mut self) -> Result<()> {
        self.conn
            .pragma_update(None, "synchronous", "FULL")
            .map_err(|e| map_store_err!("restore durability", e))
    }

    fn prepare_insert(&mut self) -> Result<()> {
        self.conn
            .prepare_cached(SQLITE_INSERT_SQL)
            .map_err(|e| map_store_err!("prepare insert", e))?;
        self.insert_prepared = true;
        Ok(())
    }

    fn insert_batch(&mut self, rows: &[Product]) -> Result<()> {
        if !self.insert_prepared {
            return Err(BenchError::Other(
                "insert statement not prepared".to_string(),
            ));
        }

        let tx = self
            .conn
            .transaction()
            .map_err(|e| map_store_err!("begin batch", e))?;
        {
            let mut stmt = tx
                .prepare_cached(SQLITE_INSERT_SQL)
                .map_err(|e| map_store_err!("prepare insert", e))?;
            for row in rows {
                stmt.execute(params![
                    row.name,
                    row.description,
                    row.price,
                    row.stock_quantity,
                    row.category_id,
                ])
                .map_err(|e| map_store_err!("insert product", e))?;
            }
        }
        tx.commit().map_err(|e| map_store_err!("commit batch", e))
    }

    fn run_query(&mut self, sql: &str) -> Result<usize> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| map_store_err!("begin query", e))?;
        let fetched = {
            let mut stmt = tx.prepare(sql).map_err(|e| map_store_err!("run query", e))?;
            let mut rows = stmt.query([]).map_err(|e| map_store_err!("run query", e))?;
            let mut fetched = 0;
            while rows
                .next()
                .map_err(|e| map_store_err!("fetch row", e))?
                .is_some()
            {
                fetched += 1;
            }
            fetched
        };
        tx.commit().map_err(|e| map_store_err!("commit query", e))?;
        Ok(fetched)
    }

    fn execute_ddl(&mut self, statements: &[&str]) -> Result<()> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| map_store_err!("begin ddl", e))?;
        for statement in statements {
            tx.execute_batch(statement)
                .map_err(|e| map_store_err!("execute ddl", e))?;
        }
        tx.commit().map_err(|e| map_store_err!("commit ddl", e))
    }

    fn index_exists(&mut self, name: &str) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = ?1",
                [name],
                |row| row.get(0),
            )
            .map_err(|e| map_store_err!("look up index", e))?;
        Ok(count > 0)
    }

    fn row_count(&mut self) -> Result<i64> {
        self.conn
            .query_row(COUNT_SQL, [], |row| row.get(0))
            .map_err(|e| map_store_err!("count products", e))
    }
}
