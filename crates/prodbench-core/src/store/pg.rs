use postgres::{Client, NoTls, SimpleQueryMessage, Statement};

use super::schema::{
    COUNT_SQL, POSTGRES_INSERT_SQL, POSTGRES_RELAX_DURABILITY_SQL,
    POSTGRES_RESTORE_DURABILITY_SQL, POSTGRES_SCHEMA_SQL,
};
use super::{redact_url, Store};
use crate::config::Backend;
use crate::error::{BenchError, Result};
use crate::map_store_err;
use crate::product::Product;

/// PostgreSQL store over a single synchronous client
pub struct PostgresStore {
    client: Client,
    insert: Option<Statement>,
}

impl std::fmt::Debug for PostgresStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStore")
            .field("insert_prepared", &self.insert.is_some())
            .finish()
    }
}

impl PostgresStore {
    /// Connect once; a refused or unauthenticated connection is fatal
    pub fn connect(url: &str) -> Result<Self> {
        let client = Client::connect(url, NoTls)
            .map_err(|e| BenchError::connection(redact_url(url), e))?;
        tracing::info!(target_url = %redact_url(url), "connected to postgres");
        Ok(Self {
            client,
            insert: None,
        })
    }

    fn change_durability(&mut self, statement: &str) -> Result<()> {
        let mut tx = self
            .client
            .transaction()
            .map_err(|e| map_store_err!("begin session setup", e))?;
        tx.batch_execute(statement)
            .map_err(|e| map_store_err!("change synchronous_commit", e))?;
        tx.commit()
            .map_err(|e| map_store_err!("commit session setup", e))?;
        tracing::debug!(statement, "session durability changed");
        Ok(())
    }
}

impl Store for PostgresStore {
    fn backend(&self) -> Backend {
        Backend::Postgres
    }

    fn ensure_schema(&mut self) -> Result<()> {
        self.client
            .batch_execute(POSTGRES_SCHEMA_SQL)
            .map_err(|e| map_store_err!("create schema", e))
    }

    fn relax_durability(&mut self) -> Result<()> {
        self.change_durability(POSTGRES_RELAX_DURABILITY_SQL)
    }

    fn restore_durability(&mut self) -> Result<()> {
        self.change_durability(POSTGRES_RESTORE_DURABILITY_SQL)
    }

    fn prepare_insert(&mut self) -> Result<()> {
        let statement = self
            .client
            .prepare(POSTGRES_INSERT_SQL)
            .map_err(|e| map_store_err!("prepare insert", e))?;
        self.insert = Some(statement);
        Ok(())
    }

    fn insert_batch(&mut self, rows: &[Product]) -> Result<()> {
        let statement = self
            .insert
            .as_ref()
            .ok_or_else(|| BenchError::Other("insert statement not prepared".to_string()))?;

        let mut tx = self
            .client
            .transaction()
            .map_err(|e| map_store_err!("begin batch", e))?;

        for row in rows {
            tx.execute(
                statement,
                &[
                    &row.name,
                    &row.description,
                    &row.price,
                    &row.stock_quantity,
                    &row.category_id,
                ],
            )
            .map_err(|e| map_store_err!("insert product", e))?;
        }

        tx.commit().map_err(|e| map_store_err!("commit batch", e))
    }

    fn run_query(&mut self, sql: &str) -> Result<usize> {
        let mut tx = self
            .client
            .transaction()
            .map_err(|e| map_store_err!("begin query", e))?;
        let messages = tx
            .simple_query(sql)
            .map_err(|e| map_store_err!("run query", e))?;
        tx.commit().map_err(|e| map_store_err!("commit query", e))?;

        Ok(messages
            .iter()
            .filter(|m| matches!(m, SimpleQueryMessage::Row(_)))
            .count())
    }

    fn execute_ddl(&mut self, statements: &[&str]) -> Result<()> {
        let mut tx = self
            .client
            .transaction()
            .map_err(|e| map_store_err!("begin ddl", e))?;
        for statement in statements {
            tx.batch_execute(statement)
                .map_err(|e| map_store_err!("execute ddl", e))?;
        }
        tx.commit().map_err(|e| map_store_err!("commit ddl", e))
    }

    fn index_exists(&mut self, name: &str) -> Result<bool> {
        let row = self
            .client
            .query_opt(
                "SELECT 1 FROM pg_indexes WHERE indexname = $1",
                &[&name.to_lowercase()],
            )
            .map_err(|e| map_store_err!("look up index", e))?;
        Ok(row.is_some())
    }

    fn row_count(&mut self) -> Result<i64> {
        let row = self
            .client
            .query_one(COUNT_SQL, &[])
            .map_err(|e| map_store_err!("count products", e))?;
        row.try_get(0)
            .map_err(|e| map_store_err!("read product count", e))
    }
}
