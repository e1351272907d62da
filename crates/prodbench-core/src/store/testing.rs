//! In-memory [`Store`] that records every call, for protocol tests

use std::collections::BTreeSet;

use super::Store;
use crate::config::Backend;
use crate::error::{BenchError, Result};
use crate::product::Product;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    RelaxDurability,
    RestoreDurability,
    PrepareInsert,
    InsertBatch(usize),
    Query(String),
    Ddl(Vec<String>),
}

#[derive(Debug, Default)]
pub struct RecordingStore {
    pub calls: Vec<Call>,
    pub rows: Vec<Product>,
    pub commits: usize,
    pub indexes: BTreeSet<String>,
    prepared: bool,
    /// Fail the n-th `insert_batch` call (1-based)
    pub fail_batch: Option<usize>,
    /// Fail any query whose text contains this
    pub fail_query_containing: Option<String>,
    /// Fail any DDL statement whose text contains this
    pub fail_ddl_containing: Option<String>,
    batch_calls: usize,
}

fn index_name(statement: &str) -> Option<String> {
    let mut words = statement
        .split_whitespace()
        .skip_while(|w| !w.eq_ignore_ascii_case("INDEX"))
        .skip(1)
        .skip_while(|w| w.eq_ignore_ascii_case("IF") || w.eq_ignore_ascii_case("EXISTS"));
    words
        .next()
        .map(|w| w.trim_end_matches(';').to_lowercase())
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queries(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Query(sql) => Some(sql.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::InsertBatch(n) => Some(*n),
                _ => None,
            })
            .collect()
    }
}

impl Store for RecordingStore {
    fn backend(&self) -> Backend {
        Backend::Postgres
    }

    fn ensure_schema(&mut self) -> Result<()> {
        Ok(())
    }

    fn relax_durability(&mut self) -> Result<()> {
        self.calls.push(Call::RelaxDurability);
        Ok(())
    }

    fn restore_durability(&mut self) -> Result<()> {
        self.calls.push(Call::RestoreDurability);
        Ok(())
    }

    fn prepare_insert(&mut self) -> Result<()> {
        self.calls.push(Call::PrepareInsert);
        self.prepared = true;
        Ok(())
    }

    fn insert_batch(&mut self, rows: &[Product]) -> Result<()> {
        if !self.prepared {
            return Err(BenchError::Other("insert statement not prepared".into()));
        }
        self.batch_calls += 1;
        self.calls.push(Call::InsertBatch(rows.len()));
        if self.fail_batch == Some(self.batch_calls) {
            return Err(BenchError::transaction("insert product", "injected failure"));
        }
        self.rows.extend_from_slice(rows);
        self.commits += 1;
        Ok(())
    }

    fn run_query(&mut self, sql: &str) -> Result<usize> {
        self.calls.push(Call::Query(sql.to_string()));
        if let Some(needle) = &self.fail_query_containing {
            if sql.contains(needle.as_str()) {
                return Err(BenchError::transaction("run query", "injected failure"));
            }
        }
        self.commits += 1;
        Ok(self.rows.len().min(100))
    }

    fn execute_ddl(&mut self, statements: &[&str]) -> Result<()> {
        self.calls.push(Call::Ddl(
            statements.iter().map(|s| s.to_string()).collect(),
        ));
        if let Some(needle) = &self.fail_ddl_containing {
            if statements.iter().any(|s| s.contains(needle.as_str())) {
                return Err(BenchError::transaction("execute ddl", "injected failure"));
            }
        }

        let mut indexes = self.indexes.clone();
        for statement in statements {
            let upper = statement.to_uppercase();
            let Some(name) = index_name(statement) else {
                continue;
            };
            if upper.starts_with("CREATE INDEX") {
                if !indexes.insert(name.clone()) {
                    return Err(BenchError::transaction(
                        "execute ddl",
                        format!("index {} already exists", name),
                    ));
                }
            } else if upper.starts_with("DROP INDEX") {
                let removed = indexes.remove(&name);
                if !removed && !upper.contains("IF EXISTS") {
                    return Err(BenchError::transaction(
                        "execute ddl",
                        format!("index {} does not exist", name),
                    ));
                }
            }
        }
        self.indexes = indexes;
        self.commits += 1;
        Ok(())
    }

    fn index_exists(&mut self, name: &str) -> Result<bool> {
        Ok(self.indexes.contains(&name.to_lowercase()))
    }

    fn row_count(&mut self) -> Result<i64> {
        Ok(self.rows.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_name_parsing() {
        assert_eq!(
            index_name("CREATE INDEX idx_products_price ON Products USING btree(price);"),
            Some("idx_products_price".to_string())
        );
        assert_eq!(
            index_name("DROP INDEX IF EXISTS idx_products_id_brin;"),
            Some("idx_products_id_brin".to_string())
        );
        assert_eq!(index_name("SET synchronous_commit TO OFF"), None);
    }
}
