//! Benchmark queries and the indexes measured against them
//!
//! Each [`IndexDescriptor`] names the queries it is expected to accelerate
//! (its relevance set) by query key. Only those queries are re-timed while
//! that index is the only one present.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Backend;
use crate::error::{BenchError, Result};

/// Access pattern a benchmark query exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryClass {
    /// Point, range and ordering lookups on `price`
    PriceLookup,
    /// Substring and pattern matches on `name`
    TextPattern,
    /// Range and aggregate scans that benefit from insertion order
    OrderedRange,
}

/// One timed statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchQuery {
    pub key: String,
    pub label: String,
    pub sql: String,
    pub class: QueryClass,
}

/// An index under test and its lifecycle DDL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    pub key: String,
    pub label: String,
    /// Index name as known to the store
    pub name: String,
    pub create_sql: String,
    pub drop_sql: String,
    /// Keys of the queries this index should speed up
    pub accelerates: Vec<String>,
}

impl IndexDescriptor {
    /// Idempotent drop used to clear leftovers before a run
    pub fn drop_if_exists_sql(&self) -> String {
        format!("DROP INDEX IF EXISTS {};", self.name)
    }
}

/// Fixed query set plus the indexes to compare
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub queries: Vec<BenchQuery>,
    pub indexes: Vec<IndexDescriptor>,
}

fn query(key: &str, label: &str, sql: &str, class: QueryClass) -> BenchQuery {
    BenchQuery {
        key: key.to_string(),
        label: label.to_string(),
        sql: sql.to_string(),
        class,
    }
}

fn index(
    key: &str,
    label: &str,
    name: &str,
    create_sql: &str,
    accelerates: &[&str],
) -> IndexDescriptor {
    IndexDescriptor {
        key: key.to_string(),
        label: label.to_string(),
        name: name.to_string(),
        create_sql: create_sql.to_string(),
        drop_sql: format!("DROP INDEX {};", name),
        accelerates: accelerates.iter().map(|k| k.to_string()).collect(),
    }
}

const PRICE_KEYS: &[&str] = &["price_eq", "price_range", "price_order"];
const NAME_KEYS: &[&str] = &["name_word", "name_phrase", "name_regex"];
const ORDERED_KEYS: &[&str] = &["brin_price_range", "category_avg", "id_range"];

fn standard_queries() -> Vec<BenchQuery> {
    use QueryClass::*;

    vec![
        query(
            "price_eq",
            "B-tree: point lookup on price",
            "SELECT * FROM Products WHERE price = 500 LIMIT 100;",
            PriceLookup,
        ),
        query(
            "price_range",
            "B-tree: price range",
            "SELECT * FROM Products WHERE price BETWEEN 100 AND 200 LIMIT 100;",
            PriceLookup,
        ),
        query(
            "price_order",
            "B-tree: sort by price",
            "SELECT * FROM Products ORDER BY price DESC LIMIT 100;",
            PriceLookup,
        ),
        query(
            "name_word",
            "GIN: word anywhere in name",
            "SELECT * FROM Products WHERE name LIKE '%tea%' LIMIT 100;",
            TextPattern,
        ),
        query(
            "name_phrase",
            "GIN: phrase in name",
            "SELECT * FROM Products WHERE name LIKE '%Green tea%' LIMIT 100;",
            TextPattern,
        ),
        query(
            "name_regex",
            "GIN: trigram word match",
            r"SELECT * FROM Products WHERE name ~ '\ygreen\y' LIMIT 100;",
            TextPattern,
        ),
        query(
            "brin_price_range",
            "BRIN: price range over sequential values",
            "SELECT * FROM Products WHERE price BETWEEN 100 AND 200 LIMIT 100;",
            OrderedRange,
        ),
        query(
            "category_avg",
            "BRIN: average price per category",
            "SELECT category_id, AVG(price) FROM Products GROUP BY category_id;",
            OrderedRange,
        ),
        query(
            "id_range",
            "BRIN: range over ordered ids",
            "SELECT * FROM Products WHERE product_id BETWEEN 1000000 AND 1000100;",
            OrderedRange,
        ),
    ]
}

impl Catalog {
    /// Built-in catalog for a backend
    pub fn for_backend(backend: Backend) -> Self {
        match backend {
            Backend::Postgres => Self::postgres(),
            Backend::Sqlite => Self::sqlite(),
        }
    }

    /// B-tree on price, GIN trigram on name, BRIN on product_id
    pub fn postgres() -> Self {
        Self {
            queries: standard_queries(),
            indexes: vec![
                index(
                    "btree_price",
                    "B-tree index on price",
                    "idx_products_price",
                    "CREATE INDEX idx_products_price ON Products USING btree(price);",
                    PRICE_KEYS,
                ),
                index(
                    "gin_name",
                    "GIN index on name (trigrams)",
                    "idx_products_name_gin",
                    "CREATE INDEX idx_products_name_gin ON Products USING gin(name gin_trgm_ops);",
                    NAME_KEYS,
                ),
                index(
                    "brin_id",
                    "BRIN index on product_id",
                    "idx_products_id_brin",
                    "CREATE INDEX idx_products_id_brin ON Products USING brin(product_id);",
                    ORDERED_KEYS,
                ),
            ],
        }
    }

    /// SQLite has ordered indexes only; they stand in for GIN and BRIN.
    /// The regex query stays and fails, since SQLite has no `~` operator.
    pub fn sqlite() -> Self {
        Self {
            queries: standard_queries(),
            indexes: vec![
                index(
                    "btree_price",
                    "Ordered index on price",
                    "idx_products_price",
                    "CREATE INDEX idx_products_price ON Products(price);",
                    PRICE_KEYS,
                ),
                index(
                    "ordered_name",
                    "Ordered index on name",
                    "idx_products_name",
                    "CREATE INDEX idx_products_name ON Products(name);",
                    NAME_KEYS,
                ),
                index(
                    "ordered_id",
                    "Ordered index on product_id",
                    "idx_products_id",
                    "CREATE INDEX idx_products_id ON Products(product_id);",
                    ORDERED_KEYS,
                ),
            ],
        }
    }

    /// Load a custom catalog from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let catalog: Catalog = toml::from_str(&content).map_err(|e| BenchError::InvalidConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Keys must be unique and every relevance entry must name a query
    pub fn validate(&self) -> Result<()> {
        let mut query_keys = HashSet::new();
        for q in &self.queries {
            if !query_keys.insert(q.key.as_str()) {
                crate::bail_invalid!("catalog", format!("duplicate query key `{}`", q.key));
            }
        }

        let mut index_keys = HashSet::new();
        let mut index_names = HashSet::new();
        for idx in &self.indexes {
            if !index_keys.insert(idx.key.as_str()) {
                crate::bail_invalid!("catalog", format!("duplicate index key `{}`", idx.key));
            }
            if !index_names.insert(idx.name.to_lowercase()) {
                crate::bail_invalid!("catalog", format!("duplicate index name `{}`", idx.name));
            }
            for key in &idx.accelerates {
                if !query_keys.contains(key.as_str()) {
                    crate::bail_invalid!(
                        "catalog",
                        format!("index `{}` accelerates unknown query `{}`", idx.key, key)
                    );
                }
            }
        }
        Ok(())
    }

    /// Positions of the queries `index` accelerates, in declaration order
    pub fn relevant_queries(&self, index: &IndexDescriptor) -> Vec<usize> {
        self.queries
            .iter()
            .enumerate()
            .filter(|(_, q)| index.accelerates.iter().any(|k| *k == q.key))
            .map(|(pos, _)| pos)
            .collect()
    }
}
