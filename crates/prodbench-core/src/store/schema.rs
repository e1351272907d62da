//! SQL text for the `Products` table

/// PostgreSQL: table plus the trigram extension the GIN index needs
pub const POSTGRES_SCHEMA_SQL: &str = r#"
CREATE EXTENSION IF NOT EXISTS pg_trgm;
CREATE TABLE IF NOT EXISTS Products (
    product_id SERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    price INTEGER NOT NULL,
    stock_quantity INTEGER NOT NULL,
    category_id INTEGER NOT NULL
);
"#;

pub const SQLITE_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS Products (
    product_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT,
    price INTEGER NOT NULL,
    stock_quantity INTEGER NOT NULL,
    category_id INTEGER NOT NULL
);
"#;

/// Casts pin the parameter types to what the loader binds, so a pre-existing
/// table with wider numeric or varchar columns still accepts the rows
pub const POSTGRES_INSERT_SQL: &str = "INSERT INTO Products (name, description, price, stock_quantity, category_id) VALUES ($1::text, $2::text, $3::int4, $4::int4, $5::int4)";

pub const SQLITE_INSERT_SQL: &str = "INSERT INTO Products (name, description, price, stock_quantity, category_id) VALUES (?1, ?2, ?3, ?4, ?5)";

pub const COUNT_SQL: &str = "SELECT COUNT(*) FROM Products";

/// Session-scoped; `RESET` returns to whatever the server or role configured
pub const POSTGRES_RELAX_DURABILITY_SQL: &str = "SET synchronous_commit TO OFF";
pub const POSTGRES_RESTORE_DURABILITY_SQL: &str = "RESET synchronous_commit";
