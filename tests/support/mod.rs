use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::path::Path;

/// Get a Command for prodbench, isolated from the user's config and env
pub fn prodbench(config_dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("prodbench");
    cmd.env("PRODBENCH_CONFIG_DIR", config_dir)
        .env_remove("PRODBENCH_DATABASE_URL")
        .env_remove("PRODBENCH_LOG")
        .env_remove("RUST_LOG");
    cmd
}

/// prodbench pointed at a SQLite file
#[allow(dead_code)]
pub fn prodbench_sqlite(dir: &Path) -> Command {
    let mut cmd = prodbench(dir);
    cmd.arg("--backend")
        .arg("sqlite")
        .arg("--database")
        .arg(dir.join("bench.db"));
    cmd
}

/// Create the table in `dir/bench.db`
#[allow(dead_code)]
pub fn init_sqlite(dir: &Path) {
    prodbench_sqlite(dir).arg("init").assert().success();
}

#[allow(dead_code)]
pub fn query_i64(dir: &Path, sql: &str) -> i64 {
    let conn = rusqlite::Connection::open(dir.join("bench.db")).unwrap();
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}
