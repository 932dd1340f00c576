// ==========================================
// 托盘门店分配系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 幂等建表（config_kv / assignment_run / assignment_result）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::PathBuf;
use std::time::Duration;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "PALLET_ALLOCATION_DB_PATH";

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version     INTEGER PRIMARY KEY,
    applied_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id    TEXT NOT NULL,
    key         TEXT NOT NULL,
    value       TEXT NOT NULL,
    updated_at  TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS assignment_run (
    run_id                  TEXT PRIMARY KEY,
    created_at              TEXT NOT NULL,
    params_json             TEXT NOT NULL,
    total                   INTEGER NOT NULL,
    assigned                INTEGER NOT NULL,
    unassigned              INTEGER NOT NULL,
    no_supported_functions  INTEGER NOT NULL,
    reassigned              INTEGER NOT NULL,
    assignment_rate         REAL NOT NULL,
    eligible_store_count    INTEGER NOT NULL,
    capacity_ceiling        REAL
);

CREATE TABLE IF NOT EXISTS assignment_result (
    run_id              TEXT NOT NULL REFERENCES assignment_run(run_id) ON DELETE CASCADE,
    seq_no              INTEGER NOT NULL,
    pallet_id           TEXT NOT NULL,
    status              TEXT NOT NULL,
    assigned_store      TEXT,
    pass                TEXT,
    score               REAL NOT NULL,
    stock_share         REAL NOT NULL,
    combined_average    REAL NOT NULL,
    historical_average  REAL NOT NULL,
    progress_average    REAL NOT NULL,
    function_codes      TEXT NOT NULL,
    pallet_value        REAL NOT NULL,
    PRIMARY KEY (run_id, seq_no)
);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 幂等建表，并登记 schema_version
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 默认数据库路径
///
/// 优先级: 环境变量 PALLET_ALLOCATION_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./pallet_allocation.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("pallet-allocation");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("pallet_allocation.db");
        }
    }

    path.to_string_lossy().to_string()
}
