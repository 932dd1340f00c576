// ==========================================
// 托盘门店分配系统 - 配置管理器
// ==========================================
// 职责: 分配参数的加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::allocation_config_trait::AllocationConfigReader;
use crate::config::allocation_params::{
    AllocationParams, DEFAULT_ALPHA, DEFAULT_DELIVERED_THRESHOLD, DEFAULT_HISTORY_WEIGHT,
    DEFAULT_REASSIGN_MULTIPLIER,
};
use crate::config::error::{ConfigError, ConfigResult};
use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例（自动建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA 并建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 写入单个分配参数（键必须已知，值必须可解析）
    pub fn set_param(&self, key: &str, value: &str) -> ConfigResult<()> {
        let value = value.trim();
        let parse_error = |message: String| ConfigError::ConfigValueError {
            key: key.to_string(),
            value: value.to_string(),
            message,
        };

        match key {
            config_keys::HISTORY_WEIGHT => {
                value
                    .parse::<u32>()
                    .map_err(|e| parse_error(e.to_string()))?;
            }
            config_keys::ALPHA
            | config_keys::DELIVERED_THRESHOLD
            | config_keys::REASSIGN_MULTIPLIER => {
                let parsed = value
                    .parse::<f64>()
                    .map_err(|e| parse_error(e.to_string()))?;
                if !parsed.is_finite() {
                    return Err(parse_error("非有限数值".to_string()));
                }
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }

        self.set_global_config_value(key, value)
    }

    /// 持久化整套分配参数（I2 由 I1 派生，不单独存储）
    pub fn save_params(&self, params: &AllocationParams) -> ConfigResult<()> {
        self.set_global_config_value(
            config_keys::HISTORY_WEIGHT,
            &params.history_weight.to_string(),
        )?;
        self.set_global_config_value(config_keys::ALPHA, &params.alpha.to_string())?;
        self.set_global_config_value(
            config_keys::DELIVERED_THRESHOLD,
            &params.delivered_threshold.to_string(),
        )?;
        self.set_global_config_value(
            config_keys::REASSIGN_MULTIPLIER,
            &params.reassign_multiplier.to_string(),
        )?;
        Ok(())
    }

    /// 读取并解析配置值，不存在或格式错误时回退默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr + Copy,
    {
        match self.get_global_config_value(key)? {
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(value) => Ok(value),
                Err(_) => {
                    warn!(key, value = %raw, "配置值格式错误，回退默认值");
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    /// 获取所有 global 配置的快照（JSON格式，按 key 排序）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&config_map)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> ConfigResult<usize> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }
}

// ==========================================
// AllocationConfigReader 实现
// ==========================================
#[async_trait]
impl AllocationConfigReader for ConfigManager {
    async fn get_history_weight(&self) -> ConfigResult<u32> {
        self.get_parsed_or_default(config_keys::HISTORY_WEIGHT, DEFAULT_HISTORY_WEIGHT)
    }

    async fn get_alpha(&self) -> ConfigResult<f64> {
        self.get_parsed_or_default(config_keys::ALPHA, DEFAULT_ALPHA)
    }

    async fn get_delivered_threshold(&self) -> ConfigResult<f64> {
        self.get_parsed_or_default(
            config_keys::DELIVERED_THRESHOLD,
            DEFAULT_DELIVERED_THRESHOLD,
        )
    }

    async fn get_reassign_multiplier(&self) -> ConfigResult<f64> {
        self.get_parsed_or_default(
            config_keys::REASSIGN_MULTIPLIER,
            DEFAULT_REASSIGN_MULTIPLIER,
        )
    }
}

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const HISTORY_WEIGHT: &str = "history_weight";           // I1 (%)
    pub const ALPHA: &str = "alpha";
    pub const DELIVERED_THRESHOLD: &str = "delivered_threshold";
    pub const REASSIGN_MULTIPLIER: &str = "reassign_multiplier";

    pub const ALL: [&str; 4] = [HISTORY_WEIGHT, ALPHA, DELIVERED_THRESHOLD, REASSIGN_MULTIPLIER];
}
