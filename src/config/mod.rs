// ==========================================
// 托盘门店分配系统 - 配置层
// ==========================================
// 职责: 分配参数定义、校验、持久化读取
// 存储: config_kv 表
// ==========================================

pub mod allocation_config_trait;
pub mod allocation_params;
pub mod config_manager;
pub mod error;

// 重导出核心配置
pub use allocation_config_trait::AllocationConfigReader;
pub use allocation_params::AllocationParams;
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
