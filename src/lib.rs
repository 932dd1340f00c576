// ==========================================
// 托盘门店分配系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 核心: 一店一托贪心分配 + 容量上限内重分配
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 运行记录
pub mod repository;

// 引擎层 - 分配规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 导出层 - 结果表
pub mod export;

// 配置层 - 分配参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{normalize_identifier, AssignmentPass, AssignmentStatus, FunctionCode};

// 领域实体
pub use domain::{
    AllocationDataset, AssignmentReport, AssignmentResult, AssignmentSummary, Pallet,
    ProgressTable, StockTable, StoreRecord, StoreTable,
};

// 配置
pub use config::{AllocationParams, ConfigManager};

// 引擎
pub use engine::{
    AllocationError, AllocationOrchestrator, GreedyScheduler, ReassignmentResolver,
    ResultAggregator, ScoringEngine, StoreCatalogBuilder,
};

// API
pub use api::{AllocationApi, ApiError, ParamOverrides};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "托盘门店分配系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(!APP_NAME.is_empty());
    }
}
