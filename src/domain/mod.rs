// ==========================================
// 托盘门店分配系统 - 领域模型层
// ==========================================
// 职责: 定义门店 / 托盘 / 进度 / 库存 / 分配结果
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod assignment;
pub mod dataset;
pub mod metrics;
pub mod pallet;
pub mod store;
pub mod types;

// 重导出核心类型
pub use assignment::{
    AssignmentReport, AssignmentResult, AssignmentSummary, ScoreBreakdown, StoreLoad,
};
pub use dataset::AllocationDataset;
pub use metrics::{ProgressTable, StockTable};
pub use pallet::Pallet;
pub use store::{FunctionMetrics, StoreRecord, StoreTable};
pub use types::{normalize_identifier, AssignmentPass, AssignmentStatus, FunctionCode};
