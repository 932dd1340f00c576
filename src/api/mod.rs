// ==========================================
// 托盘门店分配系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口, 供命令行入口调用
// ==========================================

pub mod allocation_api;
pub mod error;

// 重导出核心类型
pub use allocation_api::{AllocationApi, ParamOverrides, RunDetail, RunOutcome};
pub use error::{ApiError, ApiResult};
