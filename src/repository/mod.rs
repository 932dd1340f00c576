// ==========================================
// 托盘门店分配系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 持久化分配运行与结果, 屏蔽数据库细节
// 约束: 所有查询使用参数化
// ==========================================

pub mod assignment_run_repo;
pub mod error;

// 重导出核心仓储
pub use assignment_run_repo::{AssignmentRunEntity, AssignmentRunRepository};
pub use error::{RepositoryError, RepositoryResult};
