// ==========================================
// 托盘门店分配系统 - 引擎层
// ==========================================
// 职责: 实现分配规则引擎, 不拼 SQL, 无 I/O
// 数据流: 门店准入 → 评分 ⇄ 第一轮调度 → 第二轮重分配 → 汇总
// ==========================================

pub mod aggregator;
pub mod assignment_state;
pub mod candidate;
pub mod error;
pub mod greedy_scheduler;
pub mod orchestrator;
pub mod reassignment;
pub mod scoring;
pub mod store_catalog;

// 重导出核心引擎
pub use aggregator::ResultAggregator;
pub use assignment_state::AssignmentState;
pub use candidate::{collect_ranked_candidates, rank_descending, ScoredCandidate};
pub use error::{AllocationError, AllocationResult};
pub use greedy_scheduler::GreedyScheduler;
pub use orchestrator::AllocationOrchestrator;
pub use reassignment::{ReassignmentOutcome, ReassignmentResolver};
pub use scoring::ScoringEngine;
pub use store_catalog::{EligibleStore, StoreCatalog, StoreCatalogBuilder};
