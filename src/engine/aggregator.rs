// ==========================================
// 托盘门店分配系统 - 结果汇总器
// ==========================================
// 职责: 规范化托盘编号，组装最终结果表与汇总统计
// 红线: 一个输入托盘一行，保持输入顺序
// ==========================================

use crate::domain::assignment::{AssignmentReport, AssignmentResult, AssignmentSummary};
use crate::domain::types::{normalize_identifier, FunctionCode};
use crate::engine::assignment_state::AssignmentState;
use crate::engine::reassignment::ReassignmentOutcome;
use crate::engine::store_catalog::StoreCatalog;
use tracing::{info, warn};

pub struct ResultAggregator {
    // 无状态引擎
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self {}
    }

    /// 组装运行报告
    pub fn aggregate(
        &self,
        mut results: Vec<AssignmentResult>,
        catalog: &StoreCatalog,
        state: &AssignmentState,
        reassignment: Option<ReassignmentOutcome>,
    ) -> AssignmentReport {
        for result in &mut results {
            result.pallet_id = normalize_identifier(&result.pallet_id);
        }

        let summary = AssignmentSummary::from_results(&results);
        let report = AssignmentReport {
            summary,
            eligible_store_count: catalog.len(),
            capacity_ceiling: reassignment.map(|o| o.capacity_ceiling),
            store_loads: state.store_loads(catalog),
            results,
        };

        info!(
            total = summary.total,
            assigned = summary.assigned,
            unassigned = summary.unassigned,
            reassigned = summary.reassigned,
            rate = %summary.assignment_rate_pct(),
            "分配结果汇总"
        );

        let unassigned: Vec<&str> = report
            .unassigned_results()
            .map(|r| r.pallet_id.as_str())
            .collect();
        if !unassigned.is_empty() {
            warn!(
                count = unassigned.len(),
                pallets = %unassigned.join(","),
                "存在未分配托盘"
            );
        }

        for result in report.unsupported_results() {
            warn!(
                pallet_id = %result.pallet_id,
                codes = %FunctionCode::join(&result.function_codes),
                "托盘功能代码在门店表中均不存在"
            );
        }

        report
    }
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pallet::Pallet;
    use crate::domain::store::{StoreRecord, StoreTable};
    use crate::engine::store_catalog::StoreCatalogBuilder;

    #[test]
    fn test_aggregate_builds_summary_and_loads() {
        let table = StoreTable::new(
            vec![],
            vec![StoreRecord::new("A").with_function("10", 1.0, 0.0, 0.0)],
        );
        let catalog = StoreCatalogBuilder::new().build(&table, 0.0);
        let mut state = AssignmentState::new(&catalog);
        state.record_direct("A", 3.0);

        let p1 = Pallet::new("1", vec![(FunctionCode::new("10"), 3.0)]);
        let p2 = Pallet::new("2", vec![(FunctionCode::new("10"), 2.0)]);
        let mut first = AssignmentResult::unassigned(&p1, p1.function_set());
        first.pallet_id = "1.0".to_string();
        first.apply_assignment(
            "A",
            Default::default(),
            crate::domain::types::AssignmentPass::Direct,
        );
        let results = vec![first, AssignmentResult::unassigned(&p2, p2.function_set())];

        let report = ResultAggregator::new().aggregate(results, &catalog, &state, None);
        assert_eq!(report.results[0].pallet_id, "1");
        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.unassigned, 1);
        assert_eq!(report.capacity_ceiling, None);
        assert_eq!(report.eligible_store_count, 1);
        assert_eq!(report.store_loads[0].assigned_value, 3.0);
    }
}
