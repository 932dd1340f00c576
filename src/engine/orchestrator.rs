// ==========================================
// 托盘门店分配系统 - 引擎编排器
// ==========================================
// 用途: 协调五个核心组件的执行顺序
// 1) 参数前置校验（失败即返回，不产生任何结果）
// 2) 门店准入目录
// 3) 第一轮贪心分配
// 4) 第二轮容量约束重分配
// 5) 结果汇总
// ==========================================
// 红线: 运行状态每次新建；单线程按输入顺序处理
// ==========================================

use crate::config::AllocationParams;
use crate::domain::assignment::AssignmentReport;
use crate::domain::dataset::AllocationDataset;
use crate::engine::aggregator::ResultAggregator;
use crate::engine::assignment_state::AssignmentState;
use crate::engine::error::AllocationResult;
use crate::engine::greedy_scheduler::GreedyScheduler;
use crate::engine::reassignment::ReassignmentResolver;
use crate::engine::scoring::ScoringEngine;
use crate::engine::store_catalog::StoreCatalogBuilder;
use tracing::{debug, info, instrument};

// ==========================================
// AllocationOrchestrator - 引擎编排器
// ==========================================
pub struct AllocationOrchestrator {
    catalog_builder: StoreCatalogBuilder,
    scheduler: GreedyScheduler,
    aggregator: ResultAggregator,
}

impl AllocationOrchestrator {
    pub fn new() -> Self {
        Self {
            catalog_builder: StoreCatalogBuilder::new(),
            scheduler: GreedyScheduler::new(),
            aggregator: ResultAggregator::new(),
        }
    }

    /// 执行完整分配流程
    ///
    /// # 参数
    /// - dataset: 已补零的四张输入表（只读）
    /// - params: 分配参数
    ///
    /// # 返回
    /// 运行报告；参数非法时返回 AllocationError
    #[instrument(skip_all, fields(
        pallet_count = dataset.pallets.len(),
        store_count = dataset.stores.len(),
    ))]
    pub fn execute(
        &self,
        dataset: &AllocationDataset,
        params: &AllocationParams,
    ) -> AllocationResult<AssignmentReport> {
        params.validate()?;

        info!(
            history_weight = params.history_weight,
            progress_weight = params.progress_weight,
            alpha = params.alpha,
            threshold = params.delivered_threshold,
            multiplier = params.reassign_multiplier,
            "开始执行分配流程"
        );

        // ==========================================
        // 步骤1: 门店准入
        // ==========================================
        let catalog = self
            .catalog_builder
            .build(&dataset.stores, params.delivered_threshold);
        info!(
            eligible_count = catalog.len(),
            excluded_count = catalog.excluded_count(),
            "门店准入完成"
        );

        let scoring = ScoringEngine::new(
            &dataset.progress,
            &dataset.stock,
            params.history_weight,
            params.progress_weight,
            params.alpha,
        );
        let mut state = AssignmentState::new(&catalog);

        // ==========================================
        // 步骤2: 第一轮贪心分配
        // ==========================================
        debug!("步骤2: 第一轮贪心分配");
        let mut results = self.scheduler.run(
            &dataset.pallets,
            &dataset.stores,
            &catalog,
            &scoring,
            &mut state,
        );

        // ==========================================
        // 步骤3: 第二轮重分配
        // ==========================================
        debug!("步骤3: 第二轮重分配");
        let resolver = ReassignmentResolver::new(params.reassign_multiplier);
        let outcome = resolver.resolve(
            &mut results,
            &dataset.pallets,
            &catalog,
            &scoring,
            &mut state,
        );

        // ==========================================
        // 步骤4: 汇总
        // ==========================================
        let report = self.aggregator.aggregate(results, &catalog, &state, outcome);

        info!(
            total = report.summary.total,
            assigned = report.summary.assigned,
            "分配流程完成"
        );
        Ok(report)
    }
}

impl Default for AllocationOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::{ProgressTable, StockTable};
    use crate::domain::pallet::Pallet;
    use crate::domain::store::{StoreRecord, StoreTable};
    use crate::domain::types::FunctionCode;
    use crate::engine::error::AllocationError;

    fn dataset() -> AllocationDataset {
        let stores = StoreTable::new(
            vec![FunctionCode::new("10")],
            vec![StoreRecord::new("A").with_function("10", 10.0, 5.0, 0.5)],
        );
        let pallets = vec![Pallet::new("P1", vec![(FunctionCode::new("10"), 2.0)])];
        AllocationDataset::new(stores, ProgressTable::new(vec![]), StockTable::new(), pallets)
    }

    #[test]
    fn test_invalid_params_reject_run() {
        let params = AllocationParams {
            history_weight: 60,
            progress_weight: 30,
            ..AllocationParams::default()
        };
        let err = AllocationOrchestrator::new()
            .execute(&dataset(), &params)
            .unwrap_err();
        assert!(matches!(err, AllocationError::InvalidBlendWeights { .. }));

        let params = AllocationParams::default().with_alpha(1.5);
        assert_eq!(
            AllocationOrchestrator::new().execute(&dataset(), &params),
            Err(AllocationError::AlphaOutOfRange(1.5))
        );
    }

    #[test]
    fn test_happy_path() {
        let params = AllocationParams::default().with_delivered_threshold(0.0);
        let report = AllocationOrchestrator::new()
            .execute(&dataset(), &params)
            .unwrap();
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].assigned_store.as_deref(), Some("A"));
        assert_eq!(report.capacity_ceiling, None);
    }
}
