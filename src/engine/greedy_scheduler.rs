// ==========================================
// 托盘门店分配系统 - 贪心分配调度器（第一轮）
// ==========================================
// 红线: 一店一托（全局已分配门店集合）
// 红线: 按输入顺序处理托盘，每个托盘恰好产出一行结果
// ==========================================
// 输入: 托盘列表 + 门店表 + 合格门店目录 + 评分引擎 + 运行状态
// 输出: 第一轮结果（ASSIGNED / UNASSIGNED / NO_SUPPORTED_FUNCTIONS）
// ==========================================

use crate::domain::assignment::AssignmentResult;
use crate::domain::pallet::Pallet;
use crate::domain::store::StoreTable;
use crate::domain::types::{AssignmentPass, FunctionCode};
use crate::engine::assignment_state::AssignmentState;
use crate::engine::candidate::collect_ranked_candidates;
use crate::engine::scoring::ScoringEngine;
use crate::engine::store_catalog::StoreCatalog;
use tracing::{debug, info, instrument};

// ==========================================
// GreedyScheduler - 第一轮贪心调度器
// ==========================================
pub struct GreedyScheduler {
    // 无状态引擎，运行状态由调用方显式传入
}

impl GreedyScheduler {
    pub fn new() -> Self {
        Self {}
    }

    /// 执行第一轮分配
    ///
    /// 每个托盘:
    /// 1) F = 数量 > 0 的功能代码
    /// 2) 剔除门店表中不存在交付列的代码；剔空则记 NO_SUPPORTED_FUNCTIONS（终态）
    /// 3) 候选 = 未被占用 且 对 F 中每个代码 delivered > 0 的合格门店
    /// 4) 得分降序取首位，标记占用并累加价值；无候选则记 UNASSIGNED
    #[instrument(skip_all, fields(pallet_count = pallets.len(), eligible_count = catalog.len()))]
    pub fn run(
        &self,
        pallets: &[Pallet],
        stores: &StoreTable,
        catalog: &StoreCatalog,
        scoring: &ScoringEngine<'_>,
        state: &mut AssignmentState,
    ) -> Vec<AssignmentResult> {
        let mut results = Vec::with_capacity(pallets.len());

        for pallet in pallets {
            let result = self.assign_single(pallet, stores, catalog, scoring, state);
            debug!(
                pallet_id = %result.pallet_id,
                status = %result.status,
                store = %result.display_store(),
                score = result.score,
                "第一轮落位"
            );
            results.push(result);
        }

        info!(
            assigned_stores = state.assigned_store_count(),
            "第一轮分配完成"
        );
        results
    }

    /// 单托盘分配
    pub fn assign_single(
        &self,
        pallet: &Pallet,
        stores: &StoreTable,
        catalog: &StoreCatalog,
        scoring: &ScoringEngine<'_>,
        state: &mut AssignmentState,
    ) -> AssignmentResult {
        let function_set = pallet.function_set();

        let (supported, unsupported): (Vec<FunctionCode>, Vec<FunctionCode>) = function_set
            .into_iter()
            .partition(|code| stores.supports(code));

        if supported.is_empty() {
            return AssignmentResult::no_supported_functions(pallet, unsupported);
        }

        let ranked = collect_ranked_candidates(catalog, &supported, scoring, |store| {
            !state.is_assigned(store.name())
        });

        match ranked.into_iter().next() {
            Some(best) => {
                state.record_direct(&best.store_name, pallet.total_value());
                AssignmentResult::assigned(
                    pallet,
                    &best.store_name,
                    best.breakdown,
                    supported,
                    AssignmentPass::Direct,
                )
            }
            None => AssignmentResult::unassigned(pallet, supported),
        }
    }
}

impl Default for GreedyScheduler {
    fn default() -> Self {
        Self::new()
    }
}
