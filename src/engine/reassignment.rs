// ==========================================
// 托盘门店分配系统 - 重分配解析器（第二轮）
// ==========================================
// 触发: 第一轮结果中存在 UNASSIGNED（NO_SUPPORTED_FUNCTIONS 为终态，不参与）
// 容量上限: max(全部托盘价值) × 倍数
// 红线: 本轮独立的已用门店集合（与第一轮集合互不影响）
// 红线: 累计价值与第一轮共用，本轮内后续托盘可见增量
// 红线: 只跑一轮，不做逐托盘重试
// ==========================================

use crate::domain::assignment::AssignmentResult;
use crate::domain::pallet::Pallet;
use crate::domain::types::{AssignmentPass, AssignmentStatus, FunctionCode};
use crate::engine::assignment_state::AssignmentState;
use crate::engine::candidate::collect_ranked_candidates;
use crate::engine::scoring::ScoringEngine;
use crate::engine::store_catalog::StoreCatalog;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

// ==========================================
// ReassignmentOutcome - 第二轮执行摘要
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReassignmentOutcome {
    pub capacity_ceiling: f64,
    pub attempted: usize,
    pub reassigned: usize,
}

// ==========================================
// ReassignmentResolver - 第二轮重分配
// ==========================================
pub struct ReassignmentResolver {
    multiplier: f64,
}

impl ReassignmentResolver {
    /// 创建解析器
    ///
    /// # 参数
    /// - multiplier: 容量倍数（已校验 >= 1）
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }

    /// 容量上限 = 最大托盘价值 × 倍数（无托盘时为 0）
    pub fn capacity_ceiling(&self, pallets: &[Pallet]) -> f64 {
        let max_value = pallets
            .iter()
            .map(|p| p.total_value())
            .fold(None, |acc: Option<f64>, v| match acc {
                Some(current) => Some(current.max(v)),
                None => Some(v),
            })
            .unwrap_or(0.0);
        max_value * self.multiplier
    }

    /// 执行第二轮
    ///
    /// 仅当存在 UNASSIGNED 行时运行，返回 None 表示未触发。
    /// 命中时原地覆写结果行（功能列表与价值不变）。
    #[instrument(skip_all, fields(multiplier = self.multiplier))]
    pub fn resolve(
        &self,
        results: &mut [AssignmentResult],
        pallets: &[Pallet],
        catalog: &StoreCatalog,
        scoring: &ScoringEngine<'_>,
        state: &mut AssignmentState,
    ) -> Option<ReassignmentOutcome> {
        let has_unassigned = results
            .iter()
            .any(|r| r.status == AssignmentStatus::Unassigned);
        if !has_unassigned {
            return None;
        }

        let capacity_ceiling = self.capacity_ceiling(pallets);
        info!(capacity_ceiling, "触发第二轮重分配");

        let mut used_stores: HashSet<String> = HashSet::new();
        let mut attempted = 0;
        let mut reassigned = 0;

        for result in results
            .iter_mut()
            .filter(|r| r.status == AssignmentStatus::Unassigned)
        {
            attempted += 1;

            let codes: Vec<FunctionCode> = result
                .function_codes
                .iter()
                .filter(|code| code.is_numeric())
                .cloned()
                .collect();
            if codes.is_empty() {
                debug!(pallet_id = %result.pallet_id, "功能列表为空，跳过");
                continue;
            }

            let pallet_value = result.pallet_value;
            let ranked = collect_ranked_candidates(catalog, &codes, scoring, |store| {
                !used_stores.contains(store.name())
                    && state.cumulative_value(store.name()) + pallet_value <= capacity_ceiling
            });

            if let Some(best) = ranked.into_iter().next() {
                debug!(
                    pallet_id = %result.pallet_id,
                    store = %best.store_name,
                    before = state.cumulative_value(&best.store_name),
                    pallet_value,
                    "第二轮落位"
                );
                result.apply_assignment(&best.store_name, best.breakdown, AssignmentPass::Reassigned);
                state.add_value(&best.store_name, pallet_value);
                used_stores.insert(best.store_name);
                reassigned += 1;
            }
        }

        info!(attempted, reassigned, "第二轮重分配完成");

        Some(ReassignmentOutcome {
            capacity_ceiling,
            attempted,
            reassigned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::{ProgressTable, StockTable};
    use crate::domain::store::{StoreRecord, StoreTable};
    use crate::engine::greedy_scheduler::GreedyScheduler;
    use crate::engine::store_catalog::StoreCatalogBuilder;

    fn pallet(id: &str, qty: f64) -> Pallet {
        Pallet::new(id, vec![(FunctionCode::new("10"), qty)])
    }

    fn two_stores() -> StoreTable {
        StoreTable::new(
            vec![FunctionCode::new("10")],
            vec![
                StoreRecord::new("A").with_function("10", 100.0, 0.0, 0.9),
                StoreRecord::new("B").with_function("10", 100.0, 0.0, 0.5),
            ],
        )
    }

    #[test]
    fn test_capacity_ceiling() {
        let resolver = ReassignmentResolver::new(2.0);
        assert_eq!(
            resolver.capacity_ceiling(&[pallet("P1", 3.0), pallet("P2", 7.0)]),
            14.0
        );
        assert_eq!(resolver.capacity_ceiling(&[]), 0.0);
    }

    #[test]
    fn test_not_triggered_without_unassigned() {
        let stores = two_stores();
        let catalog = StoreCatalogBuilder::new().build(&stores, 0.0);
        let progress = ProgressTable::new(vec![]);
        let stock = StockTable::new();
        let scoring = ScoringEngine::new(&progress, &stock, 100, 0, 1.0);
        let mut state = AssignmentState::new(&catalog);
        let pallets = vec![pallet("P1", 1.0)];
        let mut results =
            GreedyScheduler::new().run(&pallets, &stores, &catalog, &scoring, &mut state);

        let outcome = ReassignmentResolver::new(5.0).resolve(
            &mut results,
            &pallets,
            &catalog,
            &scoring,
            &mut state,
        );
        assert!(outcome.is_none());
    }

    #[test]
    fn test_second_pass_respects_ceiling_and_local_set() {
        let stores = two_stores();
        let catalog = StoreCatalogBuilder::new().build(&stores, 0.0);
        let progress = ProgressTable::new(vec![]);
        let stock = StockTable::new();
        let scoring = ScoringEngine::new(&progress, &stock, 100, 0, 1.0);
        let mut state = AssignmentState::new(&catalog);

        // 第一轮: P1→A(10), P2→B(4)；P3、P4、P5 未分配
        // 上限 = 10 × 1.5 = 15
        let pallets = vec![
            pallet("P1", 10.0),
            pallet("P2", 4.0),
            pallet("P3", 6.0),
            pallet("P4", 5.0),
            pallet("P5", 1.0),
        ];
        let mut results =
            GreedyScheduler::new().run(&pallets, &stores, &catalog, &scoring, &mut state);
        assert_eq!(results[0].assigned_store.as_deref(), Some("A"));
        assert_eq!(results[1].assigned_store.as_deref(), Some("B"));

        let outcome = ReassignmentResolver::new(1.5)
            .resolve(&mut results, &pallets, &catalog, &scoring, &mut state)
            .expect("存在未分配托盘");

        assert_eq!(outcome.capacity_ceiling, 15.0);
        assert_eq!(outcome.attempted, 3);
        // P3: A 10+6>15 不可，B 4+6=10 可 → B
        assert_eq!(results[2].assigned_store.as_deref(), Some("B"));
        assert_eq!(results[2].pass, Some(AssignmentPass::Reassigned));
        // P4: A 10+5=15 可 → A
        assert_eq!(results[3].assigned_store.as_deref(), Some("A"));
        // P5: A、B 本轮均已使用 → 保持未分配
        assert_eq!(results[4].status, AssignmentStatus::Unassigned);
        assert_eq!(outcome.reassigned, 2);
        assert_eq!(state.cumulative_value("A"), 15.0);
        assert_eq!(state.cumulative_value("B"), 10.0);
    }

    #[test]
    fn test_unsupported_rows_never_enter_second_pass() {
        let stores = two_stores();
        let catalog = StoreCatalogBuilder::new().build(&stores, 0.0);
        let progress = ProgressTable::new(vec![]);
        let stock = StockTable::new();
        let scoring = ScoringEngine::new(&progress, &stock, 100, 0, 1.0);
        let mut state = AssignmentState::new(&catalog);

        let pallets = vec![Pallet::new("X", vec![(FunctionCode::new("77"), 1.0)])];
        let mut results =
            GreedyScheduler::new().run(&pallets, &stores, &catalog, &scoring, &mut state);
        let outcome = ReassignmentResolver::new(5.0).resolve(
            &mut results,
            &pallets,
            &catalog,
            &scoring,
            &mut state,
        );
        assert!(outcome.is_none());
        assert_eq!(results[0].status, AssignmentStatus::NoSupportedFunctions);
    }
}
