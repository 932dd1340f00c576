// ==========================================
// 托盘门店分配系统 - 候选门店收集与排序
// ==========================================
// 两轮共用: 遍历合格门店 → 过滤谓词 → 评分 → 稳定降序排序
// 同分按门店枚举顺序（sort_by 稳定）
// ==========================================

use crate::domain::assignment::ScoreBreakdown;
use crate::domain::types::FunctionCode;
use crate::engine::scoring::ScoringEngine;
use crate::engine::store_catalog::{EligibleStore, StoreCatalog};

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub store_name: String,
    pub breakdown: ScoreBreakdown,
}

/// 收集并排序候选门店
///
/// # 参数
/// - catalog: 合格门店目录（枚举顺序）
/// - codes: 功能集合（非空）
/// - scoring: 评分引擎
/// - admit: 额外过滤谓词（已占用 / 容量上限等）
///
/// # 返回
/// 按得分降序的候选列表；delivered 对任一功能为 0 的门店不入选
pub fn collect_ranked_candidates<F>(
    catalog: &StoreCatalog,
    codes: &[FunctionCode],
    scoring: &ScoringEngine<'_>,
    mut admit: F,
) -> Vec<ScoredCandidate>
where
    F: FnMut(&EligibleStore) -> bool,
{
    let candidates: Vec<ScoredCandidate> = catalog
        .eligible()
        .iter()
        .filter(|store| admit(store))
        .filter(|store| store.record.delivers_all(codes))
        .map(|store| ScoredCandidate {
            store_name: store.name().to_string(),
            breakdown: scoring.score(&store.record, codes),
        })
        .collect();

    rank_descending(candidates)
}

/// 按得分稳定降序排序
pub fn rank_descending(mut candidates: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    candidates.sort_by(|a, b| b.breakdown.score.total_cmp(&a.breakdown.score));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, score: f64) -> ScoredCandidate {
        ScoredCandidate {
            store_name: name.to_string(),
            breakdown: ScoreBreakdown {
                score,
                ..ScoreBreakdown::default()
            },
        }
    }

    #[test]
    fn test_rank_descending_is_stable_on_ties() {
        let ranked = rank_descending(vec![
            candidate("A", 0.2),
            candidate("B", 0.5),
            candidate("C", 0.2),
            candidate("D", 0.5),
        ]);
        let names: Vec<&str> = ranked.iter().map(|c| c.store_name.as_str()).collect();
        assert_eq!(names, vec!["B", "D", "A", "C"]);
    }
}
