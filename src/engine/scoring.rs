// ==========================================
// 托盘门店分配系统 - 评分引擎
// ==========================================
// 职责: 对 (门店, 功能集合) 计算期望度得分
// 红线: 纯计算,无状态修改,无 I/O
// 前置: 功能集合非空（调用方负责过滤）
// ==========================================
// 1) WHA = Σ(ST·delivered) / Σ(delivered)     （仅 delivered > 0 的代码）
// 2) PA  = mean(progress[store][code])
// 3) C   = (I1·WHA + I2·PA) / 100
// 4) ps  = Σstock[store][F] / Σstock[全部门店][F]
// 5) P   = max(C, 0)^α / (1 + ps^(1-α))
// ==========================================

use crate::domain::assignment::ScoreBreakdown;
use crate::domain::metrics::{ProgressTable, StockTable};
use crate::domain::store::StoreRecord;
use crate::domain::types::FunctionCode;

// ==========================================
// ScoringEngine - 评分引擎
// ==========================================
pub struct ScoringEngine<'a> {
    progress: &'a ProgressTable,
    stock: &'a StockTable,
    history_weight: f64,
    progress_weight: f64,
    alpha: f64,
}

impl<'a> ScoringEngine<'a> {
    /// 创建评分引擎
    ///
    /// # 参数
    /// - progress / stock: 只读进度表、库存表
    /// - history_weight / progress_weight: I1 / I2（已校验 I1 + I2 = 100）
    /// - alpha: 得分指数（已校验 ∈ [0, 1]）
    pub fn new(
        progress: &'a ProgressTable,
        stock: &'a StockTable,
        history_weight: u32,
        progress_weight: u32,
        alpha: f64,
    ) -> Self {
        Self {
            progress,
            stock,
            history_weight: f64::from(history_weight),
            progress_weight: f64::from(progress_weight),
            alpha,
        }
    }

    /// 计算门店对功能集合的完整评分
    pub fn score(&self, store: &StoreRecord, codes: &[FunctionCode]) -> ScoreBreakdown {
        let historical_average = Self::weighted_historical_average(store, codes);
        let progress_average = Self::progress_average(self.progress, &store.store_name, codes);
        let combined_average = Self::combined_average(
            self.history_weight,
            self.progress_weight,
            historical_average,
            progress_average,
        );
        let stock_share = Self::stock_share(self.stock, &store.store_name, codes);
        let score = Self::desirability_score(combined_average, stock_share, self.alpha);

        ScoreBreakdown {
            score,
            stock_share,
            combined_average,
            historical_average,
            progress_average,
        }
    }

    // ==========================================
    // 纯函数
    // ==========================================

    /// 加权历史均值（无合格代码时为 0）
    pub fn weighted_historical_average(store: &StoreRecord, codes: &[FunctionCode]) -> f64 {
        let mut weighted_st = 0.0;
        let mut delivered_sum = 0.0;
        for code in codes {
            if let Some(metrics) = store.metrics(code) {
                if metrics.delivered > 0.0 {
                    weighted_st += metrics.st_value * metrics.delivered;
                    delivered_sum += metrics.delivered;
                }
            }
        }
        if delivered_sum > 0.0 {
            weighted_st / delivered_sum
        } else {
            0.0
        }
    }

    /// 进度均值（列缺失按 0 计入分母）
    pub fn progress_average(
        progress: &ProgressTable,
        store_name: &str,
        codes: &[FunctionCode],
    ) -> f64 {
        if codes.is_empty() {
            return 0.0;
        }
        let sum: f64 = codes
            .iter()
            .map(|code| progress.value(store_name, code))
            .sum();
        sum / codes.len() as f64
    }

    /// 综合均值 C = (I1·WHA + I2·PA) / 100
    pub fn combined_average(
        history_weight: f64,
        progress_weight: f64,
        historical_average: f64,
        progress_average: f64,
    ) -> f64 {
        (history_weight * historical_average + progress_weight * progress_average) / 100.0
    }

    /// 库存占比（分母为 0 时为 0）
    pub fn stock_share(stock: &StockTable, store_name: &str, codes: &[FunctionCode]) -> f64 {
        let total = stock.total_quantity(codes);
        if total > 0.0 {
            stock.store_quantity(store_name, codes) / total
        } else {
            0.0
        }
    }

    /// 期望度得分 P = max(C, 0)^α / (1 + ps^(1-α))
    ///
    /// C 截断到 0 避免负底数的分数次幂；ps 同样截断到 0，保证得分 >= 0。
    pub fn desirability_score(combined_average: f64, stock_share: f64, alpha: f64) -> f64 {
        let numerator = combined_average.max(0.0).powf(alpha);
        let denominator = 1.0 + stock_share.max(0.0).powf(1.0 - alpha);
        numerator / denominator
    }
}
