// ==========================================
// 托盘门店分配系统 - 分配参数
// ==========================================
// I1: 加权历史均值权重 (%)   I2 = 100 - I1: 进度均值权重 (%)
// alpha: 得分指数            delivered_threshold: 门店准入累计交付阈值
// reassign_multiplier: 重分配容量上限 = 最大托盘价值 × 倍数
// ==========================================

use crate::engine::error::{AllocationError, AllocationResult};
use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_WEIGHT: u32 = 70;
pub const DEFAULT_ALPHA: f64 = 0.7;
pub const DEFAULT_DELIVERED_THRESHOLD: f64 = 100_000.0;
pub const DEFAULT_REASSIGN_MULTIPLIER: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationParams {
    pub history_weight: u32,
    pub progress_weight: u32,
    pub alpha: f64,
    pub delivered_threshold: f64,
    pub reassign_multiplier: f64,
}

impl AllocationParams {
    /// 按 I1 派生 I2 = 100 - I1（I1 > 100 时 I2 取 0，交由 validate 拒绝）
    pub fn with_history_weight(mut self, history_weight: u32) -> Self {
        self.history_weight = history_weight;
        self.progress_weight = 100u32.saturating_sub(history_weight);
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_delivered_threshold(mut self, threshold: f64) -> Self {
        self.delivered_threshold = threshold;
        self
    }

    pub fn with_reassign_multiplier(mut self, multiplier: f64) -> Self {
        self.reassign_multiplier = multiplier;
        self
    }

    /// 前置校验（任何分配工作之前执行）
    pub fn validate(&self) -> AllocationResult<()> {
        if self.history_weight > 100
            || self.progress_weight > 100
            || self.history_weight + self.progress_weight != 100
        {
            return Err(AllocationError::InvalidBlendWeights {
                history_weight: self.history_weight,
                progress_weight: self.progress_weight,
            });
        }

        for (field, value) in [
            ("alpha", self.alpha),
            ("delivered_threshold", self.delivered_threshold),
            ("reassign_multiplier", self.reassign_multiplier),
        ] {
            if !value.is_finite() {
                return Err(AllocationError::NonFiniteParameter {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(AllocationError::AlphaOutOfRange(self.alpha));
        }
        if self.delivered_threshold < 0.0 {
            return Err(AllocationError::NegativeThreshold(self.delivered_threshold));
        }
        if self.reassign_multiplier < 1.0 {
            return Err(AllocationError::InvalidMultiplier(self.reassign_multiplier));
        }
        Ok(())
    }
}

impl Default for AllocationParams {
    fn default() -> Self {
        Self {
            history_weight: DEFAULT_HISTORY_WEIGHT,
            progress_weight: 100 - DEFAULT_HISTORY_WEIGHT,
            alpha: DEFAULT_ALPHA,
            delivered_threshold: DEFAULT_DELIVERED_THRESHOLD,
            reassign_multiplier: DEFAULT_REASSIGN_MULTIPLIER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let params = AllocationParams::default();
        assert_eq!(params.history_weight, 70);
        assert_eq!(params.progress_weight, 30);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_with_history_weight_derives_progress_weight() {
        let params = AllocationParams::default().with_history_weight(25);
        assert_eq!(params.progress_weight, 75);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_weights_not_summing_to_100_rejected() {
        let params = AllocationParams {
            history_weight: 60,
            progress_weight: 30,
            ..AllocationParams::default()
        };
        assert_eq!(
            params.validate(),
            Err(AllocationError::InvalidBlendWeights {
                history_weight: 60,
                progress_weight: 30
            })
        );
        assert!(AllocationParams::default()
            .with_history_weight(120)
            .validate()
            .is_err());
    }

    #[test]
    fn test_alpha_bounds() {
        assert!(AllocationParams::default().with_alpha(0.0).validate().is_ok());
        assert!(AllocationParams::default().with_alpha(1.0).validate().is_ok());
        assert_eq!(
            AllocationParams::default().with_alpha(1.2).validate(),
            Err(AllocationError::AlphaOutOfRange(1.2))
        );
        assert!(matches!(
            AllocationParams::default().with_alpha(f64::NAN).validate(),
            Err(AllocationError::NonFiniteParameter { .. })
        ));
    }

    #[test]
    fn test_threshold_and_multiplier_bounds() {
        assert!(matches!(
            AllocationParams::default()
                .with_delivered_threshold(-1.0)
                .validate(),
            Err(AllocationError::NegativeThreshold(_))
        ));
        assert!(matches!(
            AllocationParams::default()
                .with_reassign_multiplier(0.5)
                .validate(),
            Err(AllocationError::InvalidMultiplier(_))
        ));
        assert!(AllocationParams::default()
            .with_reassign_multiplier(1.0)
            .validate()
            .is_ok());
    }
}
