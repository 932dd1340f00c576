// ==========================================
// 托盘门店分配系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 仅用于前置校验，校验失败时不产生任何部分结果
// ==========================================

use thiserror::Error;

/// 分配引擎错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error("权重之和必须为 100: I1={history_weight}, I2={progress_weight}")]
    InvalidBlendWeights {
        history_weight: u32,
        progress_weight: u32,
    },

    #[error("alpha 必须在 [0, 1] 范围内: {0}")]
    AlphaOutOfRange(f64),

    #[error("交付阈值不能为负: {0}")]
    NegativeThreshold(f64),

    #[error("重分配容量倍数必须 >= 1: {0}")]
    InvalidMultiplier(f64),

    #[error("参数必须为有限数值: {field}={value}")]
    NonFiniteParameter { field: String, value: f64 },
}

/// Result 类型别名
pub type AllocationResult<T> = Result<T, AllocationError>;
