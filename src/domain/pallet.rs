// ==========================================
// 托盘门店分配系统 - 托盘领域模型
// ==========================================
// 用途: 入库托盘（每个功能代码一列数量）
// 派生: total_value = 数量之和, function_set = 数量 > 0 的功能代码
// ==========================================

use crate::domain::types::{normalize_identifier, FunctionCode};
use serde::{Deserialize, Serialize};

// ==========================================
// Pallet - 托盘
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pallet {
    pub pallet_id: String,                  // 规范化后的托盘号
    pub quantities: Vec<(FunctionCode, f64)>, // 按列顺序的功能数量
}

impl Pallet {
    /// 构造托盘（托盘号在此处统一规范化）
    pub fn new(raw_id: &str, quantities: Vec<(FunctionCode, f64)>) -> Self {
        Self {
            pallet_id: normalize_identifier(raw_id),
            quantities,
        }
    }

    /// 托盘总价值（全部数量列之和，不含托盘号）
    pub fn total_value(&self) -> f64 {
        self.quantities.iter().map(|(_, qty)| qty).sum()
    }

    /// 托盘功能集合（数量 > 0 的功能代码，保持列顺序）
    pub fn function_set(&self) -> Vec<FunctionCode> {
        self.quantities
            .iter()
            .filter(|(_, qty)| *qty > 0.0)
            .map(|(code, _)| code.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pallet() -> Pallet {
        Pallet::new(
            "5001.0",
            vec![
                (FunctionCode::new("10"), 12.0),
                (FunctionCode::new("20"), 0.0),
                (FunctionCode::new("30"), 3.5),
            ],
        )
    }

    #[test]
    fn test_pallet_id_is_normalized() {
        assert_eq!(pallet().pallet_id, "5001");
    }

    #[test]
    fn test_total_value_and_function_set() {
        let p = pallet();
        assert_eq!(p.total_value(), 15.5);
        let codes: Vec<String> = p.function_set().iter().map(|c| c.to_string()).collect();
        assert_eq!(codes, vec!["10", "30"]);
    }
}
