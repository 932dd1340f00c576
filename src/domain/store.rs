// ==========================================
// 托盘门店分配系统 - 门店领域模型
// ==========================================
// 用途: 门店历史表现快照（每个功能代码一组 delivered / sales / ST value）
// 红线: 单次运行内只读
// ==========================================

use crate::domain::types::FunctionCode;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ==========================================
// FunctionMetrics - 单功能代码指标
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FunctionMetrics {
    pub delivered: f64, // 累计交付量
    pub sales: f64,     // 累计销量
    pub st_value: f64,  // 售罄率 (sell-through)
}

// ==========================================
// StoreRecord - 门店属性行
// ==========================================
// functions 保持列顺序，求和顺序固定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub store_name: String,
    pub functions: Vec<(FunctionCode, FunctionMetrics)>,
}

impl StoreRecord {
    pub fn new(store_name: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
            functions: Vec::new(),
        }
    }

    /// 链式追加功能指标（测试与导入共用）
    pub fn with_function(
        mut self,
        code: impl Into<FunctionCode>,
        delivered: f64,
        sales: f64,
        st_value: f64,
    ) -> Self {
        self.set_metrics(
            code.into(),
            FunctionMetrics {
                delivered,
                sales,
                st_value,
            },
        );
        self
    }

    /// 写入功能指标（同代码覆盖）
    pub fn set_metrics(&mut self, code: FunctionCode, metrics: FunctionMetrics) {
        match self.functions.iter_mut().find(|(existing, _)| *existing == code) {
            Some((_, slot)) => *slot = metrics,
            None => self.functions.push((code, metrics)),
        }
    }

    pub fn metrics(&self, code: &FunctionCode) -> Option<&FunctionMetrics> {
        self.functions
            .iter()
            .find(|(existing, _)| existing == code)
            .map(|(_, metrics)| metrics)
    }

    /// 某功能代码的交付量（列不存在视为 0）
    pub fn delivered(&self, code: &FunctionCode) -> f64 {
        self.metrics(code).map(|m| m.delivered).unwrap_or(0.0)
    }

    /// 全部功能代码的交付量之和
    pub fn total_delivered(&self) -> f64 {
        self.functions.iter().map(|(_, m)| m.delivered).sum()
    }

    /// 是否对每个功能代码都有正交付量（单个 0 即不合格）
    pub fn delivers_all(&self, codes: &[FunctionCode]) -> bool {
        codes.iter().all(|code| self.delivered(code) > 0.0)
    }
}

// ==========================================
// StoreTable - 门店表
// ==========================================
// function_codes: 表头中的功能代码（列顺序）
// stores: 门店行（输入顺序即枚举顺序，用于同分时的稳定排序）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreTable {
    function_codes: Vec<FunctionCode>,
    stores: Vec<StoreRecord>,
}

impl StoreTable {
    /// 构造门店表
    ///
    /// 表头代码与各门店行中出现的代码取并集，作为 "<code> delivered" 列的全集。
    pub fn new(function_codes: Vec<FunctionCode>, stores: Vec<StoreRecord>) -> Self {
        let mut seen: HashSet<FunctionCode> = HashSet::new();
        let mut schema = Vec::new();
        for code in function_codes {
            if seen.insert(code.clone()) {
                schema.push(code);
            }
        }
        for store in &stores {
            for (code, _) in &store.functions {
                if seen.insert(code.clone()) {
                    schema.push(code.clone());
                }
            }
        }

        Self {
            function_codes: schema,
            stores,
        }
    }

    pub fn function_codes(&self) -> &[FunctionCode] {
        &self.function_codes
    }

    pub fn stores(&self) -> &[StoreRecord] {
        &self.stores
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// 门店表是否存在该功能代码的交付列
    pub fn supports(&self, code: &FunctionCode) -> bool {
        self.function_codes.contains(code)
    }

    pub fn store_names(&self) -> impl Iterator<Item = &str> {
        self.stores.iter().map(|s| s.store_name.as_str())
    }
}
