// ==========================================
// 托盘门店分配系统 - 进度表 / 库存表
// ==========================================
// 进度表: 每店每功能一个标量（平均进度）
// 库存表: 每店每功能一个数量，另含全局各功能合计
// 红线: 缺失门店在进入引擎前补零，引擎查询缺失一律视为 0
// ==========================================

use crate::domain::types::FunctionCode;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ==========================================
// ProgressTable - 进度表
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressTable {
    columns: HashSet<FunctionCode>,
    values: HashMap<String, HashMap<FunctionCode, f64>>,
}

impl ProgressTable {
    pub fn new(columns: Vec<FunctionCode>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            values: HashMap::new(),
        }
    }

    /// 写入一店一功能的进度值（列不在表头中时自动补列）
    pub fn insert(&mut self, store_name: &str, code: FunctionCode, value: f64) {
        self.columns.insert(code.clone());
        self.values
            .entry(store_name.to_string())
            .or_default()
            .insert(code, value);
    }

    pub fn has_column(&self, code: &FunctionCode) -> bool {
        self.columns.contains(code)
    }

    pub fn contains_store(&self, store_name: &str) -> bool {
        self.values.contains_key(store_name)
    }

    /// 进度值（列缺失 / 门店缺失 → 0）
    pub fn value(&self, store_name: &str, code: &FunctionCode) -> f64 {
        if !self.has_column(code) {
            return 0.0;
        }
        self.values
            .get(store_name)
            .and_then(|row| row.get(code))
            .copied()
            .unwrap_or(0.0)
    }

    /// 为缺失的门店补零行，返回补入数量
    pub fn zero_fill<'a>(&mut self, store_names: impl IntoIterator<Item = &'a str>) -> usize {
        let mut filled = 0;
        for name in store_names {
            if !self.values.contains_key(name) {
                self.values.insert(name.to_string(), HashMap::new());
                filled += 1;
            }
        }
        filled
    }

    pub fn store_count(&self) -> usize {
        self.values.len()
    }
}

// ==========================================
// StockTable - 库存表
// ==========================================
// rows 保持输入顺序，totals 在写入时累加，求和顺序固定
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockTable {
    rows: Vec<(String, HashMap<FunctionCode, f64>)>,
    index: HashMap<String, usize>,
    totals: HashMap<FunctionCode, f64>,
}

impl StockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加一店一功能的库存量（同店重复行相加）
    pub fn add(&mut self, store_name: &str, code: FunctionCode, quantity: f64) {
        let row_idx = match self.index.get(store_name) {
            Some(idx) => *idx,
            None => {
                self.rows.push((store_name.to_string(), HashMap::new()));
                let idx = self.rows.len() - 1;
                self.index.insert(store_name.to_string(), idx);
                idx
            }
        };
        *self.rows[row_idx].1.entry(code.clone()).or_insert(0.0) += quantity;
        *self.totals.entry(code).or_insert(0.0) += quantity;
    }

    pub fn contains_store(&self, store_name: &str) -> bool {
        self.index.contains_key(store_name)
    }

    /// 门店在给定功能集合上的库存合计
    pub fn store_quantity(&self, store_name: &str, codes: &[FunctionCode]) -> f64 {
        let Some(idx) = self.index.get(store_name) else {
            return 0.0;
        };
        let row = &self.rows[*idx].1;
        codes.iter().map(|code| row.get(code).copied().unwrap_or(0.0)).sum()
    }

    /// 全部门店（含不合格门店）在给定功能集合上的库存合计
    pub fn total_quantity(&self, codes: &[FunctionCode]) -> f64 {
        codes
            .iter()
            .map(|code| self.totals.get(code).copied().unwrap_or(0.0))
            .sum()
    }

    /// 为缺失的门店补零行，返回补入数量
    pub fn zero_fill<'a>(&mut self, store_names: impl IntoIterator<Item = &'a str>) -> usize {
        let mut filled = 0;
        for name in store_names {
            if !self.index.contains_key(name) {
                self.rows.push((name.to_string(), HashMap::new()));
                self.index.insert(name.to_string(), self.rows.len() - 1);
                filled += 1;
            }
        }
        filled
    }

    pub fn store_count(&self) -> usize {
        self.rows.len()
    }
}
