// ==========================================
// 托盘门店分配系统 - 分配运行状态
// ==========================================
// 红线: 每次运行新建，禁止跨运行复用
// 内容: 门店累计分配价值（两轮共用） + 第一轮已分配门店集合
// ==========================================

use crate::domain::assignment::StoreLoad;
use crate::engine::store_catalog::StoreCatalog;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct AssignmentState {
    cumulative_value: HashMap<String, f64>,
    pallet_count: HashMap<String, usize>,
    assigned_stores: HashSet<String>,
}

impl AssignmentState {
    /// 新建运行状态，合格门店累计价值初始化为 0
    pub fn new(catalog: &StoreCatalog) -> Self {
        let cumulative_value = catalog
            .eligible()
            .iter()
            .map(|store| (store.name().to_string(), 0.0))
            .collect();

        Self {
            cumulative_value,
            pallet_count: HashMap::new(),
            assigned_stores: HashSet::new(),
        }
    }

    /// 门店当前累计分配价值
    pub fn cumulative_value(&self, store_name: &str) -> f64 {
        self.cumulative_value.get(store_name).copied().unwrap_or(0.0)
    }

    /// 第一轮是否已占用该门店
    pub fn is_assigned(&self, store_name: &str) -> bool {
        self.assigned_stores.contains(store_name)
    }

    /// 第一轮落位：标记门店已占用 + 累加价值
    pub fn record_direct(&mut self, store_name: &str, pallet_value: f64) {
        self.assigned_stores.insert(store_name.to_string());
        self.add_value(store_name, pallet_value);
    }

    /// 累加门店价值（第二轮只累加，不改第一轮集合）
    pub fn add_value(&mut self, store_name: &str, pallet_value: f64) {
        *self
            .cumulative_value
            .entry(store_name.to_string())
            .or_insert(0.0) += pallet_value;
        *self.pallet_count.entry(store_name.to_string()).or_insert(0) += 1;
    }

    pub fn assigned_store_count(&self) -> usize {
        self.assigned_stores.len()
    }

    /// 按合格门店顺序导出累计价值
    pub fn store_loads(&self, catalog: &StoreCatalog) -> Vec<StoreLoad> {
        catalog
            .eligible()
            .iter()
            .map(|store| StoreLoad {
                store_name: store.name().to_string(),
                assigned_value: self.cumulative_value(store.name()),
                pallet_count: self.pallet_count.get(store.name()).copied().unwrap_or(0),
            })
            .collect()
    }
}
