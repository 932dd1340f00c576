// ==========================================
// 托盘门店分配系统 - 门店准入目录
// ==========================================
// 职责: 按累计交付阈值过滤门店，产出合格门店全集
// 红线: 低于阈值的门店直接剔除（硬切，不是降权）
// 红线: 准入结果单次运行内冻结
// ==========================================

use crate::domain::store::{StoreRecord, StoreTable};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

// ==========================================
// EligibleStore - 合格门店
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct EligibleStore {
    pub record: StoreRecord,
    pub total_delivered: f64,
}

impl EligibleStore {
    pub fn name(&self) -> &str {
        &self.record.store_name
    }
}

// ==========================================
// StoreCatalog - 合格门店目录（门店表顺序）
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct StoreCatalog {
    eligible: Vec<EligibleStore>,
    index: HashMap<String, usize>,
    excluded_count: usize,
    threshold: f64,
}

impl StoreCatalog {
    pub fn eligible(&self) -> &[EligibleStore] {
        &self.eligible
    }

    pub fn get(&self, store_name: &str) -> Option<&EligibleStore> {
        self.index.get(store_name).map(|idx| &self.eligible[*idx])
    }

    pub fn contains(&self, store_name: &str) -> bool {
        self.index.contains_key(store_name)
    }

    pub fn len(&self) -> usize {
        self.eligible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eligible.is_empty()
    }

    pub fn excluded_count(&self) -> usize {
        self.excluded_count
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

// ==========================================
// StoreCatalogBuilder - 门店准入构建器
// ==========================================
pub struct StoreCatalogBuilder {
    // 无状态引擎，不需要注入依赖
}

impl StoreCatalogBuilder {
    pub fn new() -> Self {
        Self {}
    }

    /// 构建合格门店目录
    ///
    /// 规则: total_delivered = Σ 各功能 delivered；total_delivered >= threshold 即合格。
    /// 同名门店只保留首次出现的行。
    #[instrument(skip(self, table), fields(store_count = table.len()))]
    pub fn build(&self, table: &StoreTable, threshold: f64) -> StoreCatalog {
        let mut eligible = Vec::new();
        let mut index = HashMap::new();
        let mut excluded_count = 0;
        let mut seen: HashSet<&str> = HashSet::new();

        for record in table.stores() {
            if !seen.insert(record.store_name.as_str()) {
                debug!(store = %record.store_name, "重复门店行，忽略");
                continue;
            }

            let total_delivered = record.total_delivered();
            if total_delivered >= threshold {
                index.insert(record.store_name.clone(), eligible.len());
                eligible.push(EligibleStore {
                    record: record.clone(),
                    total_delivered,
                });
            } else {
                excluded_count += 1;
            }
        }

        debug!(
            eligible = eligible.len(),
            excluded = excluded_count,
            "门店准入完成"
        );

        StoreCatalog {
            eligible,
            index,
            excluded_count,
            threshold,
        }
    }
}

impl Default for StoreCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
