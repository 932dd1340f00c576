// ==========================================
// 托盘门店分配系统 - 进度表 / 库存表加载器
// ==========================================
// 源表布局: 第 0 行为表头，键列 "Des Negozio"，其余列名为功能代码
// 规则: 空白数值按 0；键为空的行丢弃
// 重复门店行: 进度表取均值，库存表求和
// ==========================================

use crate::domain::metrics::{ProgressTable, StockTable};
use crate::domain::types::FunctionCode;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::RawGrid;
use std::collections::HashMap;
use tracing::debug;

/// 门店键列名
pub const STORE_KEY_COLUMN: &str = "Des Negozio";

/// 已解析的键值表行: (门店名, [(功能代码, 数值)])
type KeyedRow = (String, Vec<(FunctionCode, f64)>);

pub struct KeyedTableLoader {
    cleaner: DataCleaner,
}

impl KeyedTableLoader {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 加载进度表（同店多行取均值）
    pub fn load_progress(&self, grid: &RawGrid) -> ImportResult<ProgressTable> {
        let (codes, rows) = self.parse_rows(grid, "进度表")?;

        // (门店, 功能) → (合计, 行数)，保持首次出现顺序
        let mut order: Vec<(String, FunctionCode)> = Vec::new();
        let mut accum: HashMap<(String, FunctionCode), (f64, usize)> = HashMap::new();
        for (store, values) in rows {
            for (code, value) in values {
                let key = (store.clone(), code);
                let entry = accum.entry(key.clone()).or_insert_with(|| {
                    order.push(key);
                    (0.0, 0)
                });
                entry.0 += value;
                entry.1 += 1;
            }
        }

        let mut table = ProgressTable::new(codes);
        for key in order {
            if let Some((sum, count)) = accum.get(&key) {
                table.insert(&key.0, key.1.clone(), sum / *count as f64);
            }
        }

        debug!(stores = table.store_count(), "进度表加载完成");
        Ok(table)
    }

    /// 加载库存表（同店多行求和）
    pub fn load_stock(&self, grid: &RawGrid) -> ImportResult<StockTable> {
        let (_codes, rows) = self.parse_rows(grid, "库存表")?;

        let mut table = StockTable::new();
        for (store, values) in rows {
            for (code, quantity) in values {
                table.add(&store, code, quantity);
            }
        }

        debug!(stores = table.store_count(), "库存表加载完成");
        Ok(table)
    }

    fn parse_rows(
        &self,
        grid: &RawGrid,
        table_name: &str,
    ) -> ImportResult<(Vec<FunctionCode>, Vec<KeyedRow>)> {
        let header = grid
            .row(0)
            .ok_or_else(|| ImportError::EmptyTable(table_name.to_string()))?;

        let key_col = header
            .iter()
            .position(|h| h == STORE_KEY_COLUMN)
            .ok_or_else(|| ImportError::MissingColumn {
                table: table_name.to_string(),
                column: STORE_KEY_COLUMN.to_string(),
            })?;

        let columns: Vec<(usize, FunctionCode)> = header
            .iter()
            .enumerate()
            .filter(|(idx, h)| *idx != key_col && !h.is_empty())
            .map(|(idx, h)| (idx, FunctionCode::new(h)))
            .collect();

        let mut rows = Vec::new();
        for row_idx in 1..grid.len() {
            let Some(store) = self.cleaner.normalize_null(grid.cell(row_idx, key_col)) else {
                continue;
            };

            let mut values = Vec::with_capacity(columns.len());
            for (col, code) in &columns {
                let value =
                    self.cleaner
                        .parse_quantity(grid.cell(row_idx, *col), row_idx + 1, code.as_str())?;
                values.push((code.clone(), value));
            }
            rows.push((store, values));
        }

        let codes = columns.into_iter().map(|(_, code)| code).collect();
        Ok((codes, rows))
    }
}

impl Default for KeyedTableLoader {
    fn default() -> Self {
        Self::new()
    }
}
