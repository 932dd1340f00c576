// ==========================================
// 托盘门店分配系统 - 门店表加载器（ST 表）
// ==========================================
// 源表布局:
//   第 0 行: 横幅表头，首格为门店键列
//   第 1 行: 功能代码，位于第 1、4、7… 列（每 3 列一组）
//   第 2 行: 子表头（忽略）
//   第 3 行起: 数据行
// 每组 3 列依次为: 累计交付 / 累计销售 / ST 值
// 规则: 门店名为空的行丢弃；空白数值按 0
// ==========================================

use crate::domain::store::{FunctionMetrics, StoreRecord, StoreTable};
use crate::domain::types::FunctionCode;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::RawGrid;
use tracing::debug;

const TABLE_NAME: &str = "门店表";
const CODE_ROW: usize = 1;
const FIRST_DATA_ROW: usize = 3;
const COLUMNS_PER_CODE: usize = 3;

pub struct StoreTableLoader {
    cleaner: DataCleaner,
}

impl StoreTableLoader {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 从原始网格加载门店表
    pub fn load(&self, grid: &RawGrid) -> ImportResult<StoreTable> {
        let code_row = grid
            .row(CODE_ROW)
            .ok_or_else(|| ImportError::EmptyTable(TABLE_NAME.to_string()))?;

        // (功能代码, 起始列)
        let families: Vec<(FunctionCode, usize)> = (1..code_row.len())
            .step_by(COLUMNS_PER_CODE)
            .filter_map(|col| {
                let raw = grid.cell(CODE_ROW, col);
                if raw.is_empty() {
                    None
                } else {
                    Some((FunctionCode::new(raw), col))
                }
            })
            .collect();

        if families.is_empty() {
            return Err(ImportError::MissingColumn {
                table: TABLE_NAME.to_string(),
                column: "功能代码".to_string(),
            });
        }

        let mut stores = Vec::new();
        for row_idx in FIRST_DATA_ROW..grid.len() {
            let store_name = self.cleaner.clean_text(grid.cell(row_idx, 0));
            if self.cleaner.normalize_null(&store_name).is_none() {
                debug!(row = row_idx, "门店名为空，丢弃");
                continue;
            }

            let mut record = StoreRecord::new(store_name);
            for (code, col) in &families {
                let metrics = FunctionMetrics {
                    delivered: self.parse(grid, row_idx, *col, code, "delivered")?,
                    sales: self.parse(grid, row_idx, col + 1, code, "sales")?,
                    st_value: self.parse(grid, row_idx, col + 2, code, "st_value")?,
                };
                record.set_metrics(code.clone(), metrics);
            }
            stores.push(record);
        }

        debug!(
            codes = families.len(),
            stores = stores.len(),
            "门店表加载完成"
        );

        let codes = families.into_iter().map(|(code, _)| code).collect();
        Ok(StoreTable::new(codes, stores))
    }

    fn parse(
        &self,
        grid: &RawGrid,
        row: usize,
        col: usize,
        code: &FunctionCode,
        suffix: &str,
    ) -> ImportResult<f64> {
        self.cleaner.parse_quantity(
            grid.cell(row, col),
            row + 1,
            &format!("{} {}", code, suffix),
        )
    }
}

impl Default for StoreTableLoader {
    fn default() -> Self {
        Self::new()
    }
}
