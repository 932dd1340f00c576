// ==========================================
// 托盘门店分配系统 - 托盘表加载器
// ==========================================
// 源表布局: 第 0 行为表头，键列 "ID_PRELIEVO"，其余列名为功能代码
// 规则: 托盘号经 normalize_identifier 规范化；空白数值按 0
// 托盘价值 = 行内全部功能数量之和
// ==========================================

use crate::domain::pallet::Pallet;
use crate::domain::types::FunctionCode;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::RawGrid;
use tracing::{debug, warn};

/// 托盘键列名
pub const PALLET_KEY_COLUMN: &str = "ID_PRELIEVO";

const TABLE_NAME: &str = "托盘表";

pub struct PalletTableLoader {
    cleaner: DataCleaner,
}

impl PalletTableLoader {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 加载托盘列表（保持源文件行顺序）
    pub fn load(&self, grid: &RawGrid) -> ImportResult<Vec<Pallet>> {
        let header = grid
            .row(0)
            .ok_or_else(|| ImportError::EmptyTable(TABLE_NAME.to_string()))?;

        let key_col = header
            .iter()
            .position(|h| h == PALLET_KEY_COLUMN)
            .ok_or_else(|| ImportError::MissingColumn {
                table: TABLE_NAME.to_string(),
                column: PALLET_KEY_COLUMN.to_string(),
            })?;

        let columns: Vec<(usize, FunctionCode)> = header
            .iter()
            .enumerate()
            .filter(|(idx, h)| *idx != key_col && !h.is_empty())
            .map(|(idx, h)| (idx, FunctionCode::new(h)))
            .collect();

        let mut pallets = Vec::new();
        for row_idx in 1..grid.len() {
            let Some(raw_id) = self.cleaner.normalize_null(grid.cell(row_idx, key_col)) else {
                warn!(row = row_idx + 1, "托盘号为空，丢弃该行");
                continue;
            };

            let mut quantities = Vec::with_capacity(columns.len());
            for (col, code) in &columns {
                let qty =
                    self.cleaner
                        .parse_quantity(grid.cell(row_idx, *col), row_idx + 1, code.as_str())?;
                quantities.push((code.clone(), qty));
            }
            pallets.push(Pallet::new(&raw_id, quantities));
        }

        debug!(pallets = pallets.len(), codes = columns.len(), "托盘表加载完成");
        Ok(pallets)
    }
}

impl Default for PalletTableLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_pallets_in_order() {
        let raw = RawGrid::new(vec![
            vec!["ID_PRELIEVO".into(), "10".into(), "20.0".into()],
            vec!["1001.0".into(), "3".into(), "".into()],
            vec!["".into(), "9".into(), "9".into()],
            vec!["PAL-2".into(), "1,5".into(), "2".into()],
        ]);
        let pallets = PalletTableLoader::new().load(&raw).unwrap();

        assert_eq!(pallets.len(), 2);
        assert_eq!(pallets[0].pallet_id, "1001");
        assert_eq!(pallets[0].total_value(), 3.0);
        assert_eq!(pallets[0].function_set(), vec![FunctionCode::new("10")]);
        assert_eq!(pallets[1].pallet_id, "PAL-2");
        assert_eq!(pallets[1].total_value(), 3.5);
        assert_eq!(
            pallets[1].function_set(),
            vec![FunctionCode::new("10"), FunctionCode::new("20")]
        );
    }

    #[test]
    fn test_missing_key_column() {
        let raw = RawGrid::new(vec![vec!["ID".into(), "10".into()]]);
        assert!(matches!(
            PalletTableLoader::new().load(&raw),
            Err(ImportError::MissingColumn { .. })
        ));
    }
}
