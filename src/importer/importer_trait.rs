// ==========================================
// 托盘门店分配系统 - 导入接口 Trait
// ==========================================
// 职责: 定义文件解析与数据集导入接口（不包含实现）
// ==========================================

use crate::domain::dataset::AllocationDataset;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

// ==========================================
// RawGrid - 原始单元格网格
// ==========================================
// 行列顺序与源文件一致，单元格已 trim，完全空白的行已跳过
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGrid {
    rows: Vec<Vec<String>>,
}

impl RawGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, idx: usize) -> Option<&[String]> {
        self.rows.get(idx).map(Vec::as_slice)
    }

    /// 单元格文本（越界视为空串）
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser, ExcelParser
pub trait FileParser {
    /// 解析文件为原始网格（首个工作表 / 整个 CSV）
    fn parse_to_grid(&self, file_path: &Path) -> ImportResult<RawGrid>;
}

// ==========================================
// DatasetPaths - 四个输入文件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub store_file: PathBuf,    // 门店表（ST 表）
    pub progress_file: PathBuf, // 进度表
    pub stock_file: PathBuf,    // 库存表
    pub pallet_file: PathBuf,   // 托盘表
}

// ==========================================
// DatasetImporter Trait
// ==========================================
// 实现者: DatasetImporterImpl
#[async_trait]
pub trait DatasetImporter: Send + Sync {
    /// 加载四个输入文件并补零，产出引擎可直接消费的数据集
    ///
    /// # 返回
    /// - Ok(AllocationDataset): 已补零的数据集
    /// - Err: 文件读取 / 表结构 / 数值转换错误
    async fn import_dataset(&self, paths: &DatasetPaths) -> ImportResult<AllocationDataset>;
}
