// ==========================================
// 托盘门店分配系统 - 结果导出器
// ==========================================
// 输出: 每托盘一行 CSV（输入顺序），汇总 JSON
// 列: pallet_id, status, assigned_store, score, stock_share,
//     combined_average, historical_average, progress_average,
//     function_codes, pallet_value
// ==========================================

use crate::domain::assignment::{AssignmentReport, AssignmentResult, AssignmentSummary};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// 导出错误（csv / io / json 三类来源）
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// CSV 行（字段顺序即列顺序）
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    pallet_id: &'a str,
    status: &'static str,
    assigned_store: String,
    score: f64,
    stock_share: f64,
    combined_average: f64,
    historical_average: f64,
    progress_average: f64,
    function_codes: String,
    pallet_value: f64,
}

impl<'a> From<&'a AssignmentResult> for ExportRow<'a> {
    fn from(result: &'a AssignmentResult) -> Self {
        Self {
            pallet_id: &result.pallet_id,
            status: result.status.to_db_str(),
            assigned_store: result.display_store(),
            score: result.score,
            stock_share: result.stock_share,
            combined_average: result.combined_average,
            historical_average: result.historical_average,
            progress_average: result.progress_average,
            function_codes: result.function_codes_text(),
            pallet_value: result.pallet_value,
        }
    }
}

pub struct ResultExporter;

impl ResultExporter {
    /// 写入任意 Writer
    pub fn write_csv<W: Write>(&self, results: &[AssignmentResult], writer: W) -> ExportResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for result in results {
            csv_writer.serialize(ExportRow::from(result))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// 写入文件
    pub fn export_to_path(&self, report: &AssignmentReport, path: &Path) -> ExportResult<()> {
        let file = File::create(path)?;
        self.write_csv(&report.results, file)?;
        info!(path = %path.display(), rows = report.results.len(), "结果已导出");
        Ok(())
    }

    /// 导出为内存字符串
    pub fn to_csv_string(&self, results: &[AssignmentResult]) -> ExportResult<String> {
        let mut buffer = Vec::new();
        self.write_csv(results, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// 汇总 JSON
    pub fn summary_json(&self, summary: &AssignmentSummary) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(summary)?)
    }
}
