// ==========================================
// 托盘门店分配系统 - 导出层
// ==========================================
// 职责: 将分配结果表写为 CSV, 汇总写为 JSON
// ==========================================

pub mod csv_exporter;

pub use csv_exporter::{ExportError, ExportResult, ResultExporter};
