// ==========================================
// 托盘门店分配系统 - 数据清洗器
// ==========================================
// 职责: TRIM / NULL 标准化 / 数值解析
// 规则: 空白单元格按 0 处理；兼容小数逗号（"1,5" → 1.5）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};

pub struct DataCleaner;

impl DataCleaner {
    pub fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    /// 空白 / 常见空值标记 → None
    pub fn normalize_null(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        match trimmed.to_lowercase().as_str() {
            "" | "nan" | "null" | "none" | "n/a" => None,
            _ => Some(trimmed.to_string()),
        }
    }

    /// 解析数量 / 数值单元格
    ///
    /// # 参数
    /// - row / field: 出错时用于定位
    pub fn parse_quantity(&self, value: &str, row: usize, field: &str) -> ImportResult<f64> {
        let Some(text) = self.normalize_null(value) else {
            return Ok(0.0);
        };

        let normalized = if text.contains(',') && !text.contains('.') {
            text.replace(',', ".")
        } else {
            text.replace(',', "")
        };

        let parsed = normalized
            .parse::<f64>()
            .map_err(|e| ImportError::TypeConversionError {
                row,
                field: field.to_string(),
                message: format!("{}: {}", text, e),
            })?;

        if !parsed.is_finite() {
            return Err(ImportError::TypeConversionError {
                row,
                field: field.to_string(),
                message: format!("非有限数值: {}", text),
            });
        }
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_basic() {
        assert_eq!(DataCleaner.clean_text("  MILANO  "), "MILANO");
    }

    #[test]
    fn test_normalize_null() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_null("  "), None);
        assert_eq!(cleaner.normalize_null("NaN"), None);
        assert_eq!(cleaner.normalize_null(" value "), Some("value".to_string()));
    }

    #[test]
    fn test_parse_quantity() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_quantity("", 1, "10").unwrap(), 0.0);
        assert_eq!(cleaner.parse_quantity(" 12.5 ", 1, "10").unwrap(), 12.5);
        assert_eq!(cleaner.parse_quantity("1,5", 1, "10").unwrap(), 1.5);
        assert_eq!(cleaner.parse_quantity("1,234.5", 1, "10").unwrap(), 1234.5);
        assert_eq!(cleaner.parse_quantity("-3", 1, "10").unwrap(), -3.0);
    }

    #[test]
    fn test_parse_quantity_rejects_text() {
        let err = DataCleaner.parse_quantity("abc", 7, "20").unwrap_err();
        assert!(matches!(
            err,
            ImportError::TypeConversionError { row: 7, ref field, .. } if field == "20"
        ));
        assert!(DataCleaner.parse_quantity("inf", 1, "10").is_err());
    }
}
