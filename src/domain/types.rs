// ==========================================
// 托盘门店分配系统 - 领域类型定义
// ==========================================
// 职责: 功能代码 / 分配状态 / 标识规范化
// 红线: 纯类型与纯函数,不含分配逻辑
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 标识规范化
// ==========================================

/// 规范化标识（托盘号 / 功能代码）
///
/// 电子表格中的数字标识常以浮点形式携带（如 "1024.0"），
/// 这里去掉纯数字的小数后缀，其余文本只做 trim。
///
/// # 示例
/// ```
/// use pallet_allocation::domain::types::normalize_identifier;
/// assert_eq!(normalize_identifier(" 1024.0 "), "1024");
/// assert_eq!(normalize_identifier("PAL-7"), "PAL-7");
/// ```
pub fn normalize_identifier(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some((int_part, frac_part)) = trimmed.split_once('.') {
        let digits = int_part.strip_prefix('-').unwrap_or(int_part);
        let int_is_numeric = !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit());
        let frac_is_numeric = frac_part.chars().all(|c| c.is_ascii_digit());
        if int_is_numeric && frac_is_numeric {
            return int_part.to_string();
        }
    }
    trimmed.to_string()
}

// ==========================================
// 功能代码 (Function Code)
// ==========================================
// 门店表 / 进度表 / 库存表 / 托盘表共享的列族键
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionCode(String);

impl FunctionCode {
    pub fn new(raw: &str) -> Self {
        Self(normalize_identifier(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 是否为纯数字代码
    pub fn is_numeric(&self) -> bool {
        !self.0.is_empty() && self.0.chars().all(|c| c.is_ascii_digit())
    }

    /// 拼接为展示文本（逗号分隔，保持顺序）
    pub fn join(codes: &[FunctionCode]) -> String {
        codes
            .iter()
            .map(FunctionCode::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// 从展示文本恢复功能代码列表（空片段丢弃）
    pub fn parse_list(text: &str) -> Vec<FunctionCode> {
        text.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(FunctionCode::new)
            .collect()
    }
}

impl fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FunctionCode {
    fn from(raw: &str) -> Self {
        FunctionCode::new(raw)
    }
}

// ==========================================
// 分配状态 (Assignment Status)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    Assigned,             // 已分配门店
    Unassigned,           // 无可用门店（可进入重分配）
    NoSupportedFunctions, // 功能代码全部不在门店表中（终态）
}

impl AssignmentStatus {
    /// 无门店时的哨兵展示文本
    pub fn sentinel_label(&self) -> Option<&'static str> {
        match self {
            AssignmentStatus::Assigned => None,
            AssignmentStatus::Unassigned => Some("NO_STORE_AVAILABLE"),
            AssignmentStatus::NoSupportedFunctions => {
                Some("NO_STORE_AVAILABLE (NO SUPPORTED FUNCTIONS)")
            }
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "ASSIGNED",
            AssignmentStatus::Unassigned => "UNASSIGNED",
            AssignmentStatus::NoSupportedFunctions => "NO_SUPPORTED_FUNCTIONS",
        }
    }

    pub fn from_db_str(value: &str) -> Option<Self> {
        match value.trim() {
            "ASSIGNED" => Some(AssignmentStatus::Assigned),
            "UNASSIGNED" => Some(AssignmentStatus::Unassigned),
            "NO_SUPPORTED_FUNCTIONS" => Some(AssignmentStatus::NoSupportedFunctions),
            _ => None,
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

// ==========================================
// 分配轮次 (Assignment Pass)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentPass {
    Direct,     // 第一轮: 一店一托
    Reassigned, // 第二轮: 容量上限内重分配
}

impl AssignmentPass {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AssignmentPass::Direct => "DIRECT",
            AssignmentPass::Reassigned => "REASSIGNED",
        }
    }

    pub fn from_db_str(value: &str) -> Option<Self> {
        match value.trim() {
            "DIRECT" => Some(AssignmentPass::Direct),
            "REASSIGNED" => Some(AssignmentPass::Reassigned),
            _ => None,
        }
    }
}

impl fmt::Display for AssignmentPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}
