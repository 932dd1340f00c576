// ==========================================
// 托盘门店分配系统 - 分配结果领域模型
// ==========================================
// 红线: 每个输入托盘恰好一行结果，保持输入顺序
// 红线: 无可用门店是业务结果（哨兵状态），不是错误
// ==========================================

use crate::domain::pallet::Pallet;
use crate::domain::types::{AssignmentPass, AssignmentStatus, FunctionCode};
use serde::{Deserialize, Serialize};

// ==========================================
// ScoreBreakdown - 评分分解
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub score: f64,              // 期望度得分 P
    pub stock_share: f64,        // 库存占比 ps
    pub combined_average: f64,   // 综合均值 C
    pub historical_average: f64, // 加权历史均值 WHA
    pub progress_average: f64,   // 进度均值 PA
}

// ==========================================
// AssignmentResult - 单托盘分配结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentResult {
    pub pallet_id: String,
    pub status: AssignmentStatus,
    pub assigned_store: Option<String>,
    pub pass: Option<AssignmentPass>,
    pub score: f64,
    pub stock_share: f64,
    pub combined_average: f64,
    pub historical_average: f64,
    pub progress_average: f64,
    pub function_codes: Vec<FunctionCode>,
    pub pallet_value: f64,
}

impl AssignmentResult {
    /// 已分配记录
    pub fn assigned(
        pallet: &Pallet,
        store_name: &str,
        breakdown: ScoreBreakdown,
        function_codes: Vec<FunctionCode>,
        pass: AssignmentPass,
    ) -> Self {
        let mut result = Self::sentinel(pallet, AssignmentStatus::Assigned, function_codes);
        result.apply_assignment(store_name, breakdown, pass);
        result
    }

    /// 无可用门店记录（可进入重分配）
    pub fn unassigned(pallet: &Pallet, function_codes: Vec<FunctionCode>) -> Self {
        Self::sentinel(pallet, AssignmentStatus::Unassigned, function_codes)
    }

    /// 功能代码全部不受支持记录（终态）
    pub fn no_supported_functions(pallet: &Pallet, unsupported: Vec<FunctionCode>) -> Self {
        Self::sentinel(pallet, AssignmentStatus::NoSupportedFunctions, unsupported)
    }

    fn sentinel(
        pallet: &Pallet,
        status: AssignmentStatus,
        function_codes: Vec<FunctionCode>,
    ) -> Self {
        Self {
            pallet_id: pallet.pallet_id.clone(),
            status,
            assigned_store: None,
            pass: None,
            score: 0.0,
            stock_share: 0.0,
            combined_average: 0.0,
            historical_average: 0.0,
            progress_average: 0.0,
            function_codes,
            pallet_value: pallet.total_value(),
        }
    }

    /// 原地覆写门店与评分（功能列表与托盘价值不变）
    pub fn apply_assignment(
        &mut self,
        store_name: &str,
        breakdown: ScoreBreakdown,
        pass: AssignmentPass,
    ) {
        self.status = AssignmentStatus::Assigned;
        self.assigned_store = Some(store_name.to_string());
        self.pass = Some(pass);
        self.score = breakdown.score;
        self.stock_share = breakdown.stock_share;
        self.combined_average = breakdown.combined_average;
        self.historical_average = breakdown.historical_average;
        self.progress_average = breakdown.progress_average;
    }

    pub fn is_assigned(&self) -> bool {
        self.status == AssignmentStatus::Assigned
    }

    /// 门店展示文本（未分配时为哨兵文本）
    pub fn display_store(&self) -> String {
        match (&self.assigned_store, self.status.sentinel_label()) {
            (Some(store), _) => store.clone(),
            (None, Some(label)) => label.to_string(),
            (None, None) => String::new(),
        }
    }

    pub fn function_codes_text(&self) -> String {
        FunctionCode::join(&self.function_codes)
    }
}

// ==========================================
// AssignmentSummary - 汇总统计
// ==========================================
// assigned = total - unassigned（功能不受支持的托盘不计入 unassigned）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AssignmentSummary {
    pub total: usize,
    pub assigned: usize,
    pub unassigned: usize,
    pub no_supported_functions: usize,
    pub reassigned: usize,
    pub assignment_rate: f64, // (total - unassigned) / total, 0~1
}

impl AssignmentSummary {
    pub fn from_results(results: &[AssignmentResult]) -> Self {
        let total = results.len();
        let unassigned = results
            .iter()
            .filter(|r| r.status == AssignmentStatus::Unassigned)
            .count();
        let no_supported_functions = results
            .iter()
            .filter(|r| r.status == AssignmentStatus::NoSupportedFunctions)
            .count();
        let reassigned = results
            .iter()
            .filter(|r| r.pass == Some(AssignmentPass::Reassigned))
            .count();
        let assigned = total - unassigned;
        let assignment_rate = if total > 0 {
            assigned as f64 / total as f64
        } else {
            0.0
        };

        Self {
            total,
            assigned,
            unassigned,
            no_supported_functions,
            reassigned,
            assignment_rate,
        }
    }

    /// 分配率百分比（一位小数）
    pub fn assignment_rate_pct(&self) -> String {
        format!("{:.1}%", self.assignment_rate * 100.0)
    }
}

// ==========================================
// StoreLoad - 门店累计分配价值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreLoad {
    pub store_name: String,
    pub assigned_value: f64,
    pub pallet_count: usize,
}

// ==========================================
// AssignmentReport - 单次运行输出
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentReport {
    pub results: Vec<AssignmentResult>,
    pub summary: AssignmentSummary,
    pub eligible_store_count: usize,
    pub capacity_ceiling: Option<f64>, // 仅在触发重分配时存在
    pub store_loads: Vec<StoreLoad>,   // 合格门店顺序
}

impl AssignmentReport {
    /// 仍未分配的托盘
    pub fn unassigned_results(&self) -> impl Iterator<Item = &AssignmentResult> {
        self.results
            .iter()
            .filter(|r| r.status == AssignmentStatus::Unassigned)
    }

    /// 功能全部不受支持的托盘
    pub fn unsupported_results(&self) -> impl Iterator<Item = &AssignmentResult> {
        self.results
            .iter()
            .filter(|r| r.status == AssignmentStatus::NoSupportedFunctions)
    }
}
