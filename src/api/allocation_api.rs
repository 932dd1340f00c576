// ==========================================
// 托盘门店分配系统 - 分配 API
// ==========================================
// 职责: 参数解析 → 导入 → 分配 → 持久化 / 导出 / 历史查询
// 红线: 参数非法时不产生任何结果，也不落库
// ==========================================

use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::config::{config_keys, AllocationConfigReader, AllocationParams, ConfigManager};
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::assignment::{AssignmentReport, AssignmentResult};
use crate::domain::dataset::AllocationDataset;
use crate::engine::AllocationOrchestrator;
use crate::export::ResultExporter;
use crate::importer::{DatasetImporter, DatasetImporterImpl, DatasetPaths};
use crate::repository::{AssignmentRunEntity, AssignmentRunRepository};

// ==========================================
// ParamOverrides - 参数覆盖（命令行 / 调用方）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamOverrides {
    pub history_weight: Option<u32>,
    pub alpha: Option<f64>,
    pub delivered_threshold: Option<f64>,
    pub reassign_multiplier: Option<f64>,
}

impl ParamOverrides {
    /// 在基础参数上叠加覆盖值（I1 覆盖时同步派生 I2）
    pub fn apply(&self, base: AllocationParams) -> AllocationParams {
        let mut params = base;
        if let Some(i1) = self.history_weight {
            params = params.with_history_weight(i1);
        }
        if let Some(alpha) = self.alpha {
            params = params.with_alpha(alpha);
        }
        if let Some(threshold) = self.delivered_threshold {
            params = params.with_delivered_threshold(threshold);
        }
        if let Some(multiplier) = self.reassign_multiplier {
            params = params.with_reassign_multiplier(multiplier);
        }
        params
    }
}

// ==========================================
// RunOutcome / RunDetail - 返回值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub run_id: Option<String>, // 未持久化时为 None
    pub params: AllocationParams,
    pub report: AssignmentReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunDetail {
    pub run: AssignmentRunEntity,
    pub results: Vec<AssignmentResult>,
}

// ==========================================
// AllocationApi - 分配 API
// ==========================================
pub struct AllocationApi<C>
where
    C: AllocationConfigReader,
{
    config: Arc<C>,
    run_repo: Arc<AssignmentRunRepository>,
    importer: DatasetImporterImpl,
    orchestrator: AllocationOrchestrator,
    exporter: ResultExporter,
}

impl AllocationApi<ConfigManager> {
    /// 打开数据库并组装 API（配置与运行记录共用同一连接）
    pub fn open(db_path: &str) -> ApiResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        ensure_schema(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        let conn = Arc::new(Mutex::new(conn));

        let config = Arc::new(ConfigManager::from_connection(conn.clone())?);
        let run_repo = Arc::new(AssignmentRunRepository::from_connection(conn));
        Ok(Self::new(config, run_repo))
    }

    /// 写入单个持久化参数
    pub fn set_param(&self, key: &str, value: &str) -> ApiResult<()> {
        self.config.set_param(key, value)?;
        info!(key, value, "配置已更新");
        Ok(())
    }

    /// 列出全部参数键及其持久化值（未设置时为 None）
    pub fn config_entries(&self) -> ApiResult<Vec<(&'static str, Option<String>)>> {
        let mut entries = Vec::with_capacity(config_keys::ALL.len());
        for key in config_keys::ALL {
            entries.push((key, self.config.get_global_config_value(key)?));
        }
        Ok(entries)
    }
}

impl<C> AllocationApi<C>
where
    C: AllocationConfigReader,
{
    /// 创建新的 AllocationApi 实例
    ///
    /// # 参数
    /// - config: 配置读取器
    /// - run_repo: 运行记录仓储
    pub fn new(config: Arc<C>, run_repo: Arc<AssignmentRunRepository>) -> Self {
        Self {
            config,
            run_repo,
            importer: DatasetImporterImpl::new(),
            orchestrator: AllocationOrchestrator::new(),
            exporter: ResultExporter,
        }
    }

    /// 解析本次运行参数: 持久化配置 + 覆盖值
    pub async fn resolve_params(&self, overrides: &ParamOverrides) -> ApiResult<AllocationParams> {
        let base = self.config.load_params().await?;
        Ok(overrides.apply(base))
    }

    /// 对内存表执行分配
    ///
    /// # 参数
    /// - persist: 是否保存运行记录
    #[instrument(skip(self, dataset, params), fields(pallet_count = dataset.pallets.len()))]
    pub fn run_from_tables(
        &self,
        dataset: &AllocationDataset,
        params: &AllocationParams,
        persist: bool,
    ) -> ApiResult<RunOutcome> {
        let report = self.orchestrator.execute(dataset, params)?;

        let run_id = if persist {
            Some(self.run_repo.save_run(&report, params)?)
        } else {
            None
        };

        Ok(RunOutcome {
            run_id,
            params: params.clone(),
            report,
        })
    }

    /// 读取四个文件并执行分配
    pub async fn run_from_files(
        &self,
        paths: &DatasetPaths,
        overrides: &ParamOverrides,
        persist: bool,
    ) -> ApiResult<RunOutcome> {
        let params = self.resolve_params(overrides).await?;
        // 参数先行校验，非法时不读文件
        params.validate()?;

        let dataset = self.importer.import_dataset(paths).await?;
        self.run_from_tables(&dataset, &params, persist)
    }

    /// 将报告写为 CSV
    pub fn export_report_csv(&self, report: &AssignmentReport, path: &Path) -> ApiResult<()> {
        self.exporter.export_to_path(report, path)?;
        Ok(())
    }

    /// 汇总统计 JSON
    pub fn summary_json(&self, report: &AssignmentReport) -> ApiResult<String> {
        Ok(self.exporter.summary_json(&report.summary)?)
    }

    /// 将已保存的运行导出为 CSV
    ///
    /// # 返回
    /// 导出的行数
    pub fn export_run_csv(&self, run_id: &str, path: &Path) -> ApiResult<usize> {
        let detail = self.get_run(run_id)?;
        let file = std::fs::File::create(path)
            .map_err(|e| ApiError::ExportError(format!("{}: {}", path.display(), e)))?;
        self.exporter.write_csv(&detail.results, file)?;

        info!(run_id, rows = detail.results.len(), path = %path.display(), "运行结果已导出");
        Ok(detail.results.len())
    }

    /// 查询运行详情
    pub fn get_run(&self, run_id: &str) -> ApiResult<RunDetail> {
        if run_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("run_id 不能为空".to_string()));
        }

        let run = self
            .run_repo
            .find_run(run_id)?
            .ok_or_else(|| ApiError::NotFound(format!("AssignmentRun(id={})不存在", run_id)))?;
        let results = self.run_repo.list_results(run_id)?;
        Ok(RunDetail { run, results })
    }

    /// 列出最近的运行
    pub fn list_runs(&self, limit: usize) -> ApiResult<Vec<AssignmentRunEntity>> {
        Ok(self.run_repo.list_runs(limit)?)
    }

    /// 删除运行记录
    pub fn delete_run(&self, run_id: &str) -> ApiResult<()> {
        Ok(self.run_repo.delete_run(run_id)?)
    }
}
