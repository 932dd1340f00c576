// ==========================================
// 托盘门店分配系统 - 分配运行仓储
// ==========================================
// 表: assignment_run（运行头） / assignment_result（逐托盘结果）
// 红线: Repository 不含业务逻辑
// 红线: 运行头与结果行同一事务写入
// ==========================================

use crate::config::AllocationParams;
use crate::domain::assignment::{AssignmentReport, AssignmentResult, AssignmentSummary};
use crate::domain::types::{AssignmentPass, AssignmentStatus, FunctionCode};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;
use uuid::Uuid;

// ==========================================
// AssignmentRunEntity - 运行头
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRunEntity {
    pub run_id: String,
    pub created_at: DateTime<Utc>,
    pub params: AllocationParams,
    pub summary: AssignmentSummary,
    pub eligible_store_count: usize,
    pub capacity_ceiling: Option<f64>,
}

/// assignment_result 原始行（状态枚举在取出后再转换）
struct ResultRow {
    pallet_id: String,
    status: String,
    assigned_store: Option<String>,
    pass: Option<String>,
    score: f64,
    stock_share: f64,
    combined_average: f64,
    historical_average: f64,
    progress_average: f64,
    function_codes: String,
    pallet_value: f64,
}

impl ResultRow {
    fn into_result(self) -> RepositoryResult<AssignmentResult> {
        let status = AssignmentStatus::from_db_str(&self.status).ok_or_else(|| {
            RepositoryError::FieldValueError {
                field: "status".to_string(),
                message: format!("未知状态: {}", self.status),
            }
        })?;
        let pass = match self.pass {
            Some(raw) => Some(AssignmentPass::from_db_str(&raw).ok_or_else(|| {
                RepositoryError::FieldValueError {
                    field: "pass".to_string(),
                    message: format!("未知轮次: {}", raw),
                }
            })?),
            None => None,
        };

        Ok(AssignmentResult {
            pallet_id: self.pallet_id,
            status,
            assigned_store: self.assigned_store,
            pass,
            score: self.score,
            stock_share: self.stock_share,
            combined_average: self.combined_average,
            historical_average: self.historical_average,
            progress_average: self.progress_average,
            function_codes: FunctionCode::parse_list(&self.function_codes),
            pallet_value: self.pallet_value,
        })
    }
}

// ==========================================
// AssignmentRunRepository - 分配运行仓储
// ==========================================
pub struct AssignmentRunRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AssignmentRunRepository {
    /// 从已有连接创建仓储实例（调用方负责 ensure_schema）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 保存一次运行（运行头 + 全部结果行）
    ///
    /// # 返回
    /// 新生成的 run_id
    pub fn save_run(
        &self,
        report: &AssignmentReport,
        params: &AllocationParams,
    ) -> RepositoryResult<String> {
        let run_id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let params_json = serde_json::to_string(params)?;
        let summary = &report.summary;

        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO assignment_run (
                run_id, created_at, params_json,
                total, assigned, unassigned, no_supported_functions, reassigned,
                assignment_rate, eligible_store_count, capacity_ceiling
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                run_id,
                created_at,
                params_json,
                summary.total as i64,
                summary.assigned as i64,
                summary.unassigned as i64,
                summary.no_supported_functions as i64,
                summary.reassigned as i64,
                summary.assignment_rate,
                report.eligible_store_count as i64,
                report.capacity_ceiling,
            ],
        )?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO assignment_result (
                    run_id, seq_no, pallet_id, status, assigned_store, pass,
                    score, stock_share, combined_average, historical_average, progress_average,
                    function_codes, pallet_value
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
            )?;
            for (seq_no, result) in report.results.iter().enumerate() {
                stmt.execute(params![
                    run_id,
                    seq_no as i64,
                    result.pallet_id,
                    result.status.to_db_str(),
                    result.assigned_store,
                    result.pass.map(|p| p.to_db_str()),
                    result.score,
                    result.stock_share,
                    result.combined_average,
                    result.historical_average,
                    result.progress_average,
                    result.function_codes_text(),
                    result.pallet_value,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        info!(run_id = %run_id, rows = report.results.len(), "分配运行已保存");
        Ok(run_id)
    }

    /// 按 run_id 查询运行头
    pub fn find_run(&self, run_id: &str) -> RepositoryResult<Option<AssignmentRunEntity>> {
        let conn = self.get_conn()?;
        let raw = conn
            .query_row(
                &format!("{} WHERE run_id = ?1", SELECT_RUN_SQL),
                params![run_id],
                map_run_row,
            )
            .optional()?;

        raw.map(RawRun::into_entity).transpose()
    }

    /// 列出最近的运行（创建时间倒序）
    pub fn list_runs(&self, limit: usize) -> RepositoryResult<Vec<AssignmentRunEntity>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} ORDER BY created_at DESC, run_id ASC LIMIT ?1",
            SELECT_RUN_SQL
        ))?;

        let raws = stmt
            .query_map(params![limit as i64], map_run_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        raws.into_iter().map(RawRun::into_entity).collect()
    }

    /// 按输入顺序取回运行的全部结果行
    pub fn list_results(&self, run_id: &str) -> RepositoryResult<Vec<AssignmentResult>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                pallet_id, status, assigned_store, pass,
                score, stock_share, combined_average, historical_average, progress_average,
                function_codes, pallet_value
            FROM assignment_result
            WHERE run_id = ?1
            ORDER BY seq_no ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![run_id], |row| {
                Ok(ResultRow {
                    pallet_id: row.get(0)?,
                    status: row.get(1)?,
                    assigned_store: row.get(2)?,
                    pass: row.get(3)?,
                    score: row.get(4)?,
                    stock_share: row.get(5)?,
                    combined_average: row.get(6)?,
                    historical_average: row.get(7)?,
                    progress_average: row.get(8)?,
                    function_codes: row.get(9)?,
                    pallet_value: row.get(10)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        rows.into_iter().map(ResultRow::into_result).collect()
    }

    /// 删除运行（结果行级联删除）
    pub fn delete_run(&self, run_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM assignment_run WHERE run_id = ?1",
            params![run_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "AssignmentRun".to_string(),
                id: run_id.to_string(),
            });
        }
        Ok(())
    }
}

const SELECT_RUN_SQL: &str = r#"
    SELECT
        run_id, created_at, params_json,
        total, assigned, unassigned, no_supported_functions, reassigned,
        assignment_rate, eligible_store_count, capacity_ceiling
    FROM assignment_run
"#;

/// assignment_run 原始行
struct RawRun {
    run_id: String,
    created_at: DateTime<Utc>,
    params_json: String,
    counts: [i64; 5],
    assignment_rate: f64,
    eligible_store_count: i64,
    capacity_ceiling: Option<f64>,
}

impl RawRun {
    fn into_entity(self) -> RepositoryResult<AssignmentRunEntity> {
        let params: AllocationParams = serde_json::from_str(&self.params_json)?;
        let [total, assigned, unassigned, no_supported_functions, reassigned] =
            self.counts.map(|v| v.max(0) as usize);

        Ok(AssignmentRunEntity {
            run_id: self.run_id,
            created_at: self.created_at,
            params,
            summary: AssignmentSummary {
                total,
                assigned,
                unassigned,
                no_supported_functions,
                reassigned,
                assignment_rate: self.assignment_rate,
            },
            eligible_store_count: self.eligible_store_count.max(0) as usize,
            capacity_ceiling: self.capacity_ceiling,
        })
    }
}

fn map_run_row(row: &rusqlite::Row<'_>) -> SqliteResult<RawRun> {
    Ok(RawRun {
        run_id: row.get(0)?,
        created_at: row.get(1)?,
        params_json: row.get(2)?,
        counts: [row.get(3)?, row.get(4)?, row.get(5)?, row.get(6)?, row.get(7)?],
        assignment_rate: row.get(8)?,
        eligible_store_count: row.get(9)?,
        capacity_ceiling: row.get(10)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, ensure_schema};
    use crate::domain::assignment::ScoreBreakdown;
    use crate::domain::pallet::Pallet;

    fn repo() -> AssignmentRunRepository {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        AssignmentRunRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn report() -> AssignmentReport {
        let p1 = Pallet::new("1", vec![(FunctionCode::new("10"), 2.0)]);
        let p2 = Pallet::new("2", vec![(FunctionCode::new("ABC"), 1.0)]);
        let results = vec![
            AssignmentResult::assigned(
                &p1,
                "MILANO",
                ScoreBreakdown {
                    score: 0.42,
                    ..ScoreBreakdown::default()
                },
                p1.function_set(),
                AssignmentPass::Reassigned,
            ),
            AssignmentResult::no_supported_functions(&p2, p2.function_set()),
        ];
        AssignmentReport {
            summary: AssignmentSummary::from_results(&results),
            results,
            eligible_store_count: 3,
            capacity_ceiling: Some(10.0),
            store_loads: vec![],
        }
    }

    #[test]
    fn test_save_and_reload_run() {
        let repo = repo();
        let report = report();
        let params = AllocationParams::default();

        let run_id = repo.save_run(&report, &params).unwrap();

        let run = repo.find_run(&run_id).unwrap().unwrap();
        assert_eq!(run.params, params);
        assert_eq!(run.summary, report.summary);
        assert_eq!(run.eligible_store_count, 3);
        assert_eq!(run.capacity_ceiling, Some(10.0));

        let results = repo.list_results(&run_id).unwrap();
        assert_eq!(results, report.results);
    }

    #[test]
    fn test_list_and_delete() {
        let repo = repo();
        let first = repo.save_run(&report(), &AllocationParams::default()).unwrap();
        let _second = repo.save_run(&report(), &AllocationParams::default()).unwrap();

        assert_eq!(repo.list_runs(10).unwrap().len(), 2);
        assert_eq!(repo.list_runs(1).unwrap().len(), 1);

        repo.delete_run(&first).unwrap();
        assert!(repo.find_run(&first).unwrap().is_none());
        assert!(repo.list_results(&first).unwrap().is_empty());
        assert!(matches!(
            repo.delete_run(&first),
            Err(RepositoryError::NotFound { .. })
        ));
    }
}
