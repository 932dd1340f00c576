// ==========================================
// 托盘门店分配系统 - 命令行入口
// ==========================================
// 子命令:
//   run      读取四个输入文件, 执行分配, 输出汇总 / CSV
//   history  列出已保存的运行
//   config   查看 / 修改持久化参数
// ==========================================

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pallet_allocation::api::{AllocationApi, ParamOverrides, RunOutcome};
use pallet_allocation::db::{get_default_db_path, DB_PATH_ENV};
use pallet_allocation::importer::DatasetPaths;
use pallet_allocation::{logging, APP_NAME, VERSION};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pallet-allocation", version, about = "托盘门店分配系统")]
struct Cli {
    /// SQLite 数据库路径（配置与运行记录）
    #[arg(long, global = true, env = DB_PATH_ENV)]
    db: Option<PathBuf>,

    /// 以 JSON 行输出日志
    #[arg(long, global = true)]
    json_log: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 执行一次分配
    Run(RunArgs),
    /// 列出已保存的运行
    History {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// 查看或修改持久化参数
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// 显示当前参数
    Show,
    /// 设置单个参数
    Set { key: String, value: String },
}

#[derive(Debug, Args)]
struct RunArgs {
    /// 门店表（ST 表）
    #[arg(long)]
    stores: PathBuf,
    /// 进度表
    #[arg(long)]
    progress: PathBuf,
    /// 库存表
    #[arg(long)]
    stock: PathBuf,
    /// 托盘表
    #[arg(long)]
    pallets: PathBuf,

    /// I1 - 加权历史均值权重 (%)，I2 = 100 - I1
    #[arg(long)]
    i1: Option<u32>,
    /// 得分指数 alpha
    #[arg(long)]
    alpha: Option<f64>,
    /// 门店准入累计交付阈值
    #[arg(long)]
    threshold: Option<f64>,
    /// 重分配容量倍数
    #[arg(long)]
    multiplier: Option<f64>,

    /// 结果 CSV 输出路径
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// 汇总 JSON 输出路径
    #[arg(long)]
    summary_json: Option<PathBuf>,
    /// 不保存运行记录
    #[arg(long)]
    no_persist: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.json_log);

    tracing::info!(version = VERSION, "{}", APP_NAME);

    let db_path = cli
        .db
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(get_default_db_path);
    tracing::info!(db_path = %db_path, "使用数据库");

    let api = AllocationApi::open(&db_path).context("无法初始化分配 API")?;

    match cli.command {
        Command::Run(args) => run(&api, args).await,
        Command::History { limit } => history(&api, limit),
        Command::Config { action } => config(&api, action).await,
    }
}

async fn run(api: &AllocationApi<pallet_allocation::ConfigManager>, args: RunArgs) -> Result<()> {
    let paths = DatasetPaths {
        store_file: args.stores,
        progress_file: args.progress,
        stock_file: args.stock,
        pallet_file: args.pallets,
    };
    let overrides = ParamOverrides {
        history_weight: args.i1,
        alpha: args.alpha,
        delivered_threshold: args.threshold,
        reassign_multiplier: args.multiplier,
    };

    let outcome = api
        .run_from_files(&paths, &overrides, !args.no_persist)
        .await
        .context("分配执行失败")?;

    if let Some(output) = &args.output {
        api.export_report_csv(&outcome.report, output)
            .with_context(|| format!("无法写入 {}", output.display()))?;
        println!("结果已写入: {}", output.display());
    }
    if let Some(path) = &args.summary_json {
        let json = api.summary_json(&outcome.report)?;
        std::fs::write(path, json).with_context(|| format!("无法写入 {}", path.display()))?;
    }

    print_summary(&outcome);
    Ok(())
}

fn print_summary(outcome: &RunOutcome) {
    let summary = &outcome.report.summary;
    println!("==================================================");
    if let Some(run_id) = &outcome.run_id {
        println!("运行编号: {}", run_id);
    }
    println!("托盘总数: {}", summary.total);
    println!("已分配:   {}", summary.assigned);
    println!("未分配:   {}", summary.unassigned);
    println!("分配率:   {}", summary.assignment_rate_pct());
    if summary.reassigned > 0 {
        println!("其中重分配: {}", summary.reassigned);
    }
    if let Some(ceiling) = outcome.report.capacity_ceiling {
        println!("重分配容量上限: {:.2}", ceiling);
    }
    println!("==================================================");

    let unassigned: Vec<&str> = outcome
        .report
        .unassigned_results()
        .map(|r| r.pallet_id.as_str())
        .collect();
    if !unassigned.is_empty() {
        println!("警告: {} 个托盘未分配: {}", unassigned.len(), unassigned.join(", "));
    }
    for result in outcome.report.unsupported_results() {
        println!(
            "警告: 托盘 {} 的功能代码 [{}] 在门店表中不存在",
            result.pallet_id,
            result.function_codes_text()
        );
    }
}

async fn config(api: &AllocationApi<pallet_allocation::ConfigManager>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Set { key, value } => {
            api.set_param(&key, &value)
                .with_context(|| format!("无法设置 {}", key))?;
            println!("{} = {}", key, value);
        }
        ConfigAction::Show => {
            for (key, stored) in api.config_entries()? {
                println!("{:<22} {}", key, stored.as_deref().unwrap_or("(默认)"));
            }
            let params = api.resolve_params(&ParamOverrides::default()).await?;
            println!(
                "生效参数: I1={} I2={} alpha={} 阈值={} 倍数={}",
                params.history_weight,
                params.progress_weight,
                params.alpha,
                params.delivered_threshold,
                params.reassign_multiplier
            );
        }
    }
    Ok(())
}

fn history(api: &AllocationApi<pallet_allocation::ConfigManager>, limit: usize) -> Result<()> {
    let runs = api.list_runs(limit).context("查询运行记录失败")?;
    if runs.is_empty() {
        println!("暂无运行记录");
        return Ok(());
    }

    for run in runs {
        println!(
            "{}  {}  总数={} 已分配={} 未分配={} 分配率={}  I1={} alpha={} 阈值={} 倍数={}",
            run.run_id,
            run.created_at.format("%Y-%m-%d %H:%M:%S"),
            run.summary.total,
            run.summary.assigned,
            run.summary.unassigned,
            run.summary.assignment_rate_pct(),
            run.params.history_weight,
            run.params.alpha,
            run.params.delivered_threshold,
            run.params.reassign_multiplier,
        );
    }
    Ok(())
}
