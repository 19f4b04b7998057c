// ==========================================
// 库存主数据导入工具 - 命令行入口
// ==========================================

use clap::Parser;
use stock_import::app::{self, Cli, RunStatus};
use stock_import::logging;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_format());

    tracing::info!("{} v{}", stock_import::APP_NAME, stock_import::VERSION);

    match app::run(cli).await {
        Ok(RunStatus::Completed(report)) => {
            tracing::info!(created = report.total_created(), errors = report.total_errors(), "导入结束");
            ExitCode::SUCCESS
        }
        Ok(RunStatus::Cancelled) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(severity = "critical", error = %format!("{:#}", e), "导入中止");
            ExitCode::FAILURE
        }
    }
}
