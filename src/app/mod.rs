// ==========================================
// 库存主数据导入工具 - 应用层
// ==========================================
// 职责: 命令行参数 → 配置 → 存储 → 确认 → 流水线 → 汇总
// 退出: 仅流水线级错误（输入缺失/不可解析、配置错误）返回 Err
// ==========================================

use crate::config::{ImportConfig, StoreConfig};
use crate::importer::{ImportPipeline, ImportReport};
use crate::logging::LogFormat;
use crate::repository::{RecordStore, RestStore, SqliteStore};
use anyhow::Context;
use clap::Parser;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

// ==========================================
// Cli - 命令行参数
// ==========================================
#[derive(Debug, Parser)]
#[command(name = "stock-import")]
#[command(about = "Import suppliers, technicians, articles and serial numbers into the stock database")]
#[command(version)]
pub struct Cli {
    /// JSON configuration file (command-line flags take precedence)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Articles file (.csv/.xlsx/.xls)
    #[arg(long)]
    pub articles: Option<PathBuf>,

    /// Serial numbers file (.csv/.xlsx/.xls)
    #[arg(long)]
    pub serials: Option<PathBuf>,

    /// PostgREST / Supabase project URL
    #[arg(long, env = "SUPABASE_URL")]
    pub store_url: Option<String>,

    /// PostgREST / Supabase API key
    #[arg(long, env = "SUPABASE_KEY", hide_env_values = true)]
    pub store_key: Option<String>,

    /// Import into a local SQLite file instead of the remote store
    #[arg(long)]
    pub sqlite: Option<String>,

    /// Skip the interactive confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Write the run report as JSON to this path
    #[arg(long)]
    pub report_json: Option<PathBuf>,
}

impl Cli {
    pub fn log_format(&self) -> LogFormat {
        if self.json_logs {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }

    /// 合并配置文件与命令行参数,并校验
    pub fn build_config(&self) -> anyhow::Result<ImportConfig> {
        let mut config = match &self.config {
            Some(path) => ImportConfig::from_json_file(path)?,
            None => ImportConfig::default(),
        };

        if let Some(path) = &self.articles {
            config.articles_path = path.clone();
        }
        if let Some(path) = &self.serials {
            config.serials_path = path.clone();
        }

        if let Some(path) = &self.sqlite {
            config.store = Some(StoreConfig::Sqlite { path: path.clone() });
        } else if self.store_url.is_some() || self.store_key.is_some() {
            let (url, api_key) = match (&self.store_url, &self.store_key, &config.store) {
                (url, key, Some(StoreConfig::Rest { url: file_url, api_key: file_key })) => (
                    url.clone().unwrap_or_else(|| file_url.clone()),
                    key.clone().unwrap_or_else(|| file_key.clone()),
                ),
                (url, key, _) => (url.clone().unwrap_or_default(), key.clone().unwrap_or_default()),
            };
            config.store = Some(StoreConfig::Rest { url, api_key });
        }

        config.validate()?;
        Ok(config)
    }
}

/// 按配置打开存储后端
pub fn open_store(store: &StoreConfig) -> anyhow::Result<Box<dyn RecordStore>> {
    match store {
        StoreConfig::Rest { url, api_key } => {
            let store = RestStore::new(url, api_key).context("无法创建 REST 客户端")?;
            Ok(Box::new(store))
        }
        StoreConfig::Sqlite { path } => {
            let store = SqliteStore::new(path).with_context(|| format!("无法打开 SQLite 数据库: {}", path))?;
            Ok(Box::new(store))
        }
    }
}

/// 确认输入是否为肯定答复（oui/yes/o/y,不区分大小写）
pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "oui" | "yes" | "o" | "y"
    )
}

/// 打印运行概要并等待确认
pub fn confirm<R: BufRead, W: Write>(
    config: &ImportConfig,
    store: &StoreConfig,
    input: &mut R,
    output: &mut W,
) -> std::io::Result<bool> {
    writeln!(output, "==================================================")?;
    writeln!(output, "{} v{}", crate::APP_NAME, crate::VERSION)?;
    writeln!(output, "==================================================")?;
    writeln!(output, "目标存储: {}", store)?;
    writeln!(output, "物料文件: {}", config.articles_path.display())?;
    writeln!(output, "序列号文件: {}", config.serials_path.display())?;
    write!(output, "继续导入? (oui/yes): ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

/// 运行结果
#[derive(Debug)]
pub enum RunStatus {
    Completed(Box<ImportReport>),
    Cancelled,
}

/// 命令行主流程
pub async fn run(cli: Cli) -> anyhow::Result<RunStatus> {
    let config = cli.build_config()?;
    let store_config = config.store()?.clone();

    // 任一输入缺失则在确认与任何写入之前中止
    config.check_inputs()?;

    if !cli.yes {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        let confirmed = confirm(&config, &store_config, &mut stdin.lock(), &mut stdout.lock())?;
        if !confirmed {
            warn!("导入已取消");
            return Ok(RunStatus::Cancelled);
        }
    }

    info!(store = %store_config, "开始导入");
    let store = open_store(&store_config)?;
    let report = ImportPipeline::new(store.as_ref(), &config).run().await?;

    print_summary(&report, &mut std::io::stdout().lock())?;

    if let Some(path) = &cli.report_json {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json).with_context(|| format!("无法写入报告: {}", path.display()))?;
        info!(path = %path.display(), "运行报告已写入");
    }

    Ok(RunStatus::Completed(Box::new(report)))
}

/// 输出最终汇总
pub fn print_summary<W: Write>(report: &ImportReport, output: &mut W) -> std::io::Result<()> {
    writeln!(output, "==================================================")?;
    writeln!(output, "导入完成 ({} ms)", report.duration_ms)?;
    writeln!(output, "供应商: {} 个 ({})", report.supplier_map.len(), report.suppliers)?;
    writeln!(output, "技术员: {} 个 ({})", report.technician_map.len(), report.technicians)?;
    writeln!(output, "物料: {}", report.articles)?;
    writeln!(output, "序列号: {}", report.serial_numbers)?;
    writeln!(output, "==================================================")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["stock-import"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_is_affirmative() {
        for answer in ["oui", "OUI", "yes", "Y", "o", " y\n"] {
            assert!(is_affirmative(answer), "{answer:?}");
        }
        for answer in ["", "non", "no", "n", "yess"] {
            assert!(!is_affirmative(answer), "{answer:?}");
        }
    }

    #[test]
    fn test_confirm_reads_one_line() {
        let config = ImportConfig::default();
        let store = StoreConfig::Sqlite {
            path: "local.db".to_string(),
        };

        let mut output = Vec::new();
        let confirmed = confirm(&config, &store, &mut Cursor::new("oui\n"), &mut output).unwrap();
        assert!(confirmed);
        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("sqlite://local.db"));
        assert!(printed.contains("ArticlesS30.csv"));

        let mut output = Vec::new();
        assert!(!confirm(&config, &store, &mut Cursor::new("non\n"), &mut output).unwrap());
    }

    #[test]
    fn test_build_config_prefers_flags() {
        let cli = parse(&[
            "--articles",
            "a.csv",
            "--serials",
            "s.xlsx",
            "--sqlite",
            "local.db",
        ]);
        let config = cli.build_config().unwrap();

        assert_eq!(config.articles_path, PathBuf::from("a.csv"));
        assert_eq!(config.serials_path, PathBuf::from("s.xlsx"));
        assert_eq!(
            config.store,
            Some(StoreConfig::Sqlite {
                path: "local.db".to_string()
            })
        );
    }

    #[test]
    fn test_build_config_rest_store() {
        let cli = parse(&["--store-url", "https://x.supabase.co", "--store-key", "k"]);
        let config = cli.build_config().unwrap();
        assert_eq!(
            config.store,
            Some(StoreConfig::Rest {
                url: "https://x.supabase.co".to_string(),
                api_key: "k".to_string()
            })
        );
    }

    #[test]
    fn test_build_config_rejects_missing_key() {
        let cli = parse(&["--store-url", "https://x.supabase.co", "--store-key", ""]);
        assert!(cli.build_config().is_err());
    }

    #[tokio::test]
    async fn test_run_writes_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let articles = dir.path().join("articles.csv");
        let serials = dir.path().join("serials.csv");
        let report_path = dir.path().join("report.json");
        std::fs::write(
            &articles,
            "BARECODE WAREHOUSE,NAME_ARTICLE,SUPPLIER\n123,Widget,Acme\n456,Gadget,Acme\n",
        )
        .unwrap();
        std::fs::write(&serials, "BARECODE_WAREHOUSE,SERIAL_NUMBER_1\n123,SN-1\n").unwrap();

        let cli = Cli {
            config: None,
            articles: Some(articles),
            serials: Some(serials),
            store_url: None,
            store_key: None,
            sqlite: Some(dir.path().join("stock.db").display().to_string()),
            yes: true,
            json_logs: false,
            report_json: Some(report_path.clone()),
        };

        let status = run(cli).await.unwrap();
        assert!(matches!(status, RunStatus::Completed(_)));

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(written["articles"]["created"], 2);
        assert_eq!(written["suppliers"]["created"], 1);
        assert_eq!(written["serial_numbers"]["created"], 1);
        assert!(written["article_map"]["123"].is_string());
    }

    #[tokio::test]
    async fn test_run_without_store_fails() {
        let cli = Cli {
            config: None,
            articles: None,
            serials: None,
            store_url: None,
            store_key: None,
            sqlite: None,
            yes: true,
            json_logs: false,
            report_json: None,
        };
        assert!(run(cli).await.is_err());
    }
}
