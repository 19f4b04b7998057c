// ==========================================
// 库存主数据导入工具 - 导入配置
// ==========================================
// 默认值对齐既有导入脚本:
// - 输入文件: ArticlesS30.csv / SerialNumberArticle.csv
// - 每 50 条创建输出一次进度
// - 序列号阶段只详细记录前 10 条错误
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_ARTICLES_PATH: &str = "ArticlesS30.csv";
pub const DEFAULT_SERIALS_PATH: &str = "SerialNumberArticle.csv";
pub const DEFAULT_PROGRESS_INTERVAL: usize = 50;
pub const DEFAULT_MAX_LOGGED_ERRORS: usize = 10;

// ==========================================
// ImportDefaults - 物料/序列号缺省字段
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportDefaults {
    pub stock_minimum: i64,
    pub stock_maximum: i64,
    pub reorder_point: i64,
    pub purchase_price: f64,
    pub sale_price: f64,
    pub tax_rate: f64,
    /// 包装单位为空时使用
    pub packaging_unit: String,
    /// 序列号库位为空时使用
    pub location: String,
}

impl Default for ImportDefaults {
    fn default() -> Self {
        Self {
            stock_minimum: 5,
            stock_maximum: 100,
            reorder_point: 10,
            purchase_price: 0.0,
            sale_price: 0.0,
            tax_rate: 21.0,
            packaging_unit: "Piece".to_string(),
            location: "Warehouse".to_string(),
        }
    }
}

// ==========================================
// StoreConfig - 存储后端选择
// ==========================================
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreConfig {
    /// PostgREST / Supabase
    Rest { url: String, api_key: String },
    /// 本地 SQLite 文件
    Sqlite { path: String },
}

// 密钥不进日志
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreConfig::Rest { url, api_key } => f
                .debug_struct("Rest")
                .field("url", url)
                .field("api_key", &if api_key.is_empty() { "EMPTY" } else { "***" })
                .finish(),
            StoreConfig::Sqlite { path } => f.debug_struct("Sqlite").field("path", path).finish(),
        }
    }
}

impl fmt::Display for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreConfig::Rest { url, .. } => write!(f, "{}", url),
            StoreConfig::Sqlite { path } => write!(f, "sqlite://{}", path),
        }
    }
}

// ==========================================
// ImportConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub articles_path: PathBuf,
    pub serials_path: PathBuf,
    pub store: Option<StoreConfig>,
    /// 每创建多少条输出一次进度
    pub progress_interval: usize,
    /// 序列号阶段详细记录的错误条数上限
    pub max_logged_errors: usize,
    pub defaults: ImportDefaults,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            articles_path: PathBuf::from(DEFAULT_ARTICLES_PATH),
            serials_path: PathBuf::from(DEFAULT_SERIALS_PATH),
            store: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            max_logged_errors: DEFAULT_MAX_LOGGED_ERRORS,
            defaults: ImportDefaults::default(),
        }
    }
}

impl ImportConfig {
    /// 从 JSON 文件读取配置（缺省字段取默认值）
    pub fn from_json_file(path: &Path) -> ImportResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ImportError::ConfigReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&raw).map_err(|e| ImportError::ConfigReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// 校验配置值
    pub fn validate(&self) -> ImportResult<()> {
        if self.progress_interval == 0 {
            return Err(value_error("progress_interval", "必须大于 0"));
        }

        let d = &self.defaults;
        if d.stock_minimum < 0 || d.stock_minimum > d.stock_maximum {
            return Err(value_error(
                "defaults.stock_minimum",
                format!("需满足 0 <= {} <= {}", d.stock_minimum, d.stock_maximum),
            ));
        }
        if d.packaging_unit.trim().is_empty() {
            return Err(value_error("defaults.packaging_unit", "不能为空"));
        }
        if d.location.trim().is_empty() {
            return Err(value_error("defaults.location", "不能为空"));
        }

        match &self.store {
            Some(StoreConfig::Rest { url, api_key }) => {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(value_error("store.url", format!("不是 HTTP 地址: {}", url)));
                }
                if api_key.trim().is_empty() {
                    return Err(value_error("store.api_key", "不能为空"));
                }
            }
            Some(StoreConfig::Sqlite { path }) => {
                if path.trim().is_empty() {
                    return Err(value_error("store.path", "不能为空"));
                }
            }
            None => {}
        }

        Ok(())
    }

    /// 输入文件存在性检查（任一缺失则在任何阶段之前中止）
    pub fn check_inputs(&self) -> ImportResult<()> {
        for path in [&self.articles_path, &self.serials_path] {
            if !path.exists() {
                return Err(ImportError::FileNotFound(path.display().to_string()));
            }
        }
        Ok(())
    }

    /// 已配置的存储后端
    pub fn store(&self) -> ImportResult<&StoreConfig> {
        self.store
            .as_ref()
            .ok_or_else(|| value_error("store", "未配置存储（需要 --store-url/--store-key 或 --sqlite）"))
    }
}

fn value_error(key: &str, message: impl Into<String>) -> ImportError {
    ImportError::ConfigValueError {
        key: key.to_string(),
        message: message.into(),
    }
}
