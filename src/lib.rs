// ==========================================
// 库存主数据导入工具 - 核心库
// ==========================================
// 流程: 供应商 → 技术员 → 物料 → 序列号（四阶段对账导入）
// 存储: PostgREST 远程存储 / SQLite 本地存储
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 存储层 - 记录存储契约与后端实现
pub mod repository;

// 导入层 - 文件解析与四阶段流水线
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// SQLite 连接初始化与建表
pub mod db;

// 日志系统
pub mod logging;

// 应用层 - 命令行入口逻辑
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use config::{ImportConfig, ImportDefaults, StoreConfig};
pub use domain::{ArticleMap, RecordId, SupplierMap, TechnicianMap};
pub use importer::{ImportError, ImportPipeline, ImportReport, ImportResult, StageStats};
pub use repository::{Collection, RecordStore, RepositoryError, RestStore, SqliteStore};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "库存主数据导入工具";
