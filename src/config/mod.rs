// ==========================================
// 库存主数据导入工具 - 配置层
// ==========================================
// 职责: 导入参数（输入文件、存储后端、默认值、日志节奏）
// 来源: JSON 配置文件 + 命令行/环境变量覆写
// ==========================================

pub mod import_config;

// 重导出核心配置
pub use import_config::{ImportConfig, ImportDefaults, StoreConfig};
