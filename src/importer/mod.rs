// ==========================================
// 库存主数据导入工具 - 导入层
// ==========================================
// 职责: 读取物料/序列号文件,按四个阶段对账写入存储
// 支持: CSV, Excel
// ==========================================

// 模块声明
pub mod article_importer;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod outcome;
pub mod pipeline;
pub mod serial_importer;
pub mod supplier_resolver;
pub mod technician_resolver;

// 重导出核心类型
pub use article_importer::ArticleImporter;
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{ArticleRow, FieldMapper, SerialRow};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow, UniversalFileParser};
pub use outcome::{RowOutcome, SkipReason, StageStats};
pub use pipeline::{ImportPipeline, ImportReport};
pub use serial_importer::SerialNumberImporter;
pub use supplier_resolver::SupplierResolver;
pub use technician_resolver::{TechnicianEntry, TechnicianResolver};
