// ==========================================
// 库存主数据导入工具 - 存储层
// ==========================================
// 红线: 存储层不含业务逻辑,只提供按等值查询与单条插入
// 约束: 所有查询使用参数化,防止注入
// ==========================================

pub mod error;
pub mod record_store;
pub mod rest_store;
pub mod sqlite_store;

// 重导出核心类型
pub use error::{RepositoryError, RepositoryResult};
pub use record_store::{insert_entity, record_id, to_record, Collection, Filter, Record, RecordStore};
pub use rest_store::RestStore;
pub use sqlite_store::SqliteStore;
