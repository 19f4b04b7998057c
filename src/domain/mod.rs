// ==========================================
// 库存主数据导入工具 - 领域模型层
// ==========================================
// 职责: 定义写入存储的实体载荷与运行期查找表
// 红线: 不含数据访问逻辑,不含导入流程逻辑
// ==========================================

pub mod article;
pub mod lookup;
pub mod person;
pub mod serial_unit;
pub mod supplier;
pub mod types;

// 重导出核心类型
pub use article::NewArticle;
pub use lookup::{ArticleMap, SupplierMap, TechnicianMap};
pub use person::NewTechnician;
pub use serial_unit::NewSerialUnit;
pub use supplier::NewSupplier;
pub use types::{PersonType, RecordId, SerialStatus};
