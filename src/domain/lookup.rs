// ==========================================
// 运行期查找表
// ==========================================
// 每次运行从零构建,不持久化
// 由所属阶段写入,之后只读,作为参数传给后续阶段
// ==========================================

use crate::domain::types::RecordId;
use std::collections::HashMap;

/// 供应商名称 → 记录标识
pub type SupplierMap = HashMap<String, RecordId>;

/// 技术员全名 → 记录标识
pub type TechnicianMap = HashMap<String, RecordId>;

/// 物料条码 → 记录标识
pub type ArticleMap = HashMap<String, RecordId>;
