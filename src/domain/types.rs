// ==========================================
// 库存主数据导入工具 - 领域类型定义
// ==========================================
// 序列化格式: 与远程存储中的取值一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 存储生成的记录标识（远程存储为 UUID 字符串）
pub type RecordId = String;

// ==========================================
// 人员类型 (Person Type)
// ==========================================
// personnes 表在多种人员之间共享，按 type 区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonType {
    #[serde(rename = "technicien")]
    Technician,
}

impl PersonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonType::Technician => "technicien",
        }
    }
}

impl fmt::Display for PersonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 序列号状态 (Serial Status)
// ==========================================
// 导入时固定为可用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SerialStatus {
    #[serde(rename = "disponible")]
    Available,
}

impl SerialStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SerialStatus::Available => "disponible",
        }
    }
}

impl fmt::Display for SerialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
