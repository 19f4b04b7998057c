// ==========================================
// 人员（技术员）领域模型
// ==========================================
// 对齐: personnes 表
// 自然键: (nom, prenom, type)
// ==========================================

use crate::domain::types::PersonType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTechnician {
    #[serde(rename = "nom")]
    pub last_name: String,

    #[serde(rename = "prenom")]
    pub first_name: String,

    #[serde(rename = "type")]
    pub person_type: PersonType,

    /// 外部人事编号（PERID）
    #[serde(rename = "numero_perid")]
    pub personnel_id: Option<String>,

    /// ERP 员工编号（EMPLOYEE）
    #[serde(rename = "erp_id")]
    pub employee_id: Option<String>,
}
