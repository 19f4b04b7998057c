// ==========================================
// 序列号领域模型
// ==========================================
// 对齐: numeros_serie 表
// 自然键: numero_serie（唯一）
// 外键: article_id → articles.id（必须可解析,否则拒绝该行）
// ==========================================

use crate::domain::types::{RecordId, SerialStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSerialUnit {
    pub article_id: RecordId,
    #[serde(rename = "numero_serie")]
    pub serial_number: String,
    #[serde(rename = "adresse_mac")]
    pub mac_address: Option<String>,
    #[serde(rename = "localisation")]
    pub location: String,
    #[serde(rename = "statut")]
    pub status: SerialStatus,
}
