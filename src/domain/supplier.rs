// ==========================================
// 供应商领域模型
// ==========================================
// 对齐: fournisseurs 表
// 自然键: nom（名称，唯一）
// ==========================================

use serde::{Deserialize, Serialize};

/// 首次遇到时创建的供应商，之后不再更新
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSupplier {
    #[serde(rename = "nom")]
    pub name: String,

    /// 由名称派生的短代码
    #[serde(rename = "code_fournisseur")]
    pub code: String,

    #[serde(rename = "actif")]
    pub active: bool,
}

impl NewSupplier {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            active: true,
        }
    }
}
