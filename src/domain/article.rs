// ==========================================
// 物料领域模型
// ==========================================
// 对齐: articles 表
// 自然键: code_ean（条码，唯一）
// 用途: 导入层只创建,重复运行不更新
// ==========================================

use crate::domain::types::RecordId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArticle {
    // ===== 标识 =====
    #[serde(rename = "numero_article")]
    pub article_number: String,
    #[serde(rename = "code_ean")]
    pub barcode: String,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "conditionnement")]
    pub packaging_unit: String,

    // ===== 供应商关联 =====
    #[serde(rename = "fournisseur_id")]
    pub supplier_id: Option<RecordId>,
    #[serde(rename = "reference_fournisseur")]
    pub supplier_reference: Option<String>,

    // ===== 库存 =====
    #[serde(rename = "quantite_stock")]
    pub stock_quantity: i64,
    pub stock_minimum: i64,
    pub stock_maximum: i64,
    #[serde(rename = "point_commande")]
    pub reorder_point: i64,

    // ===== 价格（导入时为占位值）=====
    #[serde(rename = "prix_achat")]
    pub purchase_price: f64,
    #[serde(rename = "prix_vente")]
    pub sale_price: f64,
    #[serde(rename = "taux_tva")]
    pub tax_rate: f64,
}
