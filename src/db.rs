// ==========================================
// 库存主数据导入工具 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键、busy_timeout）
// - 本地存储后端的建表语句与字段白名单放在一处维护
// ==========================================

use crate::repository::Collection;
use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 字段存储类型（用于 JSON ↔ SQLite 值转换）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Integer,
    Real,
    Bool,
}

/// 表字段定义
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn col(name: &'static str, kind: ColumnKind) -> Column {
    Column { name, kind }
}

const SUPPLIER_COLUMNS: &[Column] = &[
    col("id", ColumnKind::Text),
    col("nom", ColumnKind::Text),
    col("code_fournisseur", ColumnKind::Text),
    col("actif", ColumnKind::Bool),
    col("created_at", ColumnKind::Text),
];

const PERSON_COLUMNS: &[Column] = &[
    col("id", ColumnKind::Text),
    col("nom", ColumnKind::Text),
    col("prenom", ColumnKind::Text),
    col("type", ColumnKind::Text),
    col("numero_perid", ColumnKind::Text),
    col("erp_id", ColumnKind::Text),
    col("created_at", ColumnKind::Text),
];

const ARTICLE_COLUMNS: &[Column] = &[
    col("id", ColumnKind::Text),
    col("numero_article", ColumnKind::Text),
    col("code_ean", ColumnKind::Text),
    col("nom", ColumnKind::Text),
    col("conditionnement", ColumnKind::Text),
    col("fournisseur_id", ColumnKind::Text),
    col("reference_fournisseur", ColumnKind::Text),
    col("quantite_stock", ColumnKind::Integer),
    col("stock_minimum", ColumnKind::Integer),
    col("stock_maximum", ColumnKind::Integer),
    col("point_commande", ColumnKind::Integer),
    col("prix_achat", ColumnKind::Real),
    col("prix_vente", ColumnKind::Real),
    col("taux_tva", ColumnKind::Real),
    col("created_at", ColumnKind::Text),
];

const SERIAL_UNIT_COLUMNS: &[Column] = &[
    col("id", ColumnKind::Text),
    col("article_id", ColumnKind::Text),
    col("numero_serie", ColumnKind::Text),
    col("adresse_mac", ColumnKind::Text),
    col("localisation", ColumnKind::Text),
    col("statut", ColumnKind::Text),
    col("created_at", ColumnKind::Text),
];

/// 集合的全部字段（白名单，SQL 中只出现这里列出的字段名）
pub fn table_columns(collection: Collection) -> &'static [Column] {
    match collection {
        Collection::Suppliers => SUPPLIER_COLUMNS,
        Collection::Persons => PERSON_COLUMNS,
        Collection::Articles => ARTICLE_COLUMNS,
        Collection::SerialUnits => SERIAL_UNIT_COLUMNS,
    }
}

/// 本地存储 schema
///
/// 自然键上均有 UNIQUE 约束；序列号的物料外键必须可解析
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS fournisseurs (
    id TEXT PRIMARY KEY,
    nom TEXT NOT NULL UNIQUE,
    code_fournisseur TEXT,
    actif INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS personnes (
    id TEXT PRIMARY KEY,
    nom TEXT NOT NULL,
    prenom TEXT,
    type TEXT NOT NULL,
    numero_perid TEXT,
    erp_id TEXT,
    created_at TEXT NOT NULL,
    UNIQUE (nom, prenom, type)
);

CREATE TABLE IF NOT EXISTS articles (
    id TEXT PRIMARY KEY,
    numero_article TEXT NOT NULL,
    code_ean TEXT UNIQUE,
    nom TEXT NOT NULL,
    conditionnement TEXT,
    fournisseur_id TEXT REFERENCES fournisseurs(id),
    reference_fournisseur TEXT,
    quantite_stock INTEGER NOT NULL DEFAULT 0,
    stock_minimum INTEGER NOT NULL DEFAULT 0,
    stock_maximum INTEGER NOT NULL DEFAULT 0,
    point_commande INTEGER NOT NULL DEFAULT 0,
    prix_achat REAL NOT NULL DEFAULT 0,
    prix_vente REAL NOT NULL DEFAULT 0,
    taux_tva REAL NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS numeros_serie (
    id TEXT PRIMARY KEY,
    article_id TEXT NOT NULL REFERENCES articles(id),
    numero_serie TEXT NOT NULL UNIQUE,
    adresse_mac TEXT,
    localisation TEXT NOT NULL,
    statut TEXT NOT NULL,
    created_at TEXT NOT NULL
);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接、应用统一配置并确保表存在
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(conn)
}

/// 打开内存数据库（测试与演练用）
pub fn open_in_memory_connection() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(conn)
}
