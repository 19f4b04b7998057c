// ==========================================
// 库存主数据导入工具 - SQLite 记录存储
// ==========================================
// 职责: 用本地 SQLite 文件实现 RecordStore 契约
// 用途: 本地演练导入、集成测试
// 约束: 所有查询使用参数化,字段名只来自 db::table_columns 白名单
// ==========================================

use crate::db::{open_in_memory_connection, open_sqlite_connection, table_columns, Column, ColumnKind};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::record_store::{Collection, Filter, Record, RecordStore};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

// ==========================================
// SqliteStore
// ==========================================
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// 打开（必要时创建）数据库文件
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 创建内存数据库存储
    pub fn in_memory() -> RepositoryResult<Self> {
        let conn = open_in_memory_connection()
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 统计集合中的记录数
    pub fn count(&self, collection: Collection) -> RepositoryResult<i64> {
        let conn = self.lock()?;
        let sql = format!("SELECT COUNT(*) FROM {}", collection.table_name());
        Ok(conn.query_row(&sql, [], |row| row.get(0))?)
    }

    fn select_sync(
        &self,
        collection: Collection,
        filters: &[Filter<'_>],
    ) -> RepositoryResult<Vec<Record>> {
        let columns = table_columns(collection);

        let mut clauses = Vec::with_capacity(filters.len());
        let mut params = Vec::with_capacity(filters.len());
        for (name, value) in filters {
            let column = find_column(collection, name)?;
            if value.is_null() {
                clauses.push(format!("{} IS NULL", column.name));
            } else {
                params.push(to_sql_value(column, value)?);
                clauses.push(format!("{} = ?{}", column.name, params.len()));
            }
        }

        let mut sql = format!(
            "SELECT {} FROM {}",
            column_list(columns),
            collection.table_name()
        );
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY rowid");

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
            let mut record = Record::new();
            for (idx, column) in columns.iter().enumerate() {
                record.insert(column.name.to_string(), from_sql_value(column, row.get_ref(idx)?));
            }
            Ok(record)
        })?;

        let records = rows.collect::<Result<Vec<_>, _>>()?;
        debug!(collection = %collection, matched = records.len(), "SQLite 查询完成");
        Ok(records)
    }

    fn insert_sync(&self, collection: Collection, record: Record) -> RepositoryResult<Record> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now().to_rfc3339();

        let mut names = vec!["id", "created_at"];
        let mut params = vec![SqlValue::Text(id.clone()), SqlValue::Text(created_at)];
        for (name, value) in &record {
            let column = find_column(collection, name)?;
            if column.name == "id" || column.name == "created_at" {
                return Err(RepositoryError::FieldValueError {
                    field: column.name.to_string(),
                    message: "由存储生成,不可指定".to_string(),
                });
            }
            names.push(column.name);
            params.push(to_sql_value(column, value)?);
        }

        let placeholders: Vec<String> = (1..=params.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            collection.table_name(),
            names.join(", "),
            placeholders.join(", ")
        );

        let conn = self.lock()?;
        conn.execute(&sql, params_from_iter(params.iter()))?;

        let columns = table_columns(collection);
        let select = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            column_list(columns),
            collection.table_name()
        );
        let created = conn
            .query_row(&select, [&id], |row| {
                let mut created = Record::new();
                for (idx, column) in columns.iter().enumerate() {
                    created.insert(column.name.to_string(), from_sql_value(column, row.get_ref(idx)?));
                }
                Ok(created)
            })
            .optional()?;

        created.ok_or_else(|| {
            RepositoryError::InternalError(format!("插入后无法读回记录 ({}, id={})", collection, id))
        })
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn select_eq(
        &self,
        collection: Collection,
        filters: &[Filter<'_>],
    ) -> RepositoryResult<Vec<Record>> {
        self.select_sync(collection, filters)
    }

    async fn insert_one(&self, collection: Collection, record: Record) -> RepositoryResult<Record> {
        self.insert_sync(collection, record)
    }
}

// ==========================================
// 值转换
// ==========================================

fn column_list(columns: &[Column]) -> String {
    columns.iter().map(|c| c.name).collect::<Vec<_>>().join(", ")
}

fn find_column(collection: Collection, name: &str) -> RepositoryResult<&'static Column> {
    table_columns(collection)
        .iter()
        .find(|c| c.name == name)
        .ok_or_else(|| RepositoryError::UnknownColumn {
            collection: collection.to_string(),
            column: name.to_string(),
        })
}

fn value_error(column: &Column, value: &Value) -> RepositoryError {
    RepositoryError::FieldValueError {
        field: column.name.to_string(),
        message: format!("类型不匹配 ({:?}): {}", column.kind, value),
    }
}

fn to_sql_value(column: &Column, value: &Value) -> RepositoryResult<SqlValue> {
    if value.is_null() {
        return Ok(SqlValue::Null);
    }

    match (column.kind, value) {
        (ColumnKind::Text, Value::String(s)) => Ok(SqlValue::Text(s.clone())),
        (ColumnKind::Integer, Value::Number(n)) => match n.as_i64() {
            Some(i) => Ok(SqlValue::Integer(i)),
            None => match n.as_f64() {
                Some(f) if f.fract() == 0.0 => Ok(SqlValue::Integer(f as i64)),
                _ => Err(value_error(column, value)),
            },
        },
        (ColumnKind::Real, Value::Number(n)) => n
            .as_f64()
            .map(SqlValue::Real)
            .ok_or_else(|| value_error(column, value)),
        (ColumnKind::Bool, Value::Bool(b)) => Ok(SqlValue::Integer(i64::from(*b))),
        _ => Err(value_error(column, value)),
    }
}

fn from_sql_value(column: &Column, value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) if column.kind == ColumnKind::Bool => Value::Bool(i != 0),
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(_) => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn supplier(name: &str) -> Record {
        let mut record = Record::new();
        record.insert("nom".to_string(), json!(name));
        record.insert("code_fournisseur".to_string(), json!(name.to_uppercase()));
        record.insert("actif".to_string(), json!(true));
        record
    }

    #[tokio::test]
    async fn test_insert_returns_generated_id() {
        let store = SqliteStore::in_memory().unwrap();
        let created = store
            .insert_one(Collection::Suppliers, supplier("Acme"))
            .await
            .unwrap();

        assert!(created.get("id").and_then(|v| v.as_str()).is_some());
        assert_eq!(created.get("nom"), Some(&json!("Acme")));
        assert_eq!(created.get("actif"), Some(&json!(true)));
        assert_eq!(store.count(Collection::Suppliers).unwrap(), 1);
    }

    #[tokio::test]
    async fn test_select_eq_matches_all_filters() {
        let store = SqliteStore::in_memory().unwrap();
        store.insert_one(Collection::Suppliers, supplier("Acme")).await.unwrap();
        store.insert_one(Collection::Suppliers, supplier("Globex")).await.unwrap();

        let found = store
            .select_eq(Collection::Suppliers, &[("nom", json!("Globex"))])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get("code_fournisseur"), Some(&json!("GLOBEX")));

        let none = store
            .select_eq(
                Collection::Suppliers,
                &[("nom", json!("Globex")), ("actif", json!(false))],
            )
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_unique_natural_key_is_enforced() {
        let store = SqliteStore::in_memory().unwrap();
        store.insert_one(Collection::Suppliers, supplier("Acme")).await.unwrap();

        let err = store
            .insert_one(Collection::Suppliers, supplier("Acme"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_unknown_column_is_rejected() {
        let store = SqliteStore::in_memory().unwrap();

        let err = store
            .select_eq(Collection::Suppliers, &[("nom; DROP TABLE x", json!("a"))])
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::UnknownColumn { .. }));

        let mut record = supplier("Acme");
        record.insert("id".to_string(), json!("forced"));
        assert!(store.insert_one(Collection::Suppliers, record).await.is_err());
    }

    #[tokio::test]
    async fn test_serial_unit_requires_existing_article() {
        let store = SqliteStore::in_memory().unwrap();

        let mut record = Record::new();
        record.insert("article_id".to_string(), json!("missing"));
        record.insert("numero_serie".to_string(), json!("SN-1"));
        record.insert("localisation".to_string(), json!("Warehouse"));
        record.insert("statut".to_string(), json!("disponible"));

        let err = store
            .insert_one(Collection::SerialUnits, record)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
    }

    #[tokio::test]
    async fn test_null_filter_uses_is_null() {
        let store = SqliteStore::in_memory().unwrap();

        let mut record = Record::new();
        record.insert("nom".to_string(), json!("Doe"));
        record.insert("prenom".to_string(), json!("Jane"));
        record.insert("type".to_string(), json!("technicien"));
        record.insert("numero_perid".to_string(), Value::Null);
        store.insert_one(Collection::Persons, record).await.unwrap();

        let found = store
            .select_eq(Collection::Persons, &[("numero_perid", Value::Null)])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }
}
