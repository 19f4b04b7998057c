// ==========================================
// 库存主数据导入工具 - 记录存储契约
// ==========================================
// 职责: 定义导入流水线依赖的最小存储接口
// 红线: 只有"按等值条件查询"和"插入单条"两种操作,
//       不依赖任何具体传输方式或查询语言
// ==========================================

use crate::domain::RecordId;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// 存储中的一条记录（字段名 → 值）
pub type Record = serde_json::Map<String, Value>;

/// 等值过滤条件（字段名, 值），多个条件之间为 AND
pub type Filter<'a> = (&'a str, Value);

// ==========================================
// Collection - 四个可独立寻址的集合
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Suppliers,
    Persons,
    Articles,
    SerialUnits,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Suppliers,
        Collection::Persons,
        Collection::Articles,
        Collection::SerialUnits,
    ];

    /// 存储中的表名
    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Suppliers => "fournisseurs",
            Collection::Persons => "personnes",
            Collection::Articles => "articles",
            Collection::SerialUnits => "numeros_serie",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

// ==========================================
// RecordStore Trait
// ==========================================
// 实现者: RestStore（PostgREST）, SqliteStore（本地）
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// 按等值条件查询记录
    ///
    /// # 返回
    /// - Ok(Vec<Record>): 零条或多条匹配记录
    async fn select_eq(
        &self,
        collection: Collection,
        filters: &[Filter<'_>],
    ) -> RepositoryResult<Vec<Record>>;

    /// 插入单条记录
    ///
    /// # 返回
    /// - Ok(Record): 创建后的完整记录（含存储生成的 id）
    async fn insert_one(&self, collection: Collection, record: Record) -> RepositoryResult<Record>;

    /// 查询第一条匹配记录的 id
    async fn find_first_id(
        &self,
        collection: Collection,
        filters: &[Filter<'_>],
    ) -> RepositoryResult<Option<RecordId>> {
        let records = self.select_eq(collection, filters).await?;
        match records.first() {
            Some(record) => Ok(Some(record_id(collection, record)?)),
            None => Ok(None),
        }
    }
}

/// 插入实体并返回生成的 id
pub async fn insert_entity<S, T>(
    store: &S,
    collection: Collection,
    entity: &T,
) -> RepositoryResult<RecordId>
where
    S: RecordStore + ?Sized,
    T: Serialize + Sync,
{
    let created = store.insert_one(collection, to_record(entity)?).await?;
    record_id(collection, &created)
}

/// 将实体序列化为记录
pub fn to_record<T: Serialize>(entity: &T) -> RepositoryResult<Record> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        other => Err(RepositoryError::SerializationError(format!(
            "实体必须序列化为对象, 实际为: {}",
            other
        ))),
    }
}

/// 读取记录的 id（字符串或数字均可）
pub fn record_id(collection: Collection, record: &Record) -> RepositoryResult<RecordId> {
    match record.get("id") {
        Some(Value::String(id)) => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => Err(RepositoryError::MissingId(collection.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewSupplier;
    use serde_json::json;

    #[test]
    fn test_to_record_uses_wire_names() {
        let record = to_record(&NewSupplier::new("Acme", "ACME")).unwrap();
        assert_eq!(record.get("nom"), Some(&json!("Acme")));
        assert_eq!(record.get("code_fournisseur"), Some(&json!("ACME")));
        assert_eq!(record.get("actif"), Some(&json!(true)));
    }

    #[test]
    fn test_to_record_rejects_scalars() {
        assert!(to_record(&42).is_err());
    }

    #[test]
    fn test_record_id_accepts_string_and_number() {
        let mut record = Record::new();
        record.insert("id".to_string(), json!("abc"));
        assert_eq!(record_id(Collection::Articles, &record).unwrap(), "abc");

        record.insert("id".to_string(), json!(17));
        assert_eq!(record_id(Collection::Articles, &record).unwrap(), "17");

        record.remove("id");
        assert!(matches!(
            record_id(Collection::Articles, &record),
            Err(RepositoryError::MissingId(_))
        ));
    }
}
