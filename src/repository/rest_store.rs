// ==========================================
// 库存主数据导入工具 - PostgREST 记录存储
// ==========================================
// 职责: 通过 PostgREST（Supabase REST 接口）实现 RecordStore 契约
// 查询: GET  {base}/rest/v1/{table}?select=*&{col}=eq.{value}
// 插入: POST {base}/rest/v1/{table}  (Prefer: return=representation)
// 约束: 一次只发一个请求,不做批量与重试
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::record_store::{Collection, Filter, Record, RecordStore};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// 单次请求超时
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ==========================================
// RestStore
// ==========================================
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
}

impl RestStore {
    /// 创建 PostgREST 客户端
    ///
    /// # 参数
    /// - base_url: 项目地址（如 https://xyz.supabase.co）
    /// - api_key: 匿名或服务端密钥,同时用作 apikey 与 Bearer 令牌
    pub fn new(base_url: &str, api_key: &str) -> RepositoryResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(api_key)?);
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", api_key))?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn table_url(&self, collection: Collection) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection.table_name())
    }

    /// 非 2xx 响应转为 RemoteStatus 错误,否则解析为记录数组
    async fn read_records(response: reqwest::Response) -> RepositoryResult<Vec<Record>> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::RemoteStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Vec<Record>>().await?)
    }
}

fn header_value(raw: &str) -> RepositoryResult<HeaderValue> {
    HeaderValue::from_str(raw).map_err(|e| RepositoryError::FieldValueError {
        field: "api_key".to_string(),
        message: e.to_string(),
    })
}

/// 构造 PostgREST 过滤参数（col=eq.value / col=is.null）
pub fn filter_param(value: &Value) -> String {
    match value {
        Value::Null => "is.null".to_string(),
        Value::String(s) => format!("eq.{}", s),
        other => format!("eq.{}", other),
    }
}

#[async_trait]
impl RecordStore for RestStore {
    async fn select_eq(
        &self,
        collection: Collection,
        filters: &[Filter<'_>],
    ) -> RepositoryResult<Vec<Record>> {
        let mut query: Vec<(&str, String)> = vec![("select", "*".to_string())];
        for (column, value) in filters {
            query.push((*column, filter_param(value)));
        }

        let response = self
            .client
            .get(self.table_url(collection))
            .query(&query)
            .send()
            .await?;

        let records = Self::read_records(response).await?;
        debug!(collection = %collection, matched = records.len(), "远程查询完成");
        Ok(records)
    }

    async fn insert_one(&self, collection: Collection, record: Record) -> RepositoryResult<Record> {
        let response = self
            .client
            .post(self.table_url(collection))
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await?;

        Self::read_records(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::EmptyResponse(collection.to_string()))
    }
}
