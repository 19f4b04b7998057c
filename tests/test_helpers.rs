// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 生成临时输入文件、构造导入配置、提供可注入故障的存储
// ==========================================
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::io::Write;
use std::sync::Mutex;
use stock_import::repository::{Collection, Filter, Record, RepositoryError, RepositoryResult};
use stock_import::{ImportConfig, RecordStore, SqliteStore};
use tempfile::{Builder, NamedTempFile};

pub const ARTICLE_HEADER: &str = "BARECODE WAREHOUSE,NUMBER WAREHOUSE,NAME_ARTICLE,SUPPLIER,SUPPLIER2,QUANTITY STOCK PIECE,UNIT,NUMBER ARTICLE SUPPLIER";

pub const SERIAL_HEADER: &str =
    "BARECODE_WAREHOUSE,SERIAL_NUMBER_1,MAC_ADRESSE_1,LOCALISATION,TECH_NAME,PERID,EMPLOYEE";

/// 写入临时 CSV 文件（首行为表头）
pub fn write_csv(header: &str, rows: &[&str]) -> NamedTempFile {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "{}", header).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

/// 两个输入文件 + 指向它们的配置（文件需要保持存活）
pub struct ImportFixture {
    pub articles: NamedTempFile,
    pub serials: NamedTempFile,
    pub config: ImportConfig,
}

pub fn fixture(article_rows: &[&str], serial_rows: &[&str]) -> ImportFixture {
    let articles = write_csv(ARTICLE_HEADER, article_rows);
    let serials = write_csv(SERIAL_HEADER, serial_rows);
    let config = ImportConfig {
        articles_path: articles.path().to_path_buf(),
        serials_path: serials.path().to_path_buf(),
        ..ImportConfig::default()
    };
    ImportFixture {
        articles,
        serials,
        config,
    }
}

// ==========================================
// FlakyStore - 对指定自然键的插入返回错误
// ==========================================
pub struct FlakyStore {
    inner: SqliteStore,
    failing: Mutex<HashSet<String>>,
}

impl FlakyStore {
    pub fn new(failing: &[&str]) -> Self {
        Self {
            inner: SqliteStore::in_memory().unwrap(),
            failing: Mutex::new(failing.iter().map(|s| s.to_string()).collect()),
        }
    }

    pub fn inner(&self) -> &SqliteStore {
        &self.inner
    }

    fn should_fail(&self, record: &Record) -> bool {
        let failing = self.failing.lock().unwrap();
        record
            .values()
            .filter_map(|v| v.as_str())
            .any(|v| failing.contains(v))
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn select_eq(
        &self,
        collection: Collection,
        filters: &[Filter<'_>],
    ) -> RepositoryResult<Vec<Record>> {
        self.inner.select_eq(collection, filters).await
    }

    async fn insert_one(&self, collection: Collection, record: Record) -> RepositoryResult<Record> {
        if self.should_fail(&record) {
            return Err(RepositoryError::RemoteStatus {
                status: 500,
                body: "injected failure".to_string(),
            });
        }
        self.inner.insert_one(collection, record).await
    }
}
