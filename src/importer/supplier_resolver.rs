// ==========================================
// 库存主数据导入工具 - 阶段 1: 供应商去重
// ==========================================
// 输入: 全部物料行（SUPPLIER / SUPPLIER2 两列）
// 输出: 供应商名称 → id 查找表
// 规则: 按名称精确匹配查询,存在则复用,否则新建（代码由名称派生）
// 失败: 单个名称出错只记录日志,该名称不进入查找表
// ==========================================

use crate::domain::{NewSupplier, SupplierMap};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::field_mapper::ArticleRow;
use crate::importer::outcome::{RowOutcome, StageStats};
use crate::repository::{insert_entity, Collection, RecordStore, RepositoryResult};
use serde_json::json;
use std::collections::HashSet;
use tracing::{debug, error, info, instrument};

pub struct SupplierResolver<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    cleaner: DataCleaner,
}

impl<'a, S: RecordStore + ?Sized> SupplierResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            cleaner: DataCleaner,
        }
    }

    /// 收集两列中出现过的非空供应商名（精确匹配去重,保持首次出现顺序）
    pub fn collect_names(rows: &[ArticleRow]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for row in rows {
            for name in [&row.supplier, &row.supplier2] {
                let name = name.trim();
                if !name.is_empty() && seen.insert(name.to_string()) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    #[instrument(skip_all, fields(stage = "suppliers"))]
    pub async fn resolve(&self, rows: &[ArticleRow]) -> (SupplierMap, StageStats) {
        let names = Self::collect_names(rows);
        info!(unique = names.len(), "=== 创建供应商 === 发现唯一供应商");

        let mut suppliers = SupplierMap::with_capacity(names.len());
        let mut stats = StageStats::default();

        for name in names {
            let outcome = match self.resolve_one(&name).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(supplier = %name, error = %e, "供应商处理失败");
                    RowOutcome::Failed(e.to_string())
                }
            };

            match &outcome {
                RowOutcome::Created(id) => {
                    info!(supplier = %name, "创建供应商");
                    suppliers.insert(name, id.clone());
                }
                RowOutcome::Reused(id) => {
                    debug!(supplier = %name, "供应商已存在");
                    suppliers.insert(name, id.clone());
                }
                RowOutcome::Skipped(_) | RowOutcome::Failed(_) => {}
            }
            stats.record(&outcome);
        }

        info!(
            in_store = suppliers.len(),
            created = stats.created,
            reused = stats.reused,
            errors = stats.errors,
            "供应商阶段完成"
        );
        (suppliers, stats)
    }

    async fn resolve_one(&self, name: &str) -> RepositoryResult<RowOutcome> {
        if let Some(id) = self
            .store
            .find_first_id(Collection::Suppliers, &[("nom", json!(name))])
            .await?
        {
            return Ok(RowOutcome::Reused(id));
        }

        let supplier = NewSupplier::new(name, self.cleaner.derive_supplier_code(name));
        let id = insert_entity(self.store, Collection::Suppliers, &supplier).await?;
        Ok(RowOutcome::Created(id))
    }
}
