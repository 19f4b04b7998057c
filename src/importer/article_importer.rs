// ==========================================
// 库存主数据导入工具 - 阶段 3: 物料导入
// ==========================================
// 输入: 全部物料行 + 供应商查找表
// 输出: 条码 → 物料 id 查找表
// 规则:
// - 条码或名称为空 → 跳过（不计错误）
// - 条码已存在 → 跳过（重复运行幂等）,已有 id 仍写入查找表
// - 否则按缺省值补全后新建
// 失败: 单行出错记录日志并计数,不阻断后续行
// ==========================================

use crate::config::ImportDefaults;
use crate::domain::{ArticleMap, NewArticle, SupplierMap};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::field_mapper::ArticleRow;
use crate::importer::outcome::{is_milestone, RowOutcome, SkipReason, StageStats};
use crate::repository::{insert_entity, Collection, RecordStore, RepositoryResult};
use serde_json::json;
use tracing::{debug, error, info, instrument};

pub struct ArticleImporter<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    defaults: &'a ImportDefaults,
    progress_interval: usize,
    cleaner: DataCleaner,
}

impl<'a, S: RecordStore + ?Sized> ArticleImporter<'a, S> {
    pub fn new(store: &'a S, defaults: &'a ImportDefaults, progress_interval: usize) -> Self {
        Self {
            store,
            defaults,
            progress_interval: progress_interval.max(1),
            cleaner: DataCleaner,
        }
    }

    #[instrument(skip_all, fields(stage = "articles"))]
    pub async fn import(&self, rows: &[ArticleRow], suppliers: &SupplierMap) -> (ArticleMap, StageStats) {
        info!(rows = rows.len(), "=== 导入物料 ===");

        let mut articles = ArticleMap::new();
        let mut stats = StageStats::default();

        for (idx, row) in rows.iter().enumerate() {
            let ordinal = idx + 1;
            let outcome = match self.import_row(ordinal, row, suppliers, &mut articles).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(row = ordinal, barcode = %row.barcode, error = %e, "物料导入失败");
                    RowOutcome::Failed(e.to_string())
                }
            };
            stats.record(&outcome);

            match &outcome {
                RowOutcome::Created(_) if is_milestone(stats.created, self.progress_interval) => {
                    info!(created = stats.created, "已导入物料...");
                }
                RowOutcome::Skipped(reason) => {
                    debug!(row = ordinal, barcode = %row.barcode, reason = %reason, "跳过物料行");
                }
                _ => {}
            }
        }

        info!(
            created = stats.created,
            skipped = stats.skipped,
            errors = stats.errors,
            "物料阶段完成"
        );
        (articles, stats)
    }

    async fn import_row(
        &self,
        ordinal: usize,
        row: &ArticleRow,
        suppliers: &SupplierMap,
        articles: &mut ArticleMap,
    ) -> RepositoryResult<RowOutcome> {
        if row.barcode.is_empty() || row.name.is_empty() {
            return Ok(RowOutcome::Skipped(SkipReason::MissingRequiredField));
        }

        if let Some(id) = self
            .store
            .find_first_id(Collection::Articles, &[("code_ean", json!(row.barcode.as_str()))])
            .await?
        {
            articles.entry(row.barcode.clone()).or_insert(id);
            return Ok(RowOutcome::Skipped(SkipReason::AlreadyExists));
        }

        let article = self.build_article(ordinal, row, suppliers);
        let id = insert_entity(self.store, Collection::Articles, &article).await?;
        articles.insert(row.barcode.clone(), id.clone());
        Ok(RowOutcome::Created(id))
    }

    /// 组装新物料（补全缺省字段）
    pub fn build_article(&self, ordinal: usize, row: &ArticleRow, suppliers: &SupplierMap) -> NewArticle {
        let supplier_id = if row.supplier.is_empty() {
            None
        } else {
            suppliers.get(&row.supplier).cloned()
        };

        let article_number = if row.article_number.is_empty() {
            self.cleaner.placeholder_article_number(ordinal)
        } else {
            row.article_number.clone()
        };

        let packaging_unit = if row.unit.is_empty() {
            self.defaults.packaging_unit.clone()
        } else {
            row.unit.clone()
        };

        NewArticle {
            article_number,
            barcode: row.barcode.clone(),
            name: row.name.clone(),
            packaging_unit,
            supplier_id,
            supplier_reference: self.cleaner.normalize_null(&row.supplier_reference),
            stock_quantity: self.cleaner.parse_quantity(&row.stock_quantity),
            stock_minimum: self.defaults.stock_minimum,
            stock_maximum: self.defaults.stock_maximum,
            reorder_point: self.defaults.reorder_point,
            purchase_price: self.defaults.purchase_price,
            sale_price: self.defaults.sale_price,
            tax_rate: self.defaults.tax_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::capture::capture;
    use crate::repository::SqliteStore;

    fn row(barcode: &str, name: &str) -> ArticleRow {
        ArticleRow {
            barcode: barcode.to_string(),
            name: name.to_string(),
            ..ArticleRow::default()
        }
    }

    #[test]
    fn test_build_article_applies_defaults() {
        let store = SqliteStore::in_memory().unwrap();
        let defaults = ImportDefaults::default();
        let importer = ArticleImporter::new(&store, &defaults, 50);

        let mut suppliers = SupplierMap::new();
        suppliers.insert("Acme".to_string(), "sup-1".to_string());

        let mut input = row("123", "Widget");
        input.supplier = "Acme".to_string();
        input.stock_quantity = "abc".to_string();

        let article = importer.build_article(3, &input, &suppliers);

        assert_eq!(article.article_number, "ART-0003");
        assert_eq!(article.packaging_unit, "Piece");
        assert_eq!(article.supplier_id.as_deref(), Some("sup-1"));
        assert_eq!(article.supplier_reference, None);
        assert_eq!(article.stock_quantity, 0);
        assert_eq!(article.stock_minimum, 5);
        assert_eq!(article.stock_maximum, 100);
        assert_eq!(article.reorder_point, 10);
        assert_eq!(article.purchase_price, 0.0);
        assert_eq!(article.sale_price, 0.0);
        assert_eq!(article.tax_rate, 21.0);
    }

    #[test]
    fn test_build_article_unknown_supplier_is_null() {
        let store = SqliteStore::in_memory().unwrap();
        let defaults = ImportDefaults::default();
        let importer = ArticleImporter::new(&store, &defaults, 50);

        let mut input = row("123", "Widget");
        input.supplier = "Nobody".to_string();
        input.article_number = "WH-77".to_string();
        input.unit = "Box".to_string();
        input.stock_quantity = "14".to_string();
        input.supplier_reference = "REF-1".to_string();

        let article = importer.build_article(1, &input, &SupplierMap::new());

        assert_eq!(article.supplier_id, None);
        assert_eq!(article.article_number, "WH-77");
        assert_eq!(article.packaging_unit, "Box");
        assert_eq!(article.stock_quantity, 14);
        assert_eq!(article.supplier_reference.as_deref(), Some("REF-1"));
    }

    #[tokio::test]
    async fn test_import_skips_incomplete_and_duplicate_rows() {
        let store = SqliteStore::in_memory().unwrap();
        let defaults = ImportDefaults::default();
        let importer = ArticleImporter::new(&store, &defaults, 50);

        let rows = vec![
            row("123", "Widget"),
            row("", "No barcode"),
            row("456", ""),
            row("123", "Widget again"),
            row("789", "Gadget"),
        ];

        let (articles, stats) = importer.import(&rows, &SupplierMap::new()).await;

        assert_eq!(stats.total, 5);
        assert_eq!(stats.created, 2);
        assert_eq!(stats.skipped, 3);
        assert_eq!(stats.errors, 0);
        assert_eq!(articles.len(), 2);
        assert_eq!(store.count(Collection::Articles).unwrap(), 2);
    }

    #[tokio::test]
    async fn test_milestone_logged_every_interval() {
        let store = SqliteStore::in_memory().unwrap();
        let defaults = ImportDefaults::default();
        let importer = ArticleImporter::new(&store, &defaults, 2);

        let rows: Vec<ArticleRow> = (1..=5)
            .map(|i| row(&format!("{}", 100 + i), "Widget"))
            .collect();

        let (logs, _guard) = capture();
        let (_, stats) = importer.import(&rows, &SupplierMap::new()).await;

        assert_eq!(stats.created, 5);
        assert_eq!(logs.count_lines("已导入物料..."), 2);
    }

    #[tokio::test]
    async fn test_existing_article_is_not_updated_but_mapped() {
        let store = SqliteStore::in_memory().unwrap();
        let defaults = ImportDefaults::default();
        let importer = ArticleImporter::new(&store, &defaults, 50);

        let (first, _) = importer.import(&[row("123", "Widget")], &SupplierMap::new()).await;
        let (second, stats) = importer
            .import(&[row("123", "Renamed widget")], &SupplierMap::new())
            .await;

        assert_eq!(stats.skipped, 1);
        assert_eq!(first, second);

        let stored = store
            .select_eq(Collection::Articles, &[("code_ean", json!("123"))])
            .await
            .unwrap();
        assert_eq!(stored[0].get("nom"), Some(&json!("Widget")));
    }
}
