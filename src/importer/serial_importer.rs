// ==========================================
// 库存主数据导入工具 - 阶段 4: 序列号导入
// ==========================================
// 输入: 全部序列号行 + 物料查找表
// 规则:
// - 序列号为空或为 "Null" → 跳过
// - 物料 id: 先查查找表,未命中再按条码实时查询;仍未命中 → 计为错误
// - 序列号已存在 → 跳过（重复运行幂等）
// - 否则新建,状态固定为可用
// 失败: 单行出错计数并继续,仅前 N 条错误输出详细日志
// ==========================================

use crate::config::ImportDefaults;
use crate::domain::{ArticleMap, NewSerialUnit, RecordId, SerialStatus};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::field_mapper::SerialRow;
use crate::importer::outcome::{is_milestone, RowOutcome, SkipReason, StageStats};
use crate::repository::{insert_entity, Collection, RecordStore, RepositoryResult};
use serde_json::json;
use tracing::{info, instrument, warn};

/// 第 N 条错误的日志方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLog {
    /// 逐条输出
    Detail,
    /// 超出上限后输出一次提示
    Suppressed,
    Silent,
}

/// errors 为累计错误数（含本条）
pub fn error_log_level(errors: usize, cap: usize) -> ErrorLog {
    if errors <= cap {
        ErrorLog::Detail
    } else if errors == cap + 1 {
        ErrorLog::Suppressed
    } else {
        ErrorLog::Silent
    }
}

pub struct SerialNumberImporter<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    defaults: &'a ImportDefaults,
    progress_interval: usize,
    max_logged_errors: usize,
    cleaner: DataCleaner,
}

impl<'a, S: RecordStore + ?Sized> SerialNumberImporter<'a, S> {
    pub fn new(
        store: &'a S,
        defaults: &'a ImportDefaults,
        progress_interval: usize,
        max_logged_errors: usize,
    ) -> Self {
        Self {
            store,
            defaults,
            progress_interval: progress_interval.max(1),
            max_logged_errors,
            cleaner: DataCleaner,
        }
    }

    #[instrument(skip_all, fields(stage = "serial_numbers"))]
    pub async fn import(&self, rows: &[SerialRow], articles: &ArticleMap) -> StageStats {
        info!(rows = rows.len(), "=== 导入序列号 ===");

        let mut stats = StageStats::default();

        for (idx, row) in rows.iter().enumerate() {
            let ordinal = idx + 1;
            let outcome = match self.import_row(row, articles).await {
                Ok(outcome) => outcome,
                Err(e) => RowOutcome::Failed(e.to_string()),
            };
            stats.record(&outcome);

            match &outcome {
                RowOutcome::Created(_) if is_milestone(stats.created, self.progress_interval) => {
                    info!(created = stats.created, "已导入序列号...");
                }
                RowOutcome::Failed(reason) => match error_log_level(stats.errors, self.max_logged_errors) {
                    ErrorLog::Detail => {
                        warn!(row = ordinal, serial = %row.serial_number, error = %reason, "序列号导入失败");
                    }
                    ErrorLog::Suppressed => {
                        warn!(limit = self.max_logged_errors, "错误过多,后续错误不再逐条输出");
                    }
                    ErrorLog::Silent => {}
                },
                _ => {}
            }
        }

        info!(
            created = stats.created,
            skipped = stats.skipped,
            errors = stats.errors,
            "序列号阶段完成"
        );
        stats
    }

    async fn import_row(&self, row: &SerialRow, articles: &ArticleMap) -> RepositoryResult<RowOutcome> {
        if row.serial_number.is_empty() || self.cleaner.is_null_sentinel(&row.serial_number) {
            return Ok(RowOutcome::Skipped(SkipReason::NullSerial));
        }

        let article_id = match self.resolve_article(&row.barcode, articles).await? {
            Some(id) => id,
            None => {
                return Ok(RowOutcome::Failed(format!(
                    "未找到条码对应的物料: {}",
                    row.barcode
                )))
            }
        };

        if self
            .store
            .find_first_id(
                Collection::SerialUnits,
                &[("numero_serie", json!(row.serial_number.as_str()))],
            )
            .await?
            .is_some()
        {
            return Ok(RowOutcome::Skipped(SkipReason::AlreadyExists));
        }

        let location = if row.location.is_empty() {
            self.defaults.location.clone()
        } else {
            row.location.clone()
        };

        let unit = NewSerialUnit {
            article_id,
            serial_number: row.serial_number.clone(),
            mac_address: self.cleaner.normalize_null(&row.mac_address),
            location,
            status: SerialStatus::Available,
        };
        let id = insert_entity(self.store, Collection::SerialUnits, &unit).await?;
        Ok(RowOutcome::Created(id))
    }

    /// 查找表优先,未命中时按条码实时查询
    async fn resolve_article(
        &self,
        barcode: &str,
        articles: &ArticleMap,
    ) -> RepositoryResult<Option<RecordId>> {
        if let Some(id) = articles.get(barcode) {
            return Ok(Some(id.clone()));
        }

        self.store
            .find_first_id(Collection::Articles, &[("code_ean", json!(barcode))])
            .await
    }
}
