// ==========================================
// 库存主数据导入工具 - 阶段 2: 技术员去重
// ==========================================
// 输入: 全部序列号行（TECH_NAME / PERID / EMPLOYEE）
// 输出: 技术员全名 → id 查找表
// 规则: 按全名去重,首次出现的 PERID/EMPLOYEE 生效;
//       全名在第一个空格处拆分为 名/姓,按 (姓, 名, 类型) 查询后复用或新建
// 失败: 单个技术员出错只记录日志并跳过
// ==========================================

use crate::domain::{NewTechnician, PersonType, TechnicianMap};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::field_mapper::SerialRow;
use crate::importer::outcome::{RowOutcome, StageStats};
use crate::repository::{insert_entity, Collection, RecordStore, RepositoryResult};
use serde_json::json;
use std::collections::HashSet;
use tracing::{debug, error, info, instrument};

/// 去重后的技术员（附带首次出现的外部编号）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicianEntry {
    pub full_name: String,
    pub personnel_id: String,
    pub employee_id: String,
}

pub struct TechnicianResolver<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    cleaner: DataCleaner,
}

impl<'a, S: RecordStore + ?Sized> TechnicianResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            cleaner: DataCleaner,
        }
    }

    /// 按全名去重,保持首次出现顺序
    pub fn collect_entries(rows: &[SerialRow]) -> Vec<TechnicianEntry> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for row in rows {
            let full_name = row.technician_name.trim();
            if full_name.is_empty() || !seen.insert(full_name.to_string()) {
                continue;
            }
            entries.push(TechnicianEntry {
                full_name: full_name.to_string(),
                personnel_id: row.personnel_id.trim().to_string(),
                employee_id: row.employee_id.trim().to_string(),
            });
        }
        entries
    }

    #[instrument(skip_all, fields(stage = "technicians"))]
    pub async fn resolve(&self, rows: &[SerialRow]) -> (TechnicianMap, StageStats) {
        let entries = Self::collect_entries(rows);
        info!(unique = entries.len(), "=== 创建技术员 === 发现唯一技术员");

        let mut technicians = TechnicianMap::with_capacity(entries.len());
        let mut stats = StageStats::default();

        for entry in entries {
            let outcome = match self.resolve_one(&entry).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(technician = %entry.full_name, error = %e, "技术员处理失败");
                    RowOutcome::Failed(e.to_string())
                }
            };

            match &outcome {
                RowOutcome::Created(id) => {
                    info!(technician = %entry.full_name, perid = %entry.personnel_id, "创建技术员");
                    technicians.insert(entry.full_name, id.clone());
                }
                RowOutcome::Reused(id) => {
                    debug!(technician = %entry.full_name, "技术员已存在");
                    technicians.insert(entry.full_name, id.clone());
                }
                RowOutcome::Skipped(_) | RowOutcome::Failed(_) => {}
            }
            stats.record(&outcome);
        }

        info!(
            in_store = technicians.len(),
            created = stats.created,
            reused = stats.reused,
            errors = stats.errors,
            "技术员阶段完成"
        );
        (technicians, stats)
    }

    async fn resolve_one(&self, entry: &TechnicianEntry) -> RepositoryResult<RowOutcome> {
        let (first_name, last_name) = self.cleaner.split_full_name(&entry.full_name);
        let person_type = PersonType::Technician;

        if let Some(id) = self
            .store
            .find_first_id(
                Collection::Persons,
                &[
                    ("nom", json!(last_name.as_str())),
                    ("prenom", json!(first_name.as_str())),
                    ("type", json!(person_type.as_str())),
                ],
            )
            .await?
        {
            return Ok(RowOutcome::Reused(id));
        }

        let technician = NewTechnician {
            last_name,
            first_name,
            person_type,
            personnel_id: self.cleaner.normalize_null(&entry.personnel_id),
            employee_id: self.cleaner.normalize_null(&entry.employee_id),
        };
        let id = insert_entity(self.store, Collection::Persons, &technician).await?;
        Ok(RowOutcome::Created(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::SqliteStore;
    use serde_json::Value;

    fn row(name: &str, perid: &str, employee: &str) -> SerialRow {
        SerialRow {
            technician_name: name.to_string(),
            personnel_id: perid.to_string(),
            employee_id: employee.to_string(),
            ..SerialRow::default()
        }
    }

    #[test]
    fn test_first_occurrence_metadata_wins() {
        let rows = vec![
            row("John Smith", "P-1", "E-1"),
            row("", "P-x", "E-x"),
            row("John Smith", "P-2", "E-2"),
            row("Madonna", "", ""),
        ];

        let entries = TechnicianResolver::<SqliteStore>::collect_entries(&rows);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].personnel_id, "P-1");
        assert_eq!(entries[0].employee_id, "E-1");
        assert_eq!(entries[1].full_name, "Madonna");
    }

    #[tokio::test]
    async fn test_resolve_splits_names_and_nulls_empty_ids() {
        let store = SqliteStore::in_memory().unwrap();
        let rows = vec![row("John Smith Doe", "P-1", ""), row("Madonna", "", "E-9")];

        let (technicians, stats) = TechnicianResolver::new(&store).resolve(&rows).await;
        assert_eq!(stats.created, 2);
        assert_eq!(technicians.len(), 2);

        let john = store
            .select_eq(Collection::Persons, &[("prenom", json!("John"))])
            .await
            .unwrap();
        assert_eq!(john[0].get("nom"), Some(&json!("Smith Doe")));
        assert_eq!(john[0].get("type"), Some(&json!("technicien")));
        assert_eq!(john[0].get("numero_perid"), Some(&json!("P-1")));
        assert_eq!(john[0].get("erp_id"), Some(&Value::Null));

        let madonna = store
            .select_eq(Collection::Persons, &[("prenom", json!("Madonna"))])
            .await
            .unwrap();
        assert_eq!(madonna[0].get("nom"), Some(&json!("Madonna")));
        assert_eq!(madonna[0].get("numero_perid"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_resolve_reuses_existing_person() {
        let store = SqliteStore::in_memory().unwrap();
        let rows = vec![row("Jane Doe", "P-1", "E-1")];

        let (first, _) = TechnicianResolver::new(&store).resolve(&rows).await;
        let (second, stats) = TechnicianResolver::new(&store).resolve(&rows).await;

        assert_eq!(stats.reused, 1);
        assert_eq!(first, second);
        assert_eq!(store.count(Collection::Persons).unwrap(), 1);
    }
}
