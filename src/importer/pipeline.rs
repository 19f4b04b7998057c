// ==========================================
// 库存主数据导入工具 - 导入流水线
// ==========================================
// 流程: 解析 → 映射 → 供应商 → 技术员 → 物料 → 序列号
// 顺序: 四个阶段严格串行,查找表显式在阶段间传递
// 中止: 仅输入文件缺失/无法解析时中止;单行失败只计数
// ==========================================

use crate::config::ImportConfig;
use crate::domain::{ArticleMap, SupplierMap, TechnicianMap};
use crate::importer::article_importer::ArticleImporter;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::{ArticleRow, FieldMapper, SerialRow};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::outcome::StageStats;
use crate::importer::serial_importer::SerialNumberImporter;
use crate::importer::supplier_resolver::SupplierResolver;
use crate::importer::technician_resolver::TechnicianResolver;
use crate::repository::RecordStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, instrument};

// ==========================================
// ImportReport - 一次运行的汇总
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub suppliers: StageStats,
    pub technicians: StageStats,
    pub articles: StageStats,
    pub serial_numbers: StageStats,
    pub supplier_map: SupplierMap,
    pub technician_map: TechnicianMap,
    pub article_map: ArticleMap,
}

impl ImportReport {
    /// 本次运行新建的记录总数
    pub fn total_created(&self) -> usize {
        self.suppliers.created
            + self.technicians.created
            + self.articles.created
            + self.serial_numbers.created
    }

    /// 各阶段错误总数
    pub fn total_errors(&self) -> usize {
        self.suppliers.errors
            + self.technicians.errors
            + self.articles.errors
            + self.serial_numbers.errors
    }
}

// ==========================================
// ImportPipeline
// ==========================================
pub struct ImportPipeline<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    config: &'a ImportConfig,
}

impl<'a, S: RecordStore + ?Sized> ImportPipeline<'a, S> {
    pub fn new(store: &'a S, config: &'a ImportConfig) -> Self {
        Self { store, config }
    }

    /// 读取并映射两个输入文件
    ///
    /// # 返回
    /// - Err: 任一文件缺失或无法解析（在任何阶段开始前中止）
    pub fn load_inputs(&self) -> ImportResult<(Vec<ArticleRow>, Vec<SerialRow>)> {
        self.config.check_inputs()?;

        let parser = UniversalFileParser;
        let mapper = FieldMapper;

        let raw_articles = parser.parse(&self.config.articles_path)?;
        info!(
            file = %self.config.articles_path.display(),
            rows = raw_articles.len(),
            "物料文件解析完成"
        );
        let raw_serials = parser.parse(&self.config.serials_path)?;
        info!(
            file = %self.config.serials_path.display(),
            rows = raw_serials.len(),
            "序列号文件解析完成"
        );

        Ok((
            mapper.map_article_rows(&raw_articles),
            mapper.map_serial_rows(&raw_serials),
        ))
    }

    /// 从配置的文件路径执行完整导入
    pub async fn run(&self) -> ImportResult<ImportReport> {
        let (articles, serials) = self.load_inputs()?;
        Ok(self.run_rows(&articles, &serials).await)
    }

    /// 对已映射的行执行四个阶段
    #[instrument(skip_all, fields(articles = article_rows.len(), serials = serial_rows.len()))]
    pub async fn run_rows(&self, article_rows: &[ArticleRow], serial_rows: &[SerialRow]) -> ImportReport {
        let started_at = Utc::now();
        let clock = Instant::now();

        let (supplier_map, suppliers) = SupplierResolver::new(self.store).resolve(article_rows).await;

        let (technician_map, technicians) =
            TechnicianResolver::new(self.store).resolve(serial_rows).await;

        let (article_map, articles) = ArticleImporter::new(
            self.store,
            &self.config.defaults,
            self.config.progress_interval,
        )
        .import(article_rows, &supplier_map)
        .await;

        let serial_numbers = SerialNumberImporter::new(
            self.store,
            &self.config.defaults,
            self.config.progress_interval,
            self.config.max_logged_errors,
        )
        .import(serial_rows, &article_map)
        .await;

        let report = ImportReport {
            started_at,
            duration_ms: clock.elapsed().as_millis() as u64,
            suppliers,
            technicians,
            articles,
            serial_numbers,
            supplier_map,
            technician_map,
            article_map,
        };

        debug!(total_created = report.total_created(), "四个阶段执行完毕");
        info!(
            suppliers = report.supplier_map.len(),
            technicians = report.technician_map.len(),
            articles = report.articles.created,
            serial_numbers = report.serial_numbers.created,
            errors = report.total_errors(),
            duration_ms = report.duration_ms,
            "=== 导入完成 ==="
        );
        report
    }
}
