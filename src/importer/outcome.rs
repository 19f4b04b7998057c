// ==========================================
// 库存主数据导入工具 - 行级处理结果
// ==========================================
// 每个条目（供应商名/技术员名/物料行/序列号行）只有两类结局:
// 接受并落库（Created/Reused）或 跳过/出错后继续（Skipped/Failed）
// ==========================================

use crate::domain::RecordId;
use serde::Serialize;
use std::fmt;

/// 跳过原因（不视为错误）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 必填字段为空
    MissingRequiredField,
    /// 自然键已存在于存储中
    AlreadyExists,
    /// 序列号为空或为 "Null" 字面值
    NullSerial,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingRequiredField => write!(f, "缺少必填字段"),
            SkipReason::AlreadyExists => write!(f, "已存在"),
            SkipReason::NullSerial => write!(f, "无序列号"),
        }
    }
}

/// 单个条目的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// 新建记录
    Created(RecordId),
    /// 复用已有记录（供应商/技术员）
    Reused(RecordId),
    Skipped(SkipReason),
    /// 持久化失败或关联无法解析
    Failed(String),
}

// ==========================================
// StageStats - 阶段计数器
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StageStats {
    pub total: usize,
    pub created: usize,
    pub reused: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl StageStats {
    /// 累计一个条目的结果
    pub fn record(&mut self, outcome: &RowOutcome) {
        self.total += 1;
        match outcome {
            RowOutcome::Created(_) => self.created += 1,
            RowOutcome::Reused(_) => self.reused += 1,
            RowOutcome::Skipped(_) => self.skipped += 1,
            RowOutcome::Failed(_) => self.errors += 1,
        }
    }
}

/// 第 created 条新建是否需要输出进度（每 interval 条一次）
pub fn is_milestone(created: usize, interval: usize) -> bool {
    interval > 0 && created > 0 && created % interval == 0
}

impl fmt::Display for StageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "共 {} 条: 新建 {}, 复用 {}, 跳过 {}, 错误 {}",
            self.total, self.created, self.reused, self.skipped, self.errors
        )
    }
}
