// ==========================================
// 库存主数据导入工具 - 数据清洗与派生规则
// ==========================================
// 职责: NULL 标准化 / 供应商代码派生 / 姓名拆分 / 数量解析
// 红线: 纯函数,不访问存储
// ==========================================

/// 序列号列中表示"无序列号"的字面值（大小写严格匹配）
pub const NULL_SENTINEL: &str = "Null";

/// 供应商代码取名称的前 N 个字符
pub const SUPPLIER_CODE_MAX_CHARS: usize = 20;

pub struct DataCleaner;

impl DataCleaner {
    /// 空字符串/空白 → None
    pub fn normalize_null(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// 供应商代码: 前 20 个字符 → 大写 → 空格替换为下划线
    pub fn derive_supplier_code(&self, name: &str) -> String {
        name.chars()
            .take(SUPPLIER_CODE_MAX_CHARS)
            .collect::<String>()
            .to_uppercase()
            .replace(' ', "_")
    }

    /// 技术员全名拆分为 (名, 姓)
    ///
    /// # 规则
    /// - 在第一个空格处切分: 名 = 第一段, 姓 = 剩余部分
    /// - 没有空格时, 名与姓均为整个字符串
    ///
    /// 多段姓名同样只切第一个空格: "Jean Pierre Dupont" → 名 "Jean", 姓 "Pierre Dupont"
    pub fn split_full_name(&self, full_name: &str) -> (String, String) {
        let full_name = full_name.trim();
        match full_name.split_once(' ') {
            Some((first, rest)) => (first.to_string(), rest.to_string()),
            None => (full_name.to_string(), full_name.to_string()),
        }
    }

    /// 库存数量: 整数解析,空值或解析失败时为 0
    ///
    /// 接受可选符号与数字间的单个下划线分组（"1_000" → 1000）;
    /// 超出 i64 范围视为解析失败
    pub fn parse_quantity(&self, raw: &str) -> i64 {
        let trimmed = raw.trim();
        let (sign, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        if !is_grouped_digits(digits) {
            return 0;
        }

        let mut cleaned = String::with_capacity(trimmed.len());
        cleaned.push_str(sign);
        cleaned.extend(digits.chars().filter(|c| *c != '_'));
        cleaned.parse::<i64>().unwrap_or(0)
    }

    /// 物料编号占位值（按 1 起始的行序号）
    pub fn placeholder_article_number(&self, ordinal: usize) -> String {
        format!("ART-{:04}", ordinal)
    }

    pub fn is_null_sentinel(&self, value: &str) -> bool {
        value == NULL_SENTINEL
    }
}

// 数字组: 非空,下划线只能出现在两个数字之间
fn is_grouped_digits(s: &str) -> bool {
    !s.is_empty()
        && s
            .split('_')
            .all(|group| !group.is_empty() && group.bytes().all(|b| b.is_ascii_digit()))
}
