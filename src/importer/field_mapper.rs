// ==========================================
// 库存主数据导入工具 - 字段映射
// ==========================================
// 职责: 原始行记录 → 阶段输入结构体（所有字段 TRIM）
// 约束: 缺失列视为空字符串,不报错
// ==========================================

use crate::importer::file_parser::RawRow;

/// 物料表列名
pub mod article_columns {
    pub const BARCODE: &str = "BARECODE WAREHOUSE";
    pub const ARTICLE_NUMBER: &str = "NUMBER WAREHOUSE";
    pub const NAME: &str = "NAME_ARTICLE";
    pub const SUPPLIER: &str = "SUPPLIER";
    pub const SUPPLIER2: &str = "SUPPLIER2";
    pub const STOCK_QUANTITY: &str = "QUANTITY STOCK PIECE";
    pub const UNIT: &str = "UNIT";
    pub const SUPPLIER_REFERENCE: &str = "NUMBER ARTICLE SUPPLIER";
}

/// 序列号表列名
pub mod serial_columns {
    pub const BARCODE: &str = "BARECODE_WAREHOUSE";
    pub const SERIAL_NUMBER: &str = "SERIAL_NUMBER_1";
    pub const MAC_ADDRESS: &str = "MAC_ADRESSE_1";
    pub const LOCATION: &str = "LOCALISATION";
    pub const TECHNICIAN_NAME: &str = "TECH_NAME";
    pub const PERSONNEL_ID: &str = "PERID";
    pub const EMPLOYEE_ID: &str = "EMPLOYEE";
}

// ==========================================
// ArticleRow - 物料表一行
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleRow {
    pub barcode: String,
    pub article_number: String,
    pub name: String,
    pub supplier: String,
    pub supplier2: String,
    pub stock_quantity: String,
    pub unit: String,
    pub supplier_reference: String,
}

// ==========================================
// SerialRow - 序列号表一行
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerialRow {
    pub barcode: String,
    pub serial_number: String,
    pub mac_address: String,
    pub location: String,
    pub technician_name: String,
    pub personnel_id: String,
    pub employee_id: String,
}

// ==========================================
// FieldMapper
// ==========================================
pub struct FieldMapper;

impl FieldMapper {
    fn field(row: &RawRow, column: &str) -> String {
        row.get(column).map(|v| v.trim().to_string()).unwrap_or_default()
    }

    pub fn map_article_row(&self, row: &RawRow) -> ArticleRow {
        use article_columns::*;
        ArticleRow {
            barcode: Self::field(row, BARCODE),
            article_number: Self::field(row, ARTICLE_NUMBER),
            name: Self::field(row, NAME),
            supplier: Self::field(row, SUPPLIER),
            supplier2: Self::field(row, SUPPLIER2),
            stock_quantity: Self::field(row, STOCK_QUANTITY),
            unit: Self::field(row, UNIT),
            supplier_reference: Self::field(row, SUPPLIER_REFERENCE),
        }
    }

    pub fn map_serial_row(&self, row: &RawRow) -> SerialRow {
        use serial_columns::*;
        SerialRow {
            barcode: Self::field(row, BARCODE),
            serial_number: Self::field(row, SERIAL_NUMBER),
            mac_address: Self::field(row, MAC_ADDRESS),
            location: Self::field(row, LOCATION),
            technician_name: Self::field(row, TECHNICIAN_NAME),
            personnel_id: Self::field(row, PERSONNEL_ID),
            employee_id: Self::field(row, EMPLOYEE_ID),
        }
    }

    pub fn map_article_rows(&self, rows: &[RawRow]) -> Vec<ArticleRow> {
        rows.iter().map(|row| self.map_article_row(row)).collect()
    }

    pub fn map_serial_rows(&self, rows: &[RawRow]) -> Vec<SerialRow> {
        rows.iter().map(|row| self.map_serial_row(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_map_article_row_trims_and_defaults_missing() {
        let row = raw(&[
            ("BARECODE WAREHOUSE", " 5411 "),
            ("NAME_ARTICLE", "Modem  "),
            ("SUPPLIER", "  Acme"),
        ]);

        let mapped = FieldMapper.map_article_row(&row);

        assert_eq!(mapped.barcode, "5411");
        assert_eq!(mapped.name, "Modem");
        assert_eq!(mapped.supplier, "Acme");
        assert_eq!(mapped.supplier2, "");
        assert_eq!(mapped.unit, "");
    }

    #[test]
    fn test_map_serial_row() {
        let row = raw(&[
            ("BARECODE_WAREHOUSE", "5411"),
            ("SERIAL_NUMBER_1", " SN-9 "),
            ("TECH_NAME", " John Smith "),
            ("PERID", "P-1"),
        ]);

        let mapped = FieldMapper.map_serial_row(&row);

        assert_eq!(mapped.serial_number, "SN-9");
        assert_eq!(mapped.technician_name, "John Smith");
        assert_eq!(mapped.personnel_id, "P-1");
        assert_eq!(mapped.employee_id, "");
    }
}
