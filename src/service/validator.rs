use crate::config::DteFields;
use crate::models::{CellValue, ColumnMapping, Row, RowExt};
use crate::service::parser::parse_numeric_value;

/// 进项发票抵扣资格校验
///
/// 只决定能否参与抵扣选择，不影响台账合计。
#[derive(Debug, Clone)]
pub struct InvoiceValidator {
    fields: DteFields,
}

impl InvoiceValidator {
    pub fn new(fields: DteFields) -> Self {
        Self { fields }
    }

    /// 总额列：优先用识别出的列，否则用 SAT 默认列名
    pub fn total_column<'a>(&'a self, mapping: &'a ColumnMapping) -> &'a str {
        mapping.total_column().unwrap_or(&self.fields.total)
    }

    pub fn tax_column<'a>(&'a self, mapping: &'a ColumnMapping) -> &'a str {
        mapping.tax_column().unwrap_or(&self.fields.tax)
    }

    pub fn is_valid_invoice(&self, row: &Row, mapping: &ColumnMapping) -> bool {
        self.has_required_fields(row, mapping)
            && self.is_not_canceled(row)
            && self.is_not_exempt_document(row, mapping)
            && self.has_positive_tax(row, mapping)
    }

    /// 总额、税额两列都必须有非空值
    pub fn has_required_fields(&self, row: &Row, mapping: &ColumnMapping) -> bool {
        [self.total_column(mapping), self.tax_column(mapping)]
            .iter()
            .all(|field| row.get(*field).is_some_and(|v| !v.is_null()))
    }

    /// 作废标记为 "Si" / "YES" / true 的票据不可用
    pub fn is_not_canceled(&self, row: &Row) -> bool {
        match row.get(self.fields.canceled.as_str()) {
            Some(CellValue::Bool(true)) => false,
            Some(CellValue::Text(s)) => s != "Si" && s != "YES",
            _ => true,
        }
    }

    /// 收据类 (RECI) 票据必须带正税额
    pub fn is_not_exempt_document(&self, row: &Row, mapping: &ColumnMapping) -> bool {
        let doc_type = row
            .text(Some(self.fields.document_type.as_str()))
            .trim()
            .to_uppercase();

        !doc_type.starts_with("RECI") || self.tax_amount(row, mapping) > 0.0
    }

    pub fn has_positive_tax(&self, row: &Row, mapping: &ColumnMapping) -> bool {
        self.tax_amount(row, mapping) > 0.0
    }

    fn tax_amount(&self, row: &Row, mapping: &ColumnMapping) -> f64 {
        parse_numeric_value(row.cell(Some(self.tax_column(mapping))))
    }
}

impl Default for InvoiceValidator {
    fn default() -> Self {
        Self::new(DteFields::default())
    }
}
