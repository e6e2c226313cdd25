use crate::config::{SelectionConfig, TaxConfig};
use crate::models::{ColumnMapping, InvoiceOptimizationResult, OptimizedInvoice, Row, RowExt};
use crate::service::aggregator::row_currency;
use crate::service::classifier::DocumentClassifier;
use crate::service::parser::parse_numeric_value;
use crate::service::scorer::EfficiencyScorer;
use crate::service::selection::SelectionStrategy;
use crate::service::validator::InvoiceValidator;

/// 进项发票抵扣优化：构建候选 -> 评分 -> 选择 -> 汇总
#[derive(Debug, Clone)]
pub struct InvoiceOptimizer {
    validator: InvoiceValidator,
    classifier: DocumentClassifier,
    scorer: EfficiencyScorer,
    selection: SelectionConfig,
}

impl InvoiceOptimizer {
    pub fn new(tax: &TaxConfig, selection: SelectionConfig) -> Self {
        Self {
            validator: InvoiceValidator::new(tax.fields.clone()),
            classifier: DocumentClassifier::new(tax.fields.document_type.clone()),
            scorer: EfficiencyScorer::new(tax.statutory_rate),
            selection,
        }
    }

    /// 以 target_tax_amount (销项税) 为目标选择进项发票
    pub fn optimize_invoice_selection(
        &self,
        purchases: &[Row],
        target_tax_amount: f64,
        mapping: &ColumnMapping,
        exchange_rate: f64,
        strategy: SelectionStrategy,
    ) -> InvoiceOptimizationResult {
        let candidates = self.create_optimized_invoice_list(purchases, mapping, exchange_rate);
        let selector = strategy.selector(self.selection);
        let selected = selector.select(&candidates, target_tax_amount);

        let result = InvoiceOptimizationResult::from_selection(target_tax_amount, selected);

        tracing::info!(
            "发票选择完成 ({:?}): 候选 {} 张, 选中 {} 张, 目标 {:.2}, 达成 {:.2}, 覆盖率 {:.2}%",
            strategy,
            candidates.len(),
            result.total_selected_invoices,
            result.target_tax_amount,
            result.achieved_tax_amount,
            result.coverage_percentage
        );

        result
    }

    /// 每一行都生成候选，是否可参与选择由 is_valid 决定
    pub fn create_optimized_invoice_list(
        &self,
        purchases: &[Row],
        mapping: &ColumnMapping,
        exchange_rate: f64,
    ) -> Vec<OptimizedInvoice> {
        purchases
            .iter()
            .enumerate()
            .map(|(idx, row)| self.build_invoice(idx, row, mapping, exchange_rate))
            .collect()
    }

    pub fn build_invoice(
        &self,
        row_index: usize,
        row: &Row,
        mapping: &ColumnMapping,
        exchange_rate: f64,
    ) -> OptimizedInvoice {
        let tax_amount = parse_numeric_value(row.cell(Some(self.validator.tax_column(mapping))));
        let total_amount = parse_numeric_value(row.cell(Some(self.validator.total_column(mapping))));
        let currency = row_currency(row, mapping.currency_column());

        let converted_tax = currency.to_base(tax_amount, exchange_rate);
        let converted_total = currency.to_base(total_amount, exchange_rate);

        let mut invoice = OptimizedInvoice {
            invoice_number: text_or_na(row, mapping.invoice_number.as_deref()),
            taxpayer_name: text_or_na(row, mapping.taxpayer_name.as_deref()),
            total_amount: converted_total,
            tax_amount: converted_tax,
            currency,
            document_type: self.classifier.classify_document(row),
            tax_ratio: OptimizedInvoice::tax_ratio_of(converted_total, converted_tax),
            efficiency_score: 0.0,
            row_index,
            original_row: row.clone(),
            is_valid: self.validator.is_valid_invoice(row, mapping),
        };
        invoice.efficiency_score = self.scorer.efficiency_score(&invoice);
        invoice
    }
}

fn text_or_na(row: &Row, column: Option<&str>) -> String {
    match row.cell(column) {
        Some(value) if value.is_truthy() => value.to_text(),
        _ => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, Currency, DocumentType};

    fn purchase(doc_type: &str, total: f64, tax: f64, currency: &str) -> Row {
        let mut r = Row::new();
        r.insert("Serie".into(), CellValue::Text("FAC-001".into()));
        r.insert("Nombre del emisor".into(), CellValue::Text("Distribuidora S.A.".into()));
        r.insert("Tipo de DTE (nombre)".into(), CellValue::Text(doc_type.into()));
        r.insert("Moneda".into(), CellValue::Text(currency.into()));
        r.insert("Gran Total (Moneda Original)".into(), CellValue::Number(total));
        r.insert("IVA (monto de este impuesto)".into(), CellValue::Number(tax));
        r
    }

    fn mapping() -> ColumnMapping {
        ColumnMapping {
            invoice_number: Some("Serie".into()),
            taxpayer_name: Some("Nombre del emisor".into()),
            currency: Some("Moneda".into()),
            total: Some("Gran Total (Moneda Original)".into()),
            tax: Some("IVA (monto de este impuesto)".into()),
            ..ColumnMapping::default()
        }
    }

    fn optimizer() -> InvoiceOptimizer {
        InvoiceOptimizer::new(&TaxConfig::default(), SelectionConfig::default())
    }

    #[test]
    fn test_usd_invoice_is_converted_and_scored() {
        let invoice = optimizer().build_invoice(3, &purchase("FACT", 83.33, 10.0, "USD"), &mapping(), 7.75);

        assert_eq!(invoice.currency, Currency::Usd);
        assert_eq!(invoice.tax_amount, 77.5);
        assert_eq!(invoice.document_type, DocumentType::Fact);
        assert_eq!(invoice.invoice_number, "FAC-001");
        assert_eq!(invoice.taxpayer_name, "Distribuidora S.A.");
        assert_eq!(invoice.row_index, 3);
        assert!(invoice.is_valid);
        assert!(invoice.efficiency_score > 0.9);
    }

    #[test]
    fn test_missing_identity_columns_fall_back_to_na() {
        let invoice = optimizer().build_invoice(0, &purchase("FACT", 100.0, 12.0, "GTQ"), &ColumnMapping::default(), 7.75);
        assert_eq!(invoice.invoice_number, "N/A");
        assert_eq!(invoice.taxpayer_name, "N/A");
        // 无币种列时按本位币
        assert_eq!(invoice.currency, Currency::Gtq);
        assert_eq!(invoice.tax_amount, 12.0);
    }

    #[test]
    fn test_invalid_rows_are_kept_but_never_selected() {
        let rows = vec![
            purchase("FACT", 1000.0, 120.0, "GTQ"),
            purchase("FACT", 500.0, 0.0, "GTQ"),
            purchase("NCRE", 250.0, 30.0, "GTQ"),
        ];
        let optimizer = optimizer();
        let candidates = optimizer.create_optimized_invoice_list(&rows, &mapping(), 7.75);
        assert_eq!(candidates.len(), 3);
        assert!(!candidates[1].is_valid);

        let result = optimizer.optimize_invoice_selection(&rows, 150.0, &mapping(), 7.75, SelectionStrategy::Greedy);
        assert!(result.selected_invoices.iter().all(|i| i.is_valid && i.tax_amount > 0.0));
        assert_eq!(result.achieved_tax_amount, 150.0);
        assert_eq!(result.coverage_percentage, 100.0);
    }
}
