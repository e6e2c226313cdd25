use crate::models::{CategoryTotals, ColumnMapping, DocumentType, DocumentTypeBreakdown, Row, RowExt};
use crate::service::aggregator::row_currency;
use crate::service::parser::parse_numeric_value;
use indexmap::IndexMap;

/// 按 DTE 类型列分类票据
#[derive(Debug, Clone)]
pub struct DocumentClassifier {
    document_type_field: String,
}

impl DocumentClassifier {
    pub fn new(document_type_field: impl Into<String>) -> Self {
        Self {
            document_type_field: document_type_field.into(),
        }
    }

    /// 子串匹配，优先级固定 NDEB -> NCRE -> FACT -> OTHER
    pub fn classify_document(&self, row: &Row) -> DocumentType {
        let doc_type = row
            .text(Some(self.document_type_field.as_str()))
            .trim()
            .to_uppercase();

        if doc_type.contains("NDEB") {
            DocumentType::Ndeb
        } else if doc_type.contains("NCRE") {
            DocumentType::Ncre
        } else if doc_type.contains("FACT") {
            DocumentType::Fact
        } else {
            DocumentType::Other
        }
    }

    /// 按类型分组，组内保持原有行序
    pub fn classify_documents<'a>(&self, rows: &'a [Row]) -> IndexMap<DocumentType, Vec<&'a Row>> {
        let mut classified: IndexMap<DocumentType, Vec<&'a Row>> = IndexMap::new();
        for row in rows {
            classified
                .entry(self.classify_document(row))
                .or_default()
                .push(row);
        }
        classified
    }

    /// 票据类型拆分，FACT 与 OTHER 合并为 regular
    pub fn document_type_breakdown(
        &self,
        rows: &[Row],
        mapping: &ColumnMapping,
        exchange_rate: f64,
    ) -> DocumentTypeBreakdown {
        let classified = self.classify_documents(rows);

        let regular: Vec<&Row> = group(&classified, DocumentType::Fact)
            .iter()
            .chain(group(&classified, DocumentType::Other))
            .copied()
            .collect();

        DocumentTypeBreakdown {
            regular: category_totals(&regular, mapping, exchange_rate),
            debit_notes: category_totals(group(&classified, DocumentType::Ndeb), mapping, exchange_rate),
            credit_notes: category_totals(group(&classified, DocumentType::Ncre), mapping, exchange_rate),
        }
    }
}

fn group<'m, 'a>(classified: &'m IndexMap<DocumentType, Vec<&'a Row>>, doc_type: DocumentType) -> &'m [&'a Row] {
    classified.get(&doc_type).map(Vec::as_slice).unwrap_or_default()
}

/// 单类票据的金额、税额合计 (折算为本位币)
pub fn category_totals(documents: &[&Row], mapping: &ColumnMapping, exchange_rate: f64) -> CategoryTotals {
    let mut totals = CategoryTotals {
        count: documents.len(),
        ..CategoryTotals::default()
    };

    for doc in documents {
        let currency = row_currency(doc, mapping.currency_column());
        let amount = parse_numeric_value(doc.cell(mapping.total_column()));
        let tax = parse_numeric_value(doc.cell(mapping.tax_column()));

        totals.total_amount += currency.to_base(amount, exchange_rate);
        totals.total_tax += currency.to_base(tax, exchange_rate);
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;

    const FIELD: &str = "Tipo de DTE (nombre)";

    fn doc(kind: &str, total: f64, tax: f64, currency: &str) -> Row {
        let mut r = Row::new();
        r.insert(FIELD.into(), CellValue::Text(kind.into()));
        r.insert("Total".into(), CellValue::Number(total));
        r.insert("IVA".into(), CellValue::Number(tax));
        r.insert("Moneda".into(), CellValue::Text(currency.into()));
        r
    }

    fn mapping() -> ColumnMapping {
        ColumnMapping {
            total: Some("Total".into()),
            tax: Some("IVA".into()),
            currency: Some("Moneda".into()),
            ..ColumnMapping::default()
        }
    }

    #[test]
    fn test_priority_order_not_position() {
        let classifier = DocumentClassifier::new(FIELD);
        assert_eq!(classifier.classify_document(&doc("FACT / NDEB", 0.0, 0.0, "")), DocumentType::Ndeb);
        assert_eq!(classifier.classify_document(&doc("fact ncre", 0.0, 0.0, "")), DocumentType::Ncre);
        assert_eq!(classifier.classify_document(&doc("  Factura ", 0.0, 0.0, "")), DocumentType::Fact);
        assert_eq!(classifier.classify_document(&doc("RECI", 0.0, 0.0, "")), DocumentType::Other);
        assert_eq!(classifier.classify_document(&Row::new()), DocumentType::Other);
    }

    #[test]
    fn test_classification_is_stable() {
        let classifier = DocumentClassifier::new(FIELD);
        let row = doc("NDEB", 1.0, 1.0, "GTQ");
        assert_eq!(classifier.classify_document(&row), classifier.classify_document(&row));
    }

    #[test]
    fn test_grouping_keeps_row_order() {
        let classifier = DocumentClassifier::new(FIELD);
        let rows = vec![
            doc("FACT", 1.0, 0.0, ""),
            doc("NCRE", 2.0, 0.0, ""),
            doc("FACT", 3.0, 0.0, ""),
        ];
        let grouped = classifier.classify_documents(&rows);
        let facts: Vec<_> = grouped[&DocumentType::Fact]
            .iter()
            .map(|r| r["Total"].clone())
            .collect();
        assert_eq!(facts, vec![CellValue::Number(1.0), CellValue::Number(3.0)]);
        assert_eq!(grouped[&DocumentType::Ncre].len(), 1);
        assert!(!grouped.contains_key(&DocumentType::Ndeb));
    }

    #[test]
    fn test_breakdown_merges_fact_and_other() {
        let classifier = DocumentClassifier::new(FIELD);
        let rows = vec![
            doc("FACT", 1000.0, 120.0, "GTQ"),
            doc("RECI", 100.0, 0.0, "GTQ"),
            doc("NDEB", 10.0, 1.2, "USD"),
            doc("NCRE", 50.0, 6.0, "GTQ"),
        ];
        let breakdown = classifier.document_type_breakdown(&rows, &mapping(), 7.75);

        assert_eq!(breakdown.regular.count, 2);
        assert_eq!(breakdown.regular.total_amount, 1100.0);
        assert_eq!(breakdown.regular.total_tax, 120.0);
        assert_eq!(breakdown.debit_notes.count, 1);
        assert_eq!(breakdown.debit_notes.total_amount, 77.5);
        assert_eq!(breakdown.credit_notes.total_tax, 6.0);
    }
}
