use crate::models::{
    Currency, CurrencyBreakdown, DocumentType, DocumentTypeBreakdown,
    LedgerMappings, OptimizedInvoice,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 进项发票抵扣选择结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceOptimizationResult {
    pub target_tax_amount: f64,
    pub achieved_tax_amount: f64,
    /// 覆盖率，封顶 100
    pub coverage_percentage: f64,
    pub selected_invoices: Vec<OptimizedInvoice>,
    pub total_selected_invoices: usize,
    /// 未覆盖税额，下限 0
    pub remaining_tax_gap: f64,
}

impl InvoiceOptimizationResult {
    /// 由选中发票推导汇总字段
    pub fn from_selection(target_tax_amount: f64, selected_invoices: Vec<OptimizedInvoice>) -> Self {
        let achieved_tax_amount: f64 = selected_invoices.iter().map(|i| i.tax_amount).sum();

        let coverage_percentage = if target_tax_amount > 0.0 {
            (achieved_tax_amount / target_tax_amount * 100.0).min(100.0)
        } else {
            0.0
        };

        let remaining_tax_gap = (target_tax_amount - achieved_tax_amount).max(0.0);

        Self {
            target_tax_amount,
            achieved_tax_amount,
            coverage_percentage,
            total_selected_invoices: selected_invoices.len(),
            selected_invoices,
            remaining_tax_gap,
        }
    }

    /// 按票据类型分组选中发票
    pub fn invoices_by_document_type(&self) -> IndexMap<DocumentType, Vec<&OptimizedInvoice>> {
        let mut grouped: IndexMap<DocumentType, Vec<&OptimizedInvoice>> =
            DocumentType::ALL.iter().map(|t| (*t, Vec::new())).collect();

        for invoice in &self.selected_invoices {
            grouped.entry(invoice.document_type).or_default().push(invoice);
        }

        grouped
    }

    /// 选中发票的统计信息
    pub fn stats(&self) -> OptimizationStats {
        let invoices = &self.selected_invoices;
        let mut document_type_distribution: IndexMap<DocumentType, usize> =
            DocumentType::ALL.iter().map(|t| (*t, 0)).collect();
        let mut currency_distribution: IndexMap<Currency, usize> = IndexMap::new();

        if invoices.is_empty() {
            return OptimizationStats {
                average_invoice_amount: 0.0,
                average_tax_amount: 0.0,
                document_type_distribution,
                currency_distribution,
            };
        }

        let n = invoices.len() as f64;
        let average_invoice_amount = invoices.iter().map(|i| i.total_amount).sum::<f64>() / n;
        let average_tax_amount = invoices.iter().map(|i| i.tax_amount).sum::<f64>() / n;

        for invoice in invoices {
            *document_type_distribution.entry(invoice.document_type).or_insert(0) += 1;
            *currency_distribution.entry(invoice.currency).or_insert(0) += 1;
        }

        OptimizationStats {
            average_invoice_amount,
            average_tax_amount,
            document_type_distribution,
            currency_distribution,
        }
    }
}

/// 选择结果统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationStats {
    pub average_invoice_amount: f64,
    pub average_tax_amount: f64,
    pub document_type_distribution: IndexMap<DocumentType, usize>,
    pub currency_distribution: IndexMap<Currency, usize>,
}

/// 单本台账的明细汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedTaxSummary {
    pub invoice_count: usize,
    pub total_amount: f64,
    pub total_tax: f64,
    pub currency_breakdown: CurrencyBreakdown,
    pub document_breakdown: DocumentTypeBreakdown,
}

/// 销项 / 进项的币种拆分
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerBreakdowns {
    pub sales: CurrencyBreakdown,
    pub purchases: CurrencyBreakdown,
}

/// 税额计算最终结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxCalculationResult {
    pub total_sales: f64,
    pub total_purchases: f64,
    pub sales_tax: f64,
    pub purchases_tax: f64,
    /// 应纳税额 max(销项税 - 进项税, 0)
    pub tax_payable: f64,
    /// 留抵税额 max(进项税 - 销项税, 0)
    pub tax_credit: f64,
    pub detected_columns: LedgerMappings,
    pub exchange_rate: f64,
    pub base_currency: String,
    pub sales_summary: DetailedTaxSummary,
    pub purchases_summary: DetailedTaxSummary,
    pub invoice_optimization: InvoiceOptimizationResult,
    /// 总额列的币种拆分
    pub currency_breakdown: LedgerBreakdowns,
    /// 税额列的币种拆分
    pub tax_breakdown: LedgerBreakdowns,
}
