use crate::config::{AppConfig, TaxConfig};
use crate::error::TaxError;
use crate::models::{
    ColumnMapping, ColumnSum, CurrencyBreakdown, DetailedTaxSummary, LedgerBreakdowns,
    LedgerMappings, Row, TaxCalculationResult, BASE_CURRENCY,
};
use crate::service::aggregator::sum_column_values;
use crate::service::classifier::DocumentClassifier;
use crate::service::optimizer::InvoiceOptimizer;
use crate::service::selection::SelectionStrategy;

/// 单本台账的汇总 (总额列、税额列各汇总一次)
#[derive(Debug, Clone)]
pub struct LedgerSummary {
    pub amount: ColumnSum,
    pub tax: ColumnSum,
    pub detail: DetailedTaxSummary,
}

/// 应纳税额
pub fn calculate_tax_payable(sales_tax: f64, purchases_tax: f64) -> f64 {
    (sales_tax - purchases_tax).max(0.0)
}

/// 留抵税额
pub fn calculate_tax_credit(sales_tax: f64, purchases_tax: f64) -> f64 {
    (purchases_tax - sales_tax).max(0.0)
}

/// 税额计算服务 (无状态，可在线程间共享)
#[derive(Debug, Clone)]
pub struct TaxCalculator {
    tax: TaxConfig,
    classifier: DocumentClassifier,
    optimizer: InvoiceOptimizer,
}

impl TaxCalculator {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            classifier: DocumentClassifier::new(config.tax.fields.document_type.clone()),
            optimizer: InvoiceOptimizer::new(&config.tax, config.selection),
            tax: config.tax.clone(),
        }
    }

    pub fn default_exchange_rate(&self) -> f64 {
        self.tax.default_exchange_rate
    }

    /// 边界校验：汇率必须为正且在配置区间内
    pub fn check_exchange_rate(&self, exchange_rate: f64) -> Result<f64, TaxError> {
        if exchange_rate.is_nan() || exchange_rate <= 0.0 {
            return Err(TaxError::InvalidExchangeRate(exchange_rate));
        }
        if exchange_rate < self.tax.min_exchange_rate || exchange_rate > self.tax.max_exchange_rate {
            return Err(TaxError::ExchangeRateOutOfRange {
                rate: exchange_rate,
                min: self.tax.min_exchange_rate,
                max: self.tax.max_exchange_rate,
            });
        }
        Ok(exchange_rate)
    }

    /// 边界校验：两本台账都不能为空
    pub fn check_ledgers(&self, sales: &[Row], purchases: &[Row]) -> Result<(), TaxError> {
        if sales.is_empty() {
            return Err(TaxError::EmptyLedger("Sales"));
        }
        if purchases.is_empty() {
            return Err(TaxError::EmptyLedger("Purchases"));
        }
        Ok(())
    }

    /// 单本台账汇总
    pub fn summarize_ledger(&self, rows: &[Row], mapping: &ColumnMapping, exchange_rate: f64) -> LedgerSummary {
        let currency_column = mapping.currency_column();
        let amount = sum_column_values(rows, mapping.total_column(), currency_column, exchange_rate);
        let tax = sum_column_values(rows, mapping.tax_column(), currency_column, exchange_rate);

        let detail = DetailedTaxSummary {
            invoice_count: rows.len(),
            total_amount: amount.total,
            total_tax: tax.total,
            currency_breakdown: CurrencyBreakdown::from_column_sum(&amount, exchange_rate),
            document_breakdown: self
                .classifier
                .document_type_breakdown(rows, mapping, exchange_rate),
        };

        LedgerSummary { amount, tax, detail }
    }

    /// 计算销项/进项合计、应纳/留抵税额，并以销项税为目标选择进项发票
    pub fn calculate_tax(
        &self,
        sales: &[Row],
        purchases: &[Row],
        mappings: &LedgerMappings,
        exchange_rate: Option<f64>,
        strategy: SelectionStrategy,
    ) -> TaxCalculationResult {
        let exchange_rate = exchange_rate.unwrap_or(self.tax.default_exchange_rate);

        tracing::info!(
            "开始计算: 销项 {} 行, 进项 {} 行, 汇率 {}",
            sales.len(),
            purchases.len(),
            exchange_rate
        );

        // 两本台账互不依赖，并行汇总
        let (sales_ledger, purchases_ledger) = rayon::join(
            || self.summarize_ledger(sales, &mappings.sales, exchange_rate),
            || self.summarize_ledger(purchases, &mappings.purchases, exchange_rate),
        );

        let sales_tax = sales_ledger.tax.total;
        let purchases_tax = purchases_ledger.tax.total;

        let invoice_optimization = self.optimizer.optimize_invoice_selection(
            purchases,
            sales_tax,
            &mappings.purchases,
            exchange_rate,
            strategy,
        );

        let tax_payable = calculate_tax_payable(sales_tax, purchases_tax);
        let tax_credit = calculate_tax_credit(sales_tax, purchases_tax);

        tracing::info!(
            "计算完成: 销项税 {:.2}, 进项税 {:.2}, 应纳 {:.2}, 留抵 {:.2}",
            sales_tax,
            purchases_tax,
            tax_payable,
            tax_credit
        );

        TaxCalculationResult {
            total_sales: sales_ledger.amount.total,
            total_purchases: purchases_ledger.amount.total,
            sales_tax,
            purchases_tax,
            tax_payable,
            tax_credit,
            detected_columns: mappings.clone(),
            exchange_rate,
            base_currency: BASE_CURRENCY.to_string(),
            currency_breakdown: LedgerBreakdowns {
                sales: CurrencyBreakdown::from_column_sum(&sales_ledger.amount, exchange_rate),
                purchases: CurrencyBreakdown::from_column_sum(&purchases_ledger.amount, exchange_rate),
            },
            tax_breakdown: LedgerBreakdowns {
                sales: CurrencyBreakdown::from_column_sum(&sales_ledger.tax, exchange_rate),
                purchases: CurrencyBreakdown::from_column_sum(&purchases_ledger.tax, exchange_rate),
            },
            sales_summary: sales_ledger.detail,
            purchases_summary: purchases_ledger.detail,
            invoice_optimization,
        }
    }
}

impl Default for TaxCalculator {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}
