pub mod column;
pub mod currency;
pub mod document;
pub mod invoice;
pub mod result;
pub mod row;

pub use column::{ColumnMapping, LedgerMappings};
pub use currency::{
    ColumnSum, Currency, CurrencyBreakdown, GtqBreakdown, UsdBreakdown, BASE_CURRENCY,
    FOREIGN_CURRENCY,
};
pub use document::{CategoryTotals, DocumentType, DocumentTypeBreakdown};
pub use invoice::OptimizedInvoice;
pub use result::{
    DetailedTaxSummary, InvoiceOptimizationResult, LedgerBreakdowns, OptimizationStats,
    TaxCalculationResult,
};
pub use row::{CellValue, Row, RowExt};
