use crate::models::{Currency, DocumentType, Row};
use serde::{Deserialize, Serialize};

/// 候选进项发票 (金额、税额均已折算为本位币)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedInvoice {
    pub invoice_number: String,
    pub taxpayer_name: String,
    pub total_amount: f64,
    pub tax_amount: f64,
    pub currency: Currency,
    pub document_type: DocumentType,
    /// 税额 / 总额，总额 <= 0 时为 0
    pub tax_ratio: f64,
    pub efficiency_score: f64,
    /// 在进项台账中的行号
    pub row_index: usize,
    pub original_row: Row,
    pub is_valid: bool,
}

impl OptimizedInvoice {
    pub fn tax_ratio_of(total_amount: f64, tax_amount: f64) -> f64 {
        if total_amount > 0.0 {
            tax_amount / total_amount
        } else {
            0.0
        }
    }

    /// 能否参与抵扣选择
    pub fn is_selectable(&self) -> bool {
        self.is_valid && self.tax_amount > 0.0
    }
}
