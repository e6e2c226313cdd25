use crate::models::{DocumentType, OptimizedInvoice};

const TAX_RATIO_WEIGHT: f64 = 0.5;
const DOCUMENT_TYPE_WEIGHT: f64 = 0.3;
const SIZE_WEIGHT: f64 = 0.2;

/// 发票效率评分 [0, 1]
///
/// 税率贴近法定税率 (权重 0.5)、票据类型偏好 (0.3)、税额大小 (0.2)。
#[derive(Debug, Clone, Copy)]
pub struct EfficiencyScorer {
    statutory_rate: f64,
}

impl EfficiencyScorer {
    pub fn new(statutory_rate: f64) -> Self {
        Self { statutory_rate }
    }

    pub fn efficiency_score(&self, invoice: &OptimizedInvoice) -> f64 {
        self.tax_ratio_score(invoice.tax_ratio) * TAX_RATIO_WEIGHT
            + document_type_score(invoice.document_type) * DOCUMENT_TYPE_WEIGHT
            + size_score(invoice.tax_amount) * SIZE_WEIGHT
    }

    pub fn tax_ratio_score(&self, tax_ratio: f64) -> f64 {
        let difference = (tax_ratio - self.statutory_rate).abs();

        if difference <= 0.005 {
            1.0
        } else if difference <= 0.01 {
            0.8
        } else if difference <= 0.02 {
            0.6
        } else if difference <= 0.03 {
            0.4
        } else {
            0.2
        }
    }
}

impl Default for EfficiencyScorer {
    fn default() -> Self {
        Self::new(0.12)
    }
}

/// 贷记单是冲减，偏好最低
pub fn document_type_score(document_type: DocumentType) -> f64 {
    match document_type {
        DocumentType::Fact => 1.0,
        DocumentType::Ndeb => 0.8,
        DocumentType::Other => 0.6,
        DocumentType::Ncre => 0.3,
    }
}

pub fn size_score(tax_amount: f64) -> f64 {
    if tax_amount >= 100.0 {
        1.0
    } else if tax_amount >= 50.0 {
        0.8
    } else if tax_amount >= 20.0 {
        0.6
    } else if tax_amount >= 5.0 {
        0.4
    } else {
        0.2
    }
}
