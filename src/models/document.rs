use serde::{Deserialize, Serialize};

/// 危地马拉 SAT 电子票据 (DTE) 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentType {
    /// 普通发票
    Fact,
    /// 借记单
    Ndeb,
    /// 贷记单 (冲减)
    Ncre,
    Other,
}

impl DocumentType {
    pub const ALL: [DocumentType; 4] = [
        DocumentType::Fact,
        DocumentType::Ndeb,
        DocumentType::Ncre,
        DocumentType::Other,
    ];

    pub fn code(self) -> &'static str {
        match self {
            DocumentType::Fact => "FACT",
            DocumentType::Ndeb => "NDEB",
            DocumentType::Ncre => "NCRE",
            DocumentType::Other => "OTHER",
        }
    }
}

/// 单类票据合计 (金额、税额均已折算为本位币)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotals {
    pub count: usize,
    pub total_amount: f64,
    pub total_tax: f64,
}

/// 票据类型拆分：FACT 与 OTHER 合并为 regular
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTypeBreakdown {
    pub regular: CategoryTotals,
    pub debit_notes: CategoryTotals,
    pub credit_notes: CategoryTotals,
}
