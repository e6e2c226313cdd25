use serde::{Deserialize, Serialize};

/// 本位币
pub const BASE_CURRENCY: &str = "GTQ";

/// 外币标记 (唯一支持的外币)
pub const FOREIGN_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Gtq,
}

impl Currency {
    /// 币种列文本大写后等于 USD 才算外币，其余一律按本位币
    pub fn from_cell_text(text: &str) -> Self {
        if text.to_uppercase() == FOREIGN_CURRENCY {
            Currency::Usd
        } else {
            Currency::Gtq
        }
    }

    /// 折算为本位币
    pub fn to_base(self, amount: f64, exchange_rate: f64) -> f64 {
        match self {
            Currency::Usd => amount * exchange_rate,
            Currency::Gtq => amount,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Currency::Usd => FOREIGN_CURRENCY,
            Currency::Gtq => BASE_CURRENCY,
        }
    }
}

/// 按列汇总结果
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColumnSum {
    /// 折算后本位币合计
    pub total: f64,
    pub usd_count: usize,
    pub gtq_count: usize,
    /// 未折算的美元合计
    pub original_usd_total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdBreakdown {
    pub count: usize,
    pub total: f64,
    pub original_total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GtqBreakdown {
    pub count: usize,
    pub total: f64,
}

/// 币种拆分
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyBreakdown {
    pub usd: UsdBreakdown,
    pub gtq: GtqBreakdown,
}

impl CurrencyBreakdown {
    pub fn from_column_sum(sum: &ColumnSum, exchange_rate: f64) -> Self {
        let usd_total = sum.original_usd_total * exchange_rate;
        Self {
            usd: UsdBreakdown {
                count: sum.usd_count,
                total: usd_total,
                original_total: sum.original_usd_total,
            },
            gtq: GtqBreakdown {
                count: sum.gtq_count,
                total: sum.total - usd_total,
            },
        }
    }
}
