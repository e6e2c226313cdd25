use crate::models::Row;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// 列映射：每个业务字段对应的表头名 (未识别时为 None)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnMapping {
    pub date: Option<String>,
    pub taxpayer_number: Option<String>,
    pub taxpayer_name: Option<String>,
    pub total: Option<String>,
    pub tax: Option<String>,
    pub invoice_number: Option<String>,
    pub currency: Option<String>,
}

/// 销项、进项两套列映射
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerMappings {
    pub sales: ColumnMapping,
    pub purchases: ColumnMapping,
}

#[derive(Debug, Clone, Copy)]
enum Role {
    Date,
    TaxpayerNumber,
    TaxpayerName,
    Total,
    Tax,
    InvoiceNumber,
    Currency,
}

fn patterns() -> &'static [(Role, Regex)] {
    static PATTERNS: OnceLock<Vec<(Role, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (Role::Date, r"(?i)fecha|date|fch"),
            (Role::TaxpayerNumber, r"(?i)nit|ruc|identificacion|taxpayer"),
            (Role::TaxpayerName, r"(?i)nombre|razon|client|proveedor|empresa|name|company"),
            (Role::Total, r"(?i)total|monto|importe|valor|amount"),
            (Role::Tax, r"(?i)iva|impuesto|tax"),
            (Role::InvoiceNumber, r"(?i)serie|correlativo|numero|factura|invoice"),
            (Role::Currency, r"(?i)moneda|currency|divisa"),
        ]
        .into_iter()
        .map(|(role, p)| (role, Regex::new(p).expect("static column pattern")))
        .collect()
    })
}

impl ColumnMapping {
    /// 按表头名模式识别列 (每个字段取第一个匹配的表头)
    pub fn detect<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut mapping = ColumnMapping::default();

        for (role, re) in patterns() {
            let found = headers
                .iter()
                .map(AsRef::as_ref)
                .find(|h| re.is_match(h))
                .map(str::to_string);

            let slot = match role {
                Role::Date => &mut mapping.date,
                Role::TaxpayerNumber => &mut mapping.taxpayer_number,
                Role::TaxpayerName => &mut mapping.taxpayer_name,
                Role::Total => &mut mapping.total,
                Role::Tax => &mut mapping.tax,
                Role::InvoiceNumber => &mut mapping.invoice_number,
                Role::Currency => &mut mapping.currency,
            };
            *slot = found;
        }

        mapping
    }

    /// 以首行的列名做识别，空台账返回全空映射
    pub fn detect_from_rows(rows: &[Row]) -> Self {
        match rows.first() {
            Some(first) => {
                let headers: Vec<&str> = first.keys().map(String::as_str).collect();
                Self::detect(&headers)
            }
            None => Self::default(),
        }
    }

    pub fn total_column(&self) -> Option<&str> {
        self.total.as_deref()
    }

    pub fn tax_column(&self) -> Option<&str> {
        self.tax.as_deref()
    }

    pub fn currency_column(&self) -> Option<&str> {
        self.currency.as_deref()
    }
}
