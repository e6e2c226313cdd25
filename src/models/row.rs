use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 单元格值 (数字 / 文本 / 布尔 / 日期 / 空)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Date(NaiveDateTime),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// 非空、非零、非空字符串视为"有值"
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Null => false,
            CellValue::Bool(b) => *b,
            CellValue::Number(n) => *n != 0.0 && !n.is_nan(),
            CellValue::Date(_) => true,
            CellValue::Text(s) => !s.is_empty(),
        }
    }

    /// 文本表示 (整数金额不带小数点)
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            CellValue::Date(d) => d.format("%Y-%m-%d %H:%M:%S").to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// 一行台账数据：列名 -> 单元格 (保持表头顺序)
pub type Row = IndexMap<String, CellValue>;

/// 按可选列名取值
pub trait RowExt {
    fn cell(&self, column: Option<&str>) -> Option<&CellValue>;

    /// 列不存在时返回空字符串
    fn text(&self, column: Option<&str>) -> String {
        self.cell(column).map(CellValue::to_text).unwrap_or_default()
    }
}

impl RowExt for Row {
    fn cell(&self, column: Option<&str>) -> Option<&CellValue> {
        column.and_then(|c| self.get(c))
    }
}
