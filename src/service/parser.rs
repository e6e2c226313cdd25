use crate::models::CellValue;

/// 单元格转金额
///
/// 数字原样返回；文本去掉千分位逗号和空白后按最长合法前缀解析；
/// 其余情况 (空、布尔、日期、无法解析的文本) 一律为 0，不报错。
pub fn parse_numeric_value(value: Option<&CellValue>) -> f64 {
    match value {
        Some(CellValue::Number(n)) => *n,
        Some(CellValue::Text(s)) => parse_amount_text(s),
        _ => 0.0,
    }
}

/// 文本金额解析，如 "1,234.50" -> 1234.5, "N/A" -> 0
pub fn parse_amount_text(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    leading_float(&cleaned).unwrap_or(0.0)
}

/// 取字符串开头的浮点字面量 ("12abc" -> 12, "1e3" -> 1000)
fn leading_float(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let negative = bytes.first() == Some(&b'-');

    if s[end..].starts_with("Infinity") {
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < len && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < len && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}
