use crate::models::{ColumnSum, Currency, Row, RowExt};
use crate::service::parser::parse_numeric_value;

/// 行币种：无币种列时一律视为本位币
pub fn row_currency(row: &Row, currency_column: Option<&str>) -> Currency {
    match currency_column {
        Some(_) => Currency::from_cell_text(&row.text(currency_column)),
        None => Currency::Gtq,
    }
}

/// 对某一列求和，USD 行按汇率折算为 GTQ，同时统计各币种行数
///
/// 列未识别 (None) 时返回全零结果。
pub fn sum_column_values(
    rows: &[Row],
    column: Option<&str>,
    currency_column: Option<&str>,
    exchange_rate: f64,
) -> ColumnSum {
    let mut sum = ColumnSum::default();
    if column.is_none() {
        return sum;
    }

    for row in rows {
        let value = parse_numeric_value(row.cell(column));

        match row_currency(row, currency_column) {
            Currency::Usd => {
                sum.total += value * exchange_rate;
                sum.original_usd_total += value;
                sum.usd_count += 1;
            }
            Currency::Gtq => {
                sum.total += value;
                sum.gtq_count += 1;
            }
        }
    }

    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;

    fn row(amount: CellValue, currency: &str) -> Row {
        let mut r = Row::new();
        r.insert("Monto".into(), amount);
        r.insert("Moneda".into(), CellValue::Text(currency.into()));
        r
    }

    #[test]
    fn test_usd_rows_are_converted() {
        let rows = vec![
            row(CellValue::Number(100.0), "GTQ"),
            row(CellValue::Number(10.0), "usd"),
            row(CellValue::Text("1,000".into()), "GTQ"),
        ];
        let sum = sum_column_values(&rows, Some("Monto"), Some("Moneda"), 7.75);

        assert_eq!(sum.total, 1177.5);
        assert_eq!(sum.usd_count, 1);
        assert_eq!(sum.gtq_count, 2);
        assert_eq!(sum.original_usd_total, 10.0);
    }

    #[test]
    fn test_missing_column_is_empty_result() {
        let rows = vec![row(CellValue::Number(100.0), "USD")];
        let sum = sum_column_values(&rows, None, Some("Moneda"), 7.75);
        assert_eq!(sum, ColumnSum::default());
    }

    #[test]
    fn test_without_currency_column_everything_is_base() {
        let rows = vec![
            row(CellValue::Number(100.0), "USD"),
            row(CellValue::Number(50.0), "USD"),
        ];
        let sum = sum_column_values(&rows, Some("Monto"), None, 7.75);
        assert_eq!(sum.total, 150.0);
        assert_eq!(sum.usd_count, 0);
        assert_eq!(sum.gtq_count, 2);
    }

    #[test]
    fn test_unparseable_cells_count_as_zero() {
        let rows = vec![
            row(CellValue::Text("N/A".into()), "GTQ"),
            row(CellValue::Number(25.0), "GTQ"),
        ];
        let sum = sum_column_values(&rows, Some("Monto"), Some("Moneda"), 7.75);
        assert_eq!(sum.total, 25.0);
        assert_eq!(sum.gtq_count, 2);
    }
}
