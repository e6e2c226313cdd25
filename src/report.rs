use crate::error::TaxError;
use crate::models::InvoiceOptimizationResult;
use std::io::Write;
use std::path::Path;

const HEADER: [&str; 9] = [
    "row_index",
    "invoice_number",
    "taxpayer_name",
    "document_type",
    "currency",
    "total_amount",
    "tax_amount",
    "tax_ratio",
    "efficiency_score",
];

/// 将选中发票写成 CSV (金额为本位币，保留两位小数)
pub fn write_selection_csv<W: Write>(
    result: &InvoiceOptimizationResult,
    output: W,
) -> Result<(), TaxError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(HEADER)?;

    for invoice in &result.selected_invoices {
        writer.write_record(&[
            invoice.row_index.to_string(),
            invoice.invoice_number.clone(),
            invoice.taxpayer_name.clone(),
            invoice.document_type.code().to_string(),
            invoice.currency.as_str().to_string(),
            format!("{:.2}", invoice.total_amount),
            format!("{:.2}", invoice.tax_amount),
            format!("{:.4}", invoice.tax_ratio),
            format!("{:.2}", invoice.efficiency_score),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// 导出到文件
pub fn export_selection_to_csv(
    result: &InvoiceOptimizationResult,
    output_path: &Path,
) -> Result<(), TaxError> {
    let file = std::fs::File::create(output_path)?;
    write_selection_csv(result, file)?;
    tracing::info!(
        "已导出 {} 张选中发票到 {}",
        result.total_selected_invoices,
        output_path.display()
    );
    Ok(())
}

/// 导出为字符串 (HTTP 响应用)
pub fn selection_csv_string(result: &InvoiceOptimizationResult) -> Result<String, TaxError> {
    let mut buffer = Vec::new();
    write_selection_csv(result, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
