use crate::error::TaxError;
use crate::models::{ColumnMapping, LedgerMappings, OptimizationStats, Row, TaxCalculationResult};
use crate::report;
use crate::service::{SelectionStrategy, TaxCalculator};
use axum::{
    extract::{Json, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 请求体: 已解析好的两本台账
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxCalculationRequest {
    pub sales: Vec<Row>,
    pub purchases: Vec<Row>,
    /// 不传时按表头自动识别
    #[serde(default)]
    pub column_mappings: Option<LedgerMappings>,
    #[serde(default)]
    pub exchange_rate: Option<f64>,
    #[serde(default)]
    pub strategy: SelectionStrategy,
}

/// 响应体
#[derive(Debug, Serialize)]
pub struct TaxCalculationResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<TaxCalculationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<OptimizationStats>,
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

/// 边界校验后在阻塞线程池里计算
pub async fn run_calculation(
    calculator: Arc<TaxCalculator>,
    req: TaxCalculationRequest,
) -> Result<TaxCalculationResult, TaxError> {
    calculator.check_ledgers(&req.sales, &req.purchases)?;
    let exchange_rate =
        calculator.check_exchange_rate(req.exchange_rate.unwrap_or(calculator.default_exchange_rate()))?;

    let mappings = req.column_mappings.unwrap_or_else(|| LedgerMappings {
        sales: ColumnMapping::detect_from_rows(&req.sales),
        purchases: ColumnMapping::detect_from_rows(&req.purchases),
    });
    tracing::debug!("Column mappings: {:?}", mappings);

    let strategy = req.strategy;
    let (sales, purchases) = (req.sales, req.purchases);

    tokio::task::spawn_blocking(move || {
        calculator.calculate_tax(&sales, &purchases, &mappings, Some(exchange_rate), strategy)
    })
    .await
    .map_err(|e| TaxError::Task(e.to_string()))
}

fn error_status(e: &TaxError) -> StatusCode {
    if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn error_response(e: TaxError) -> Response {
    tracing::warn!("Tax calculation rejected: {}", e);
    let response = TaxCalculationResponse {
        success: false,
        message: format!("Error: {}", e),
        data: None,
        stats: None,
    };
    (error_status(&e), Json(response)).into_response()
}

/// 计算税额并返回选中的进项发票
pub async fn calculate_tax(
    State(calculator): State<Arc<TaxCalculator>>,
    Json(req): Json<TaxCalculationRequest>,
) -> Response {
    match run_calculation(calculator, req).await {
        Ok(result) => {
            let optimization = &result.invoice_optimization;
            let stats = optimization.stats();
            let response = TaxCalculationResponse {
                success: true,
                message: format!(
                    "Selected {} of {} purchase invoices, coverage {:.2}%",
                    optimization.total_selected_invoices,
                    result.purchases_summary.invoice_count,
                    optimization.coverage_percentage
                ),
                data: Some(result),
                stats: Some(stats),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// 计算税额并以 CSV 返回选中的进项发票
pub async fn calculate_tax_csv(
    State(calculator): State<Arc<TaxCalculator>>,
    Json(req): Json<TaxCalculationRequest>,
) -> Response {
    let csv = run_calculation(calculator, req)
        .await
        .and_then(|result| report::selection_csv_string(&result.invoice_optimization));

    match csv {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
