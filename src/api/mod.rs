pub mod handlers;

pub use handlers::*;

use crate::service::TaxCalculator;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// 构建路由
pub fn router(calculator: Arc<TaxCalculator>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/tax/calculate", post(calculate_tax))
        .route("/api/tax/calculate/csv", post(calculate_tax_csv))
        .with_state(calculator)
}
