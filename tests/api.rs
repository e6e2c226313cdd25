use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use vat_credit_optimizer::{api, TaxCalculator};

fn test_app() -> Router {
    api::router(Arc::new(TaxCalculator::default()))
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

fn ledgers() -> Value {
    json!({
        "sales": [
            { "Factura": "FV-1", "Cliente": "Comercial Quetzal", "Total": 1000, "IVA": 120 },
            { "Factura": "FV-2", "Cliente": "Comercial Quetzal", "Total": "500.00", "IVA": "60" }
        ],
        "purchases": [
            { "Factura": "FC-1", "Proveedor": "Agro Export", "Moneda": "GTQ", "Total": 1000, "IVA": 100 },
            { "Factura": "FC-2", "Proveedor": "Agro Export", "Moneda": "GTQ", "Total": "1,500.00", "IVA": "N/A" },
            { "Factura": "FC-3", "Proveedor": "Importadora Maya", "Moneda": "USD", "Total": 80, "IVA": 10 }
        ]
    })
}

#[tokio::test]
async fn health_returns_ok() {
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let resp = test_app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, b"OK");
}

#[tokio::test]
async fn calculate_detects_columns_and_selects_invoices() {
    let mut body = ledgers();
    body["exchangeRate"] = json!(7.75);

    let resp = test_app()
        .oneshot(post_json("/api/tax/calculate", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let result: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(result["success"], true);

    let data = &result["data"];
    assert_eq!(data["salesTax"], 180.0);
    assert_eq!(data["purchasesTax"], 177.5);
    assert_eq!(data["taxPayable"], 2.5);
    assert_eq!(data["taxCredit"], 0.0);
    assert_eq!(data["baseCurrency"], "GTQ");
    assert_eq!(data["detectedColumns"]["purchases"]["currency"], "Moneda");
    assert_eq!(data["detectedColumns"]["sales"]["taxpayerName"], "Cliente");
    assert_eq!(data["detectedColumns"]["sales"]["date"], Value::Null);

    let optimization = &data["invoiceOptimization"];
    assert_eq!(optimization["totalSelectedInvoices"], 2);
    assert_eq!(optimization["achievedTaxAmount"], 177.5);
    assert_eq!(optimization["remainingTaxGap"], 2.5);

    let numbers: Vec<&str> = optimization["selectedInvoices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["invoiceNumber"].as_str().unwrap())
        .collect();
    assert!(numbers.contains(&"FC-1"));
    assert!(numbers.contains(&"FC-3"));

    assert_eq!(result["stats"]["currencyDistribution"]["USD"], 1);
    assert_eq!(result["stats"]["documentTypeDistribution"]["OTHER"], 2);
}

#[tokio::test]
async fn explicit_mappings_and_exact_strategy() {
    let mut body = ledgers();
    body["strategy"] = json!("exact");
    body["columnMappings"] = json!({
        "sales": { "total": "Total", "tax": "IVA" },
        "purchases": { "total": "Total", "tax": "IVA", "invoiceNumber": "Factura" }
    });

    let resp = test_app()
        .oneshot(post_json("/api/tax/calculate", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let result: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    let data = &result["data"];
    // 未给币种列，USD 行按本位币计
    assert_eq!(data["purchasesTax"], 110.0);
    assert_eq!(data["exchangeRate"], 7.75);
    assert_eq!(data["invoiceOptimization"]["achievedTaxAmount"], 110.0);
    assert_eq!(data["invoiceOptimization"]["selectedInvoices"][0]["currency"], "GTQ");
}

#[tokio::test]
async fn empty_sales_ledger_is_rejected() {
    let mut body = ledgers();
    body["sales"] = json!([]);

    let resp = test_app()
        .oneshot(post_json("/api/tax/calculate", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let result: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(result["success"], false);
    assert!(result["message"].as_str().unwrap().contains("Sales"));
    assert!(result.get("data").is_none());
}

#[tokio::test]
async fn out_of_range_exchange_rate_is_rejected() {
    for rate in [0.0, -3.0, 0.5, 20.0] {
        let mut body = ledgers();
        body["exchangeRate"] = json!(rate);

        let resp = test_app()
            .oneshot(post_json("/api/tax/calculate", &body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "rate {}", rate);
    }
}

#[tokio::test]
async fn csv_endpoint_returns_selected_rows() {
    let resp = test_app()
        .oneshot(post_json("/api/tax/calculate/csv", &ledgers()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );

    let text = String::from_utf8(body_bytes(resp).await).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "row_index,invoice_number,taxpayer_name,document_type,currency,total_amount,tax_amount,tax_ratio,efficiency_score"
    );
    assert_eq!(lines.len(), 3);
    assert!(text.contains("2,FC-3,Importadora Maya,OTHER,USD,620.00,77.50,0.1250,"));
}
