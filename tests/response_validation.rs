//! Responses are checked against the contract before they leave the server.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

use xcom_api_validator::ContractDocument;

/// Declares a capabilities payload the handler can never produce.
const STRICT_CONTRACT: &str = r#"
openapi: 3.0.3
info: { title: strict, version: '1' }
paths:
  /capabilities:
    get:
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                type: object
                properties:
                  version: { type: integer }
                required: [version, extra]
  /trading/books/{id}:
    get:
      parameters:
        - name: id
          in: path
          schema: { type: string }
      responses:
        '200':
          description: declared without a schema
"#;

fn strict_app() -> TestApp {
    let config = config_with(Vec::new());
    let document = ContractDocument::parse(STRICT_CONTRACT).unwrap();
    let gateway = xcom_api_validator::Gateway::new(&config, &document).unwrap();
    TestApp {
        router: gateway.router(),
        ..TestApp::new()
    }
}

#[tokio::test]
async fn test_invalid_response_becomes_generic_500() {
    let app = strict_app();
    let (status, body) = app.get("/capabilities").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "message": "Unexpected server error", "errorType": "INTERNAL_ERROR" })
    );
}

#[tokio::test]
async fn test_status_without_schema_passes() {
    let app = strict_app();
    let (status, body) = app.get("/trading/books/ETH-USD").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "ETH-USD");
}

#[tokio::test]
async fn test_route_missing_from_contract_passes_through() {
    let app = strict_app();
    let (status, body) = app.get("/accounts/3/balances?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    // no contract operation, so no pagination guard either
    assert_eq!(body["balances"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_error_responses_are_validated_too() {
    // the shipped contract declares ErrorResponse for 404; a conforming body passes
    let app = TestApp::new();
    let (status, body) = app.get("/accounts/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "message": "Entity not found", "errorType": "NOT_FOUND" })
    );
}

#[tokio::test]
async fn test_every_read_endpoint_conforms() {
    let app = TestApp::new();
    for uri in [
        "/capabilities",
        "/accounts?balances=true",
        "/accounts/1?balances=true",
        "/accounts/5",
        "/accounts/2/balances",
        "/trading/books",
        "/trading/books/USDC-USD",
        "/trading/books/ETH-USD/asks",
        "/trading/books/ETH-USD/bids",
        "/accounts/1/trading/orders",
        "/accounts/1/liquidity/capabilities",
        "/accounts/1/liquidity/quotes",
    ] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::OK, "{}: {}", uri, body);
    }
}
