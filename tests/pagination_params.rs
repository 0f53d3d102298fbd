//! Pagination guard and cursor slicing on every paginated endpoint.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::{Value, json};

fn ids(body: &Value, field: &str) -> Vec<String> {
    body[field]
        .as_array()
        .unwrap_or_else(|| panic!("no {} in {}", field, body))
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_limit_out_of_range_everywhere() {
    let app = TestApp::new();
    for path in PAGINATED {
        for limit in ["-1", "0", "201", "abc", "1.5"] {
            let (status, body) = app.get(&format!("{}?limit={}", path, limit)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{} limit={}", path, limit);
            assert_error(&body, "SCHEMA_PROPERTY_ERROR", Some("QUERYSTRING"));
            assert_eq!(body["propertyName"], "/limit", "{} limit={}", path, limit);
        }
    }
}

#[tokio::test]
async fn test_limit_bounds_accepted_everywhere() {
    let app = TestApp::new();
    for path in PAGINATED {
        for limit in ["1", "200"] {
            let (status, body) = app.get(&format!("{}?limit={}", path, limit)).await;
            assert_eq!(status, StatusCode::OK, "{} limit={}: {}", path, limit, body);
        }
    }
}

#[tokio::test]
async fn test_both_cursors_rejected_everywhere() {
    let app = TestApp::new();
    for path in PAGINATED {
        let (status, body) = app
            .get(&format!("{}?startingAfter=1&endingBefore=2", path))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", path);
        assert_error(&body, "SCHEMA_ERROR", Some("QUERYSTRING"));
        assert!(body.get("propertyName").is_none(), "{}: {}", path, body);
    }
}

#[tokio::test]
async fn test_range_checked_before_exclusivity() {
    let app = TestApp::new();
    let (status, body) = app
        .get("/accounts?limit=0&startingAfter=1&endingBefore=2")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["propertyName"], "/limit");
}

#[tokio::test]
async fn test_default_limit_is_ten() {
    let app = TestApp::new();
    // the capability list is shorter than the default
    let (status, body) = app.get("/accounts/1/liquidity/capabilities").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body, "capabilities").len(), 7);

    let (_, body) = app.get("/accounts/1/liquidity/capabilities?limit=3").await;
    assert_eq!(ids(&body, "capabilities"), ["1", "2", "3"]);
}

#[tokio::test]
async fn test_starting_after_and_ending_before() {
    let app = TestApp::new();
    let (_, body) = app.get("/accounts?startingAfter=2&limit=2").await;
    assert_eq!(ids(&body, "accounts"), ["3", "4"]);

    let (_, body) = app.get("/accounts?endingBefore=4&limit=2").await;
    assert_eq!(ids(&body, "accounts"), ["2", "3"]);

    let (_, body) = app.get("/accounts?endingBefore=2&limit=5").await;
    assert_eq!(ids(&body, "accounts"), ["1"]);

    let (_, body) = app.get("/accounts?startingAfter=5").await;
    assert!(ids(&body, "accounts").is_empty());
}

#[tokio::test]
async fn test_unknown_cursor_is_empty_page() {
    let app = TestApp::new();
    let (status, body) = app.get("/trading/books?startingAfter=DOGE-USD").await;
    assert_eq!(status, StatusCode::OK);
    assert!(ids(&body, "books").is_empty());
}

#[tokio::test]
async fn test_market_side_order_and_paging() {
    let app = TestApp::new();
    let (_, body) = app.get("/trading/books/BTC-USD/asks?limit=2").await;
    assert_eq!(ids(&body, "asks"), ["BTC-USD-ask-1", "BTC-USD-ask-2"]);
    assert_eq!(body["asks"][0]["price"], "60600.00");

    let (_, body) = app
        .get("/trading/books/BTC-USD/bids?startingAfter=BTC-USD-bid-4")
        .await;
    assert_eq!(ids(&body, "bids"), ["BTC-USD-bid-5"]);
}

#[tokio::test]
async fn test_orders_page_newest_first() {
    let app = TestApp::new();
    let mut placed = Vec::new();
    for key in ["k1", "k2", "k3"] {
        let order = json!({
            "idempotencyKey": key,
            "bookId": "ETH-USD",
            "side": "BUY",
            "orderType": "LIMIT",
            "timeInForce": "GOOD_TILL_CANCELED",
            "baseAssetQuantity": "1",
            "price": "2900"
        });
        let (status, body) = app.post("/accounts/2/trading/orders", &order).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        placed.push(body["id"].as_str().unwrap().to_string());
    }

    let (_, body) = app.get("/accounts/2/trading/orders?limit=2").await;
    assert_eq!(ids(&body, "orders"), [placed[2].clone(), placed[1].clone()]);

    let (_, body) = app
        .get(&format!("/accounts/2/trading/orders?startingAfter={}", placed[1]))
        .await;
    assert_eq!(ids(&body, "orders"), [placed[0].clone()]);
}

#[tokio::test]
async fn test_non_paginated_endpoint_ignores_cursors() {
    let app = TestApp::new();
    // book details declare no pagination parameters
    let (status, body) = app
        .get("/trading/books/BTC-USD?startingAfter=1&endingBefore=2")
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["id"], "BTC-USD");
}
