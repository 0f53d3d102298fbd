//! Shared helpers for the end-to-end tests: a gateway built from the shipped
//! contract and a signing client driving it through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use xcom_api_validator::api_auth::{ApiCredential, RequestSigner, now_ms};
use xcom_api_validator::config::{AppConfig, CredentialConfig};
use xcom_api_validator::signing::{
    DigestAlgorithm, SignatureEncoding, SigningAlgorithmSpec, SigningFamily,
};
use xcom_api_validator::{ContractDocument, Gateway};

pub const CONTRACT: &str = "contract/openapi.yaml";
pub const SECRET: &str = "test-secret";

pub const PAGINATED: [&str; 8] = [
    "/accounts",
    "/accounts/1/balances",
    "/trading/books",
    "/trading/books/BTC-USD/asks",
    "/trading/books/BTC-USD/bids",
    "/accounts/1/trading/orders",
    "/accounts/1/liquidity/capabilities",
    "/accounts/1/liquidity/quotes",
];

pub fn hmac_spec() -> SigningAlgorithmSpec {
    SigningAlgorithmSpec::new(SigningFamily::Hmac, DigestAlgorithm::Sha256)
}

/// Config with an HMAC default credential plus any extra per-key ones.
pub fn config_with(credentials: Vec<CredentialConfig>) -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.default_credential = Some(ApiCredential {
        algorithm: hmac_spec(),
        key: SECRET.to_string(),
        encoding: SignatureEncoding::Base64,
    });
    config.auth.credentials = credentials;
    config
}

pub fn gateway(config: &AppConfig) -> Gateway {
    let document = ContractDocument::load(CONTRACT).unwrap();
    Gateway::new(config, &document).unwrap()
}

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

/// A gateway plus a client signing with its default credential.
pub struct TestApp {
    pub router: Router,
    pub signer: RequestSigner,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(config_with(Vec::new()))
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self {
            router: gateway(&config).router(),
            signer: RequestSigner::new("tester", SECRET, hmac_spec(), SignatureEncoding::Base64),
        }
    }

    pub fn with_signer(mut self, signer: RequestSigner) -> Self {
        self.signer = signer;
        self
    }

    pub fn signed_request(&self, method: Method, uri: &str, body: Option<&Value>) -> Request<Body> {
        let bytes = body.map(|b| b.to_string().into_bytes()).unwrap_or_default();
        let headers = self
            .signer
            .sign(&method, uri, &bytes, now_ms())
            .unwrap()
            .to_header_map()
            .unwrap();
        raw_request(method, uri, headers, bytes, body.is_some())
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        send(&self.router, request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(self.signed_request(Method::GET, uri, None)).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send(self.signed_request(Method::POST, uri, Some(body)))
            .await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(self.signed_request(Method::DELETE, uri, None))
            .await
    }
}

pub fn raw_request(
    method: Method,
    uri: &str,
    headers: HeaderMap,
    body: Vec<u8>,
    json: bool,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers.iter() {
        builder = builder.header(name, value);
    }
    if json {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    builder.body(Body::from(body)).unwrap()
}

/// Send a request; empty bodies come back as `Value::Null`.
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn assert_error(body: &Value, error_type: &str, part: Option<&str>) {
    assert_eq!(body["errorType"], error_type, "body: {}", body);
    match part {
        Some(part) => assert_eq!(body["requestPart"], part, "body: {}", body),
        None => assert!(body.get("requestPart").is_none(), "body: {}", body),
    }
    assert!(body["message"].is_string());
}
