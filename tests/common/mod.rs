#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use securecard::application::checkout::CheckoutService;
use securecard::config::ProcessorConfig;
use securecard::infrastructure::scripted::ScriptedProcessor;
use securecard::interfaces::http::views::Views;
use securecard::interfaces::http::{AppState, router};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

pub fn config(api_uri: &str) -> Arc<ProcessorConfig> {
    Arc::new(ProcessorConfig {
        api_uri: api_uri.to_string(),
        basic_token: "dXNlcjprZXk=".to_string(),
        ppc_id: "ppc-1".to_string(),
        threeds_contract_id: "3ds-contract-1".to_string(),
        key_alias: "KEY-ALIAS".to_string(),
        contract_currency: "ISK".to_string(),
        public_key: "PUBLIC-KEY".to_string(),
        verifone_js_url: "https://processor.test/verifone.js".to_string(),
        songbird_js_url: "https://processor.test/songbird.js".to_string(),
        amount: dec!(10),
    })
}

pub fn app(processor: ScriptedProcessor) -> Router {
    let checkout = CheckoutService::new(Box::new(processor), config("https://processor.test"));
    let views = Views::new().unwrap();
    router(AppState::new(checkout, views), "static")
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).unwrap()
    }
}

pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn lookup_body() -> Value {
    json!({
        "cardholder_name": "Jon Jonsson",
        "cardholder_email": "jon@example.is",
        "cardholder_address_1": "Laugavegur 1",
        "cardholder_locality": "Reykjavik",
        "cardholder_country": "IS",
        "device_info_id": "device-1",
        "encrypted_card": "ENCRYPTED-CARD",
        "merchant_reference": "order-1"
    })
}

pub fn secured_card_body() -> Value {
    json!({
        "cardholder_name": "Jon Jonsson",
        "cardholder_email": "jon@example.is",
        "cardholder_address_1": "Laugavegur 1",
        "cardholder_locality": "Reykjavik",
        "cardholder_country": "IS",
        "encrypted_card": "ENCRYPTED-CARD",
        "merchant_reference": "order-1",
        "eci_flag": "05",
        "enrolled": "Y",
        "cavv": "AAABBEg0VhI0VniQEjRWAAAAAAA=",
        "pares_status": "Y",
        "threeds_version": "2.2.0",
        "ds_transaction_id": "f25084f0-5b16-4c0a-ae5d-b24808a95e4b",
        "signature_verification": "Y",
        "error_desc": "",
        "error_no": "0"
    })
}
