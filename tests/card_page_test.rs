mod common;

use axum::http::StatusCode;
use axum::http::header::{CONTENT_TYPE, LOCATION};
use common::{app, get, post_json, send};
use securecard::error::TokenError;
use securecard::infrastructure::scripted::ScriptedProcessor;

#[tokio::test]
async fn test_root_redirects_permanently() {
    let response = send(app(ScriptedProcessor::new()), get("/")).await;

    assert_eq!(response.status, StatusCode::PERMANENT_REDIRECT);
    assert_eq!(
        response.headers[LOCATION],
        "/Payment/Card?DefaultCardholderCountry=IS"
    );
}

#[tokio::test]
async fn test_card_page_renders_form() {
    let processor = ScriptedProcessor::new().with_token(Ok("jwt-abc".to_string()));
    let response = send(
        app(processor),
        get("/Payment/Card?DefaultCardholderCountry=DK"),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(
        response.headers[CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let html = response.text();
    assert!(html.contains(r#"data-threeds-jwt="jwt-abc""#));
    assert!(html.contains(r#"data-public-key="PUBLIC-KEY""#));
    assert!(html.contains(r#"value="DK""#));
    assert!(html.contains("verifone.js"));
    assert!(html.contains("songbird.js"));
}

#[tokio::test]
async fn test_card_page_defaults_country() {
    let response = send(app(ScriptedProcessor::new()), get("/Payment/Card")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text().contains(r#"value="IS""#));
}

#[tokio::test]
async fn test_card_page_token_failures() {
    let cases = [
        (TokenError::Request, "requesting a 3-D Secure JWT"),
        (TokenError::Response, "parsing the response JSON"),
        (TokenError::BodyParse, "parsing the response payload"),
    ];

    for (kind, message) in cases {
        let processor = ScriptedProcessor::new().with_token(Err(kind));
        let response = send(app(processor), get("/Payment/Card")).await;

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR, "{kind:?}");
        let html = response.text();
        assert!(html.contains("No3DSecureJWT"), "{kind:?}");
        assert!(html.contains(message), "{kind:?}");
    }
}

#[tokio::test]
async fn test_unknown_route_is_structured_not_found() {
    let response = send(app(ScriptedProcessor::new()), get("/Payment/Refund")).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.headers[CONTENT_TYPE], "application/xml");
    let body = response.text();
    assert!(body.contains(r#"data-code="NoCorrespondingController""#));
    assert!(body.contains("No controller matched the route you requested."));
}

#[tokio::test]
async fn test_wrong_method_is_not_found() {
    let response = send(
        app(ScriptedProcessor::new()),
        get("/Payment/3DSecureLookup"),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.text().contains("NoCorrespondingController"));
}

#[tokio::test]
async fn test_static_assets_are_served() {
    let response = send(
        app(ScriptedProcessor::new()),
        get("/public/static/css/checkout.css"),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text().contains(".checkout__form"));
}

#[tokio::test]
async fn test_missing_static_asset_is_structured_not_found() {
    let response = send(
        app(ScriptedProcessor::new()),
        get("/public/static/js/missing.js"),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.headers[CONTENT_TYPE], "application/xml");
    let body = response.text();
    assert!(body.contains(r#"data-code="NoCorrespondingController""#));
    assert!(body.contains("/public/static/js/missing.js"));
}

#[tokio::test]
async fn test_static_asset_wrong_method_is_not_found() {
    let response = send(
        app(ScriptedProcessor::new()),
        post_json("/public/static/css/checkout.css", &serde_json::json!({})),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.text().contains("NoCorrespondingController"));
}

#[tokio::test]
async fn test_no_powered_by_header() {
    let response = send(app(ScriptedProcessor::new()), get("/Payment/Card")).await;
    assert!(response.headers.get("x-powered-by").is_none());
}
