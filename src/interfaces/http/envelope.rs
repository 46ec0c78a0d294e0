use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// The `{code, message, pathname}` triple carried by every JSON answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub code: &'static str,
    pub message: String,
    pub pathname: String,
}

/// JSON answer: `{"error": {...}}` or `{"success": {...}, "data": {...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<D = ()> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<Notice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Notice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<D>,
}

impl Envelope {
    pub fn success(code: &'static str, message: impl Into<String>, pathname: &str) -> Self {
        Self {
            success: Some(Notice {
                code,
                message: message.into(),
                pathname: pathname.to_string(),
            }),
            error: None,
            data: None,
        }
    }

    pub fn error(code: &'static str, message: impl Into<String>, pathname: &str) -> Self {
        Self {
            success: None,
            error: Some(Notice {
                code,
                message: message.into(),
                pathname: pathname.to_string(),
            }),
            data: None,
        }
    }

    pub fn with_data<D: Serialize>(self, data: D) -> Envelope<D> {
        Envelope {
            success: self.success,
            error: self.error,
            data: Some(data),
        }
    }
}

/// An envelope paired with the status code it is sent with.
pub struct Reply<D = ()> {
    pub status: StatusCode,
    pub envelope: Envelope<D>,
}

impl<D> Reply<D> {
    pub fn new(status: StatusCode, envelope: Envelope<D>) -> Self {
        Self { status, envelope }
    }
}

impl<D: Serialize> IntoResponse for Reply<D> {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}
