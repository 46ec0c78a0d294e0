use super::envelope::{Envelope, Reply};
use crate::error::SubmissionError;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::de::DeserializeOwned;

pub const INVALID_SUBMISSION: &str = "InvalidSubmissionData";

/// A request body read as JSON, or as a urlencoded form when the request
/// says so. Failures become a 400 `InvalidSubmissionData` answer.
pub struct Submission<T>(pub T);

/// Rejection carrying the path the failed request was sent to.
pub struct SubmissionRejection {
    pub error: SubmissionError,
    pub pathname: String,
}

impl SubmissionRejection {
    pub fn new(error: SubmissionError, pathname: impl Into<String>) -> Self {
        Self {
            error,
            pathname: pathname.into(),
        }
    }
}

impl IntoResponse for SubmissionRejection {
    fn into_response(self) -> Response {
        Reply::new(
            StatusCode::BAD_REQUEST,
            Envelope::error(INVALID_SUBMISSION, self.error.to_string(), &self.pathname),
        )
        .into_response()
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

impl<S, T> FromRequest<S> for Submission<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = SubmissionRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let pathname = req.uri().path().to_string();
        let malformed = |text: String| {
            SubmissionRejection::new(SubmissionError::Malformed(text), pathname.clone())
        };

        if is_form(&req) {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| malformed(rejection.body_text()))?;
            Ok(Self(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| malformed(rejection.body_text()))?;
            Ok(Self(value))
        }
    }
}
