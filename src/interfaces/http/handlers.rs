//! Route handlers. Each one validates its input, calls `CheckoutService`, and
//! maps the outcome onto a fixed status code and error/success code.

use super::AppState;
use super::envelope::{Envelope, Reply};
use super::extract::{Submission, SubmissionRejection};
use crate::application::checkout::LookupOutcome;
use crate::domain::payment::PaymentStatus;
use crate::domain::submission::{
    CardSubmission, RawCardSubmission, RawSecuredCardSubmission, SecuredCardSubmission,
};
use crate::error::{ChargeError, LookupError, TokenError};
use axum::extract::{OriginalUri, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use tracing::error;

pub const CARD_PAGE_REDIRECT: &str = "/Payment/Card?DefaultCardholderCountry=IS";
const DEFAULT_COUNTRY: &str = "IS";

const NO_TOKEN: &str = "No3DSecureJWT";
const INTERNAL_SERVER_ERROR: &str = "InternalServerError";
const NOT_FOUND: &str = "NoCorrespondingController";

/// `GET /`
pub async fn root() -> Redirect {
    Redirect::permanent(CARD_PAGE_REDIRECT)
}

#[derive(Debug, Default, Deserialize)]
pub struct CardPageQuery {
    #[serde(rename = "DefaultCardholderCountry")]
    pub default_cardholder_country: Option<String>,
}

fn render(status: StatusCode, page: tera::Result<String>) -> Response {
    match page {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            error!(error = %e, "rendering page failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// `GET /Payment/Card`: obtains a 3DS token and renders the payment form.
pub async fn card_page(
    State(state): State<AppState>,
    uri: Uri,
    Query(query): Query<CardPageQuery>,
) -> Response {
    let session = match state.checkout.start().await {
        Ok(session) => session,
        Err(kind) => {
            let message = match kind {
                TokenError::Request => {
                    "There was an error requesting a 3-D Secure JWT from the Verifone servers."
                }
                TokenError::BodyParse => {
                    "There was an error parsing the response payload from the Verifone servers."
                }
                TokenError::Response => {
                    "There was an error parsing the response JSON from the Verifone servers."
                }
            };
            let page = state.views.error(NO_TOKEN, message, uri.path());
            return render(StatusCode::INTERNAL_SERVER_ERROR, page);
        }
    };

    let country = query
        .default_cardholder_country
        .as_deref()
        .unwrap_or(DEFAULT_COUNTRY);
    render(StatusCode::OK, state.views.card_payment(&session, country))
}

/// `POST /Payment/3DSecureLookup`: runs the 3DS lookup and reports the verdict.
pub async fn three_d_secure_lookup(
    State(state): State<AppState>,
    uri: Uri,
    Submission(raw): Submission<RawCardSubmission>,
) -> Response {
    let pathname = uri.path();
    let submission = match CardSubmission::try_from(raw) {
        Ok(submission) => submission,
        Err(e) => return SubmissionRejection::new(e, pathname).into_response(),
    };

    let outcome = match state.checkout.lookup(submission).await {
        Ok(outcome) => outcome,
        Err(kind) => {
            let message = match kind {
                LookupError::Request => "Error while performing Verifone 3-D Secure lookup",
                LookupError::Decode | LookupError::BodyParse => {
                    "Error while parsing Verifone 3-D Secure lookup response"
                }
            };
            return Reply::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                Envelope::error(INTERNAL_SERVER_ERROR, message, pathname),
            )
            .into_response();
        }
    };

    match outcome {
        LookupOutcome::IssuerNotEnrolled => Reply::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            Envelope::error(
                "ThreeDSecureEnrollmentError",
                "Card issuer is not enrolled in 3-D Secure scheme.",
                pathname,
            ),
        )
        .into_response(),
        LookupOutcome::SignatureInvalid => Reply::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            Envelope::error(
                "ThreeDSecureResponseSignatureNotVerifiedError",
                "3-D Secure response signature cannot be verified.",
                pathname,
            ),
        )
        .into_response(),
        LookupOutcome::ChallengeRequired(challenge) => Reply::new(
            StatusCode::OK,
            Envelope::success(
                "CardholderVerification",
                "Please proceed with Cardholder verification on client with Cardinal.continue(...)",
                pathname,
            )
            .with_data(challenge),
        )
        .into_response(),
        LookupOutcome::LiabilityShifted(evidence) => Reply::new(
            StatusCode::OK,
            Envelope::success(
                "LiabilityShifted",
                "Please proceed with payment at /Payment/SecuredCard",
                pathname,
            )
            .with_data(evidence),
        )
        .into_response(),
        LookupOutcome::LiabilityUnknown => Reply::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            Envelope::error(
                "ThreeDSecureLiabilityError",
                "Your payment attempt was rejected due to liability shifting onto the merchant. We don't know exactly why.",
                pathname,
            ),
        )
        .into_response(),
    }
}

/// `POST /Payment/SecuredCard`: charges the card with the echoed 3DS evidence.
pub async fn secured_card(
    State(state): State<AppState>,
    uri: Uri,
    Submission(raw): Submission<RawSecuredCardSubmission>,
) -> Response {
    let pathname = uri.path();
    let submission = match SecuredCardSubmission::try_from(raw) {
        Ok(submission) => submission,
        Err(e) => return SubmissionRejection::new(e, pathname).into_response(),
    };

    let payment = match state.checkout.pay(submission).await {
        Ok(payment) => payment,
        Err(kind) => {
            let message = match kind {
                ChargeError::Request => "Error while performing Verifone payment",
                ChargeError::Decode => "Error while parsing Verifone payment response payload",
                ChargeError::BodyParse => "Error while parsing Verifone payment response JSON",
            };
            return Reply::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                Envelope::error(INTERNAL_SERVER_ERROR, message, pathname),
            )
            .into_response();
        }
    };

    // Declined and unknown are business outcomes, not transport failures, so
    // they are answered with 200.
    let (status, envelope) = match payment.status {
        PaymentStatus::Authorized => (
            StatusCode::OK,
            Envelope::success("PaymentStatusAuthorized", "Payment is authorized", pathname),
        ),
        PaymentStatus::Pending => (
            StatusCode::OK,
            Envelope::success("PaymentStatusPending", "Payment is pending", pathname),
        ),
        PaymentStatus::Declined => (
            StatusCode::OK,
            Envelope::error("PaymentStatusDeclined", "Payment was declined", pathname),
        ),
        PaymentStatus::Unknown => (
            StatusCode::OK,
            Envelope::error("PaymentStatusUnknown", "Payment is pending", pathname),
        ),
        PaymentStatus::Other(_) => (
            StatusCode::BAD_REQUEST,
            Envelope::error(
                "PaymentStatusUnsuccessful",
                "An error or otherwise unsuccessful response code was returned by the processor.",
                pathname,
            ),
        ),
    };
    Reply::new(status, envelope).into_response()
}

/// Anything no route or static asset matched. Reports the path as requested,
/// before any nesting prefix was stripped.
pub async fn not_found(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let page = state.views.error(
        NOT_FOUND,
        "No controller matched the route you requested.",
        uri.path(),
    );
    match page {
        Ok(body) => (
            StatusCode::NOT_FOUND,
            [(CONTENT_TYPE, "application/xml")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "rendering not-found page failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
