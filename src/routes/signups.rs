use crate::{
    delivery::{manual, submission_subject, DeliveryChannel, DeliveryResult, SignupPipeline},
    domain::{ArtistName, ContactEmail, SignupRecord},
    metrics::DeliveryMetrics,
    state::AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use chrono::Utc;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, serde::Deserialize, ToSchema)]
pub struct FormData {
    artist_name: String,
    email: String,
    x_username: Option<String>,
    telegram_username: Option<String>,
    whatsapp_number: Option<String>,
}

/// Rejection for a submission that never reaches the delivery chain. The
/// message names the offending field.
#[derive(thiserror::Error)]
pub enum SignupValidationError {
    #[error("Invalid artist_name: {0}")]
    ArtistName(String),
    #[error("Invalid email: {0}")]
    Email(String),
}

impl IntoResponse for SignupValidationError {
    fn into_response(self) -> Response {
        (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()).into_response()
    }
}

impl TryFrom<FormData> for SignupRecord {
    type Error = SignupValidationError;

    fn try_from(value: FormData) -> Result<Self, Self::Error> {
        let artist_name =
            ArtistName::parse(value.artist_name).map_err(SignupValidationError::ArtistName)?;
        let email = ContactEmail::parse(value.email).map_err(SignupValidationError::Email)?;

        Ok(Self {
            artist_name,
            email,
            x_username: value.x_username.and_then(normalize_handle),
            telegram_username: value.telegram_username.and_then(normalize_handle),
            whatsapp_number: value.whatsapp_number.and_then(normalize_handle),
            submitted_at: Utc::now(),
        })
    }
}

/// Optional handles arrive as empty strings when the form fields are left
/// untouched.
fn normalize_handle(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Create a router to serve endpoints.
pub fn create_router() -> Router<AppState> {
    Router::new().route("/", post(submit_signup))
}

#[derive(serde::Serialize, ToSchema)]
pub struct SignupAccepted {
    status: &'static str,
    #[schema(value_type = String)]
    channel: DeliveryChannel,
    reference: String,
}

/// Everything the caller needs to fall back to a manual submission.
#[derive(serde::Serialize, ToSchema)]
pub struct SignupFallback {
    status: &'static str,
    reference: String,
    record: RecordEcho,
    operator_email: String,
    mailto: String,
    copy_text: String,
}

/// The validated record, echoed back unchanged.
#[derive(serde::Serialize, ToSchema)]
pub struct RecordEcho {
    artist_name: String,
    email: String,
    x_username: Option<String>,
    telegram_username: Option<String>,
    whatsapp_number: Option<String>,
    submitted_at: String,
}

impl From<&SignupRecord> for RecordEcho {
    fn from(record: &SignupRecord) -> Self {
        Self {
            artist_name: record.artist_name.as_ref().to_owned(),
            email: record.email.as_ref().to_owned(),
            x_username: record.x_username.clone(),
            telegram_username: record.telegram_username.clone(),
            whatsapp_number: record.whatsapp_number.clone(),
            submitted_at: record.submitted_at.to_rfc3339(),
        }
    }
}

/// Receive an artist signup and run it through the delivery chain.
#[tracing::instrument(
    name = "Receiving a new artist signup",
    skip(pipeline, metrics, form),
    fields(
        artist_name = %form.artist_name,
        email = %form.email,
    )
)]
#[utoipa::path(
    post,
    path = "/signups",
    request_body(content = FormData, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = OK, description = "Signup delivered to the operator", body = SignupAccepted),
        (status = UNPROCESSABLE_ENTITY, description = "Validation failed, naming the offending field"),
        (status = BAD_GATEWAY, description = "Every channel failed, manual fallback attached", body = SignupFallback)
    )
)]
pub(crate) async fn submit_signup(
    State(pipeline): State<Arc<SignupPipeline>>,
    State(metrics): State<Arc<DeliveryMetrics>>,
    Form(form): Form<FormData>,
) -> Response {
    let record: SignupRecord = match form.try_into() {
        Ok(x) => x,
        Err(e) => {
            tracing::warn!(error.message = %e, "Rejecting an invalid signup");
            metrics.record_rejected();
            return e.into_response();
        }
    };

    match pipeline.submit(record).await {
        DeliveryResult::Delivered { channel, reference } => {
            metrics.record_delivered(channel);
            (
                StatusCode::OK,
                Json(SignupAccepted {
                    status: "delivered",
                    channel,
                    reference,
                }),
            )
                .into_response()
        }
        DeliveryResult::Failed { record, reference } => {
            metrics.record_failed();
            let subject = submission_subject(&record.artist_name, &reference);
            let operator = pipeline.operator();
            let fallback = SignupFallback {
                status: "failed",
                reference,
                record: RecordEcho::from(&record),
                operator_email: operator.as_ref().to_owned(),
                mailto: manual::mailto_uri(&record, operator, &subject),
                copy_text: manual::copy_text(&record, operator),
            };

            (StatusCode::BAD_GATEWAY, Json(fallback)).into_response()
        }
    }
}
