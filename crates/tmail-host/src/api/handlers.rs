//! # Endpoint handlers
//!
//! Admission checks run in a fixed order before the body is read: method,
//! declared length, size limit, content type. Only then is the body decoded
//! and handed to the ingestion core.

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{
        rejection::{BytesRejection, FailedToBufferBody},
        FromRequest, Request, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tmail_core::CandidateMessage;
use tmail_kernel::{ExistenceOracle, Rejection, StoreGateway};

use super::{
    types::{ErrorResponse, IngestResponse, WireMessage},
    AppState,
};

/// The only content type `/tmail/v1` accepts.
const JSON_CONTENT_TYPE: &str = "application/json";

// =============================================================================
// ERRORS
// =============================================================================

/// Why a request was not ingested.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Must be POST")]
    MustBePost,

    #[error("Content-Length required")]
    LengthRequired,

    #[error("Message too big")]
    TooLarge,

    #[error("Unsupported Content-Type")]
    UnsupportedContentType,

    #[error("Invalid JSON")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Failed to read body: {0}")]
    BodyRead(String),

    #[error(transparent)]
    Rejected(#[from] Rejection),
}

impl ApiError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MustBePost => "must_be_post",
            Self::LengthRequired => "length_required",
            Self::TooLarge => "message_too_big",
            Self::UnsupportedContentType => "unsupported_content_type",
            Self::InvalidJson(_) => "invalid_json",
            Self::BodyRead(_) => "body_read_failed",
            Self::Rejected(rejection) => rejection.code(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MustBePost | Self::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Self::LengthRequired => StatusCode::LENGTH_REQUIRED,
            Self::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::BodyRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rejected(rejection) => match rejection {
                Rejection::IdentityNotAllowed | Rejection::MalformedReference(_) => {
                    StatusCode::BAD_REQUEST
                }
                Rejection::ParentNotFound(_) => StatusCode::UNPROCESSABLE_ENTITY,
                Rejection::OracleUnavailable(_) | Rejection::StoreFailure(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
            },
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Rejected(rejection) if rejection.is_retryable())
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        match rejection {
            BytesRejection::FailedToBufferBody(FailedToBufferBody::LengthLimitError(_)) => {
                Self::TooLarge
            }
            other => Self::BodyRead(other.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse::new(self.code(), self.to_string()));

        if self.is_retryable() {
            (status, [(header::RETRY_AFTER, "1")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

// =============================================================================
// INFO HANDLER
// =============================================================================

/// Plain-text host identification.
pub async fn info_handler() -> &'static str {
    concat!("tmail-host ", env!("CARGO_PKG_VERSION"))
}

// =============================================================================
// INGEST HANDLER
// =============================================================================

/// Any method other than POST on the ingestion route.
pub async fn must_be_post() -> ApiError {
    ApiError::MustBePost
}

/// Ingest one JSON-encoded message.
pub async fn ingest_handler<O, G>(
    State(state): State<AppState<O, G>>,
    request: Request,
) -> Response
where
    O: ExistenceOracle + 'static,
    G: StoreGateway + 'static,
{
    let candidate = match decode_request(request, state.max_message_size).await {
        Ok(candidate) => candidate,
        Err(e @ ApiError::BodyRead(_)) => {
            tracing::warn!(error = %e, "failed to read request body");
            return e.into_response();
        }
        Err(e) => {
            tracing::debug!(code = e.code(), "request refused at admission");
            return e.into_response();
        }
    };

    match state.ingestor.ingest(candidate).await {
        Ok(accepted) => {
            let status = if accepted.is_duplicate() {
                StatusCode::OK
            } else {
                StatusCode::CREATED
            };
            (status, Json(IngestResponse::from(accepted))).into_response()
        }
        Err(rejection) => ApiError::from(rejection).into_response(),
    }
}

/// Run the admission checks and decode the body.
async fn decode_request(request: Request, limit: usize) -> Result<CandidateMessage, ApiError> {
    let (parts, body) = request.into_parts();

    match declared_length(&parts.headers, &body) {
        None | Some(0) => return Err(ApiError::LengthRequired),
        Some(len) if len > limit as u64 => return Err(ApiError::TooLarge),
        Some(_) => {}
    }

    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    if content_type != Some(JSON_CONTENT_TYPE) {
        return Err(ApiError::UnsupportedContentType);
    }

    // Buffered under the router's `DefaultBodyLimit`, so a body longer than
    // its declared length still stops at the limit.
    let bytes = Bytes::from_request(Request::from_parts(parts, body), &()).await?;

    let wire: WireMessage = serde_json::from_slice(&bytes).map_err(ApiError::InvalidJson)?;
    Ok(wire.into())
}

/// The request's `Content-Length`, or the body's exact size when the header
/// is absent. `None` when neither is known (chunked uploads).
fn declared_length(headers: &HeaderMap, body: &Body) -> Option<u64> {
    match headers.get(header::CONTENT_LENGTH) {
        Some(value) => value.to_str().ok()?.trim().parse().ok(),
        None => body.size_hint().exact(),
    }
}
