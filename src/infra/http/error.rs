use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::quakes::FetchError;
use crate::infra::upstream::UpstreamError;

pub mod codes {
    pub const INVALID_REGION: &str = "invalid_region";
    pub const UPSTREAM_STATUS: &str = "upstream_status";
    pub const UPSTREAM_UNREACHABLE: &str = "upstream_unreachable";
    pub const BAD_UPSTREAM_PAYLOAD: &str = "bad_upstream_payload";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Diagnostic attached to failed responses for the logging middleware.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub detail: String,
}

impl ErrorReport {
    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    detail: Option<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
        detail: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            detail,
        }
    }

    pub fn invalid_region(name: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_REGION,
            format!("unknown state `{name}`"),
            Some(
                "state names are exact-match against the official U.S. state list, \
                 e.g. `California`"
                    .to_string(),
            ),
        )
    }
}

impl From<FetchError> for ApiError {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Upstream(UpstreamError::Status { status, body }) => ApiError::new(
                status,
                codes::UPSTREAM_STATUS,
                "upstream request failed",
                Some(body),
            ),
            FetchError::Upstream(UpstreamError::Transport { detail }) => ApiError::new(
                StatusCode::BAD_GATEWAY,
                codes::UPSTREAM_UNREACHABLE,
                "upstream unreachable",
                Some(detail),
            ),
            FetchError::Payload(err) => ApiError::new(
                StatusCode::BAD_GATEWAY,
                codes::BAD_UPSTREAM_PAYLOAD,
                "upstream payload could not be decoded",
                Some(err.to_string()),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self.detail.clone();
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.clone(),
                detail: self.detail,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        // Attach a structured report so the logging middleware can emit rich diagnostics.
        ErrorReport {
            source: "infra::http",
            status: self.status,
            detail: format!(
                "{}: {}",
                self.code,
                detail.as_deref().unwrap_or(&self.message)
            ),
        }
        .attach(&mut response);
        response
    }
}
