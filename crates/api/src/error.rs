//! JSON error responses.
//!
//! Every failure leaves the API as `{"error": CODE, "message": text}` with
//! the status the domain error carries. Database failures are logged and
//! reported without their details.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use obrador_core::reports::ReportError;
use obrador_db::repositories::{AccountStoreError, JournalStoreError, ReportStoreError};
use sea_orm::DbErr;
use serde_json::json;

/// An error rendered as a JSON response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// A 400 response for a malformed request.
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code,
            message: message.into(),
        }
    }

    /// Status code of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    fn domain(status: u16, code: &'static str, message: String) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message,
        }
    }

    fn database(err: &DbErr) -> Self {
        tracing::error!(error = %err, "database error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR",
            message: "An internal error occurred".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": self.message,
            })),
        )
            .into_response()
    }
}

impl From<AccountStoreError> for ApiError {
    fn from(err: AccountStoreError) -> Self {
        match &err {
            AccountStoreError::Database(db) => Self::database(db),
            AccountStoreError::Domain(_) => {
                Self::domain(err.http_status_code(), err.error_code(), err.to_string())
            }
        }
    }
}

impl From<JournalStoreError> for ApiError {
    fn from(err: JournalStoreError) -> Self {
        match &err {
            JournalStoreError::Database(db) => Self::database(db),
            _ => Self::domain(err.http_status_code(), err.error_code(), err.to_string()),
        }
    }
}

impl From<ReportStoreError> for ApiError {
    fn from(err: ReportStoreError) -> Self {
        match &err {
            ReportStoreError::Database(db) => Self::database(db),
            ReportStoreError::Domain(_) => {
                Self::domain(err.http_status_code(), err.error_code(), err.to_string())
            }
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        Self::domain(err.http_status_code(), err.error_code(), err.to_string())
    }
}
