//! Error responses for the HTTP API.

use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::contact::ContactError;
use crate::error::FolioError;
use crate::ratelimit::Decision;

const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded. Please try again later.";
const MAIL_NOT_CONFIGURED_MESSAGE: &str = "Email service is not configured.";
const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again later.";

pub(crate) const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub(crate) const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// A failure surfaced to API clients as a status and `{ "error": ... }` body.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    InvalidContact(ContactError),
    RateLimited(Decision),
    MailNotConfigured,
    MailFailed,
    Internal(FolioError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::InvalidContact(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::MailNotConfigured | ApiError::MailFailed | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::NotFound(what) => format!("{} not found", what),
            ApiError::BadRequest(message) => message.clone(),
            ApiError::InvalidContact(err) => err.to_string(),
            ApiError::RateLimited(_) => RATE_LIMITED_MESSAGE.to_string(),
            ApiError::MailNotConfigured => MAIL_NOT_CONFIGURED_MESSAGE.to_string(),
            ApiError::MailFailed | ApiError::Internal(_) => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl From<FolioError> for ApiError {
    fn from(err: FolioError) -> Self {
        ApiError::Internal(err)
    }
}

impl From<ContactError> for ApiError {
    fn from(err: ContactError) -> Self {
        ApiError::InvalidContact(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(err) = &self {
            error!(error = %err, "Request failed");
        }

        let status = self.status();
        let mut response = (status, Json(json!({ "error": self.message() }))).into_response();

        if let ApiError::RateLimited(decision) = &self {
            let headers = response.headers_mut();
            headers.insert("retry-after", HeaderValue::from(decision.retry_after_secs()));
            headers.insert(LIMIT_HEADER, HeaderValue::from(decision.limit));
            headers.insert(REMAINING_HEADER, HeaderValue::from(0u32));
        }

        response
    }
}
