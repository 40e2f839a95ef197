//! HTTP error mapping.
//!
//! Every failure leaves the API as an RFC 7807 style problem body served with
//! `application/problem+json`. Internal causes are logged by the service and
//! replaced here with a generic detail.

use crate::error::{Error, ErrorKind};
use actix_web::{
    error::JsonPayloadError,
    http::{header, StatusCode as HttpStatusCode},
    HttpRequest, HttpResponse, ResponseError,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Client-visible error codes carried in [`ErrorBody::error_code`].
pub mod codes {
    pub const VALIDATION: u16 = 1001;
    pub const NOT_FOUND: u16 = 1002;
    pub const INVALID_INPUT: u16 = 1003;
    pub const INTERNAL: u16 = 5000;
}

/// API HTTP error: status plus problem body.
#[derive(Error, Debug)]
pub struct ApiError {
    pub http_code: HttpStatusCode,
    pub body: ErrorBody,
}

/// Error body serialized in JSON responses.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<u16>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.detail.is_empty() {
            write!(f, "{}", self.body.title)
        } else {
            write!(f, "{}: {}", self.body.title, self.body.detail)
        }
    }
}

impl ApiError {
    pub fn new(http_code: HttpStatusCode) -> Self {
        Self {
            http_code,
            body: ErrorBody::default(),
        }
    }

    /// 400 with a client-facing message.
    pub fn bad_request() -> Self {
        Self::new(HttpStatusCode::BAD_REQUEST).title("Bad Request")
    }

    /// 404.
    pub fn not_found() -> Self {
        Self::new(HttpStatusCode::NOT_FOUND).title("Not Found")
    }

    /// 500. Takes no cause: store error text never reaches a client.
    pub fn internal() -> Self {
        Self::new(HttpStatusCode::INTERNAL_SERVER_ERROR)
            .title("Internal Server Error")
            .error_code(codes::INTERNAL)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.body.title = title.into();
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.body.detail = detail.into();
        self
    }

    pub fn error_code(mut self, code: u16) -> Self {
        self.body.error_code = Some(code);
        self
    }

    /// Map a service error, using `operation` to phrase the generic 500 detail.
    pub fn from_service(operation: &str, err: Error) -> Self {
        match err.kind() {
            ErrorKind::Validation => {
                let detail = match err {
                    Error::ValidationError(msg) => msg,
                    other => other.to_string(),
                };
                ApiError::bad_request()
                    .detail(detail)
                    .error_code(codes::VALIDATION)
            }
            ErrorKind::NotFound => ApiError::not_found()
                .detail("Book not found")
                .error_code(codes::NOT_FOUND),
            ErrorKind::Internal => ApiError::internal().detail(format!("Failed to {}", operation)),
        }
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let body = serde_json::to_string(&self.body).unwrap_or_default();

        HttpResponse::build(self.http_code)
            .append_header((header::CONTENT_TYPE, "application/problem+json"))
            .body(body)
    }

    fn status_code(&self) -> HttpStatusCode {
        self.http_code
    }
}

/// Bare `?` conversion for paths without a named operation.
impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::from_service("process request", err)
    }
}

/// Json extractor error handler: malformed or mistyped bodies become a 400
/// without echoing parser output.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Rejected JSON body on {} {}: {}", req.method(), req.path(), err);
    ApiError::bad_request()
        .detail("Invalid input")
        .error_code(codes::INVALID_INPUT)
        .into()
}

pub type Result<T> = std::result::Result<T, ApiError>;
