use std::fmt;

use reqwest::Method;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum CloudflareError {
    /// Credentials were missing or blank at construction time.
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),
    /// Field-level input validation failure, raised before any I/O happens.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Non-success HTTP status mapped through the status taxonomy.
    #[error(transparent)]
    Response(#[from] ResponseError),
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Response decoding or request-shape error.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Non-success HTTP response, carrying enough context to reproduce the
/// failing call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{status} {kind}: {body}")]
pub struct ResponseError {
    /// Status taxonomy discriminant.
    pub kind: ErrorKind,
    /// HTTP status code as received.
    pub status: u16,
    /// HTTP method of the failing request.
    pub method: Method,
    /// Request path plus query string.
    pub uri: String,
    /// Fully-qualified request URL.
    pub url: String,
    /// Raw response body.
    pub body: String,
}

/// Status-code taxonomy for non-success responses.
///
/// Statuses without a dedicated variant fall back to the range-level
/// [`ErrorKind::ClientError`] or [`ErrorKind::ServerError`]. 407 lands in
/// the generic bucket as well: proxy authentication is a transport
/// concern, not an API outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    ResourceNotFound,
    Conflict,
    Gone,
    PreconditionFailed,
    UnprocessableEntity,
    Locked,
    TooManyRequests,
    InternalServerError,
    BadGateway,
    ServiceUnavailable,
    GatewayTimeout,
    /// Unmapped 4xx status.
    ClientError,
    /// Unmapped 5xx status (and anything else handed to [`ErrorKind::from_status`]).
    ServerError,
}

impl ErrorKind {
    /// Maps an HTTP status code onto its taxonomy variant.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::ResourceNotFound,
            409 => Self::Conflict,
            410 => Self::Gone,
            412 => Self::PreconditionFailed,
            422 => Self::UnprocessableEntity,
            423 => Self::Locked,
            429 => Self::TooManyRequests,
            500 => Self::InternalServerError,
            502 => Self::BadGateway,
            503 => Self::ServiceUnavailable,
            504 => Self::GatewayTimeout,
            400..=499 => Self::ClientError,
            _ => Self::ServerError,
        }
    }

    /// Canonical reason phrase for the variant.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::ResourceNotFound => "Not Found",
            Self::Conflict => "Conflict",
            Self::Gone => "Gone",
            Self::PreconditionFailed => "Precondition Failed",
            Self::UnprocessableEntity => "Unprocessable Entity",
            Self::Locked => "Locked",
            Self::TooManyRequests => "Too Many Requests",
            Self::InternalServerError => "Internal Server Error",
            Self::BadGateway => "Bad Gateway",
            Self::ServiceUnavailable => "Service Unavailable",
            Self::GatewayTimeout => "Gateway Timeout",
            Self::ClientError => "Client Error",
            Self::ServerError => "Server Error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason_phrase())
    }
}

/// Field-level validation failure, raised before any network call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    MissingArgument { field: String },
    /// Message text is a contract: `"<field> must be one of <allowed>"`.
    #[error("{field} must be one of {allowed}")]
    InvalidValue { field: String, allowed: String },
    #[error("{field} must be {expected}")]
    InvalidType { field: String, expected: String },
    #[error("{field} must be at most {max} characters")]
    InvalidLength { field: String, max: usize },
    #[error("{field} must be {constraint}")]
    OutOfRange { field: String, constraint: String },
    #[error("{field} must be a valid {format} timestamp")]
    InvalidTimestamp { field: String, format: String },
}

impl ValidationError {
    /// Name of the field that failed validation.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingArgument { field }
            | Self::InvalidValue { field, .. }
            | Self::InvalidType { field, .. }
            | Self::InvalidLength { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::InvalidTimestamp { field, .. } => field,
        }
    }
}
