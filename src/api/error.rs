use std::fmt;

/// Errors that can occur while talking to the recommendation backend.
///
/// Each variant maps to one fixed, user-facing sentence via
/// [`ApiError::user_message`]. None of them are retried.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Backend rejected the input (HTTP 400).
    Validation(String),
    /// Any other non-2xx response.
    Status { status: u16, body: String },
    /// No response was received (connection refused, DNS, reset).
    Unreachable(String),
    /// Client-side deadline exceeded.
    Timeout,
    /// Response arrived but could not be parsed.
    Decode(String),
    /// Anything else (e.g. request could not be built).
    Unknown(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(body) => write!(f, "validation error (HTTP 400): {body}"),
            ApiError::Status { status, body } => write!(f, "API error (HTTP {status}): {body}"),
            ApiError::Unreachable(msg) => write!(f, "service unreachable: {msg}"),
            ApiError::Timeout => write!(f, "request timed out"),
            ApiError::Decode(msg) => write!(f, "decode error: {msg}"),
            ApiError::Unknown(msg) => write!(f, "unexpected error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn from_status(status: u16, body: String) -> Self {
        if status == 400 {
            ApiError::Validation(body)
        } else {
            ApiError::Status { status, body }
        }
    }

    /// The chat-bubble text shown when a recommendation request fails.
    ///
    /// `service_url` is the backend base URL, named in the unreachable hint.
    pub fn user_message(&self, service_url: &str) -> String {
        match self {
            ApiError::Validation(_) => "Please provide a valid message. Try describing how you're feeling or what kind of movie you want.".to_string(),
            ApiError::Status { status: 500, .. } => {
                "The recommendation service encountered an error. Please try again in a moment."
                    .to_string()
            }
            ApiError::Status { status, .. } => format!("Server error ({status}). Please try again."),
            ApiError::Unreachable(_) => format!(
                "I can't reach the recommendation service right now. Please check if the API server is running on {service_url}"
            ),
            ApiError::Timeout => {
                "The request took too long. Please try again with a shorter message.".to_string()
            }
            ApiError::Decode(_) | ApiError::Unknown(_) => {
                "An unexpected error occurred. Please try again.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if e.is_connect() || e.is_request() {
            ApiError::Unreachable(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::from_status(status.as_u16(), e.to_string())
        } else {
            ApiError::Unknown(e.to_string())
        }
    }
}
