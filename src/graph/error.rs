use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Missing, expired or under-scoped token. Never retried.
    #[error("not authorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("Graph request failed ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("booking failed ({status}): {message}")]
    BookingFailed { status: u16, message: String },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to decode Graph response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GraphError {
    /// Build an error from a non-2xx response body
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = error_message(body);
        let status = status.as_u16();
        match status {
            401 | 403 => GraphError::Unauthorized { status, message },
            _ => GraphError::Http { status, message },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GraphError::Unauthorized { status, .. }
            | GraphError::Http { status, .. }
            | GraphError::BookingFailed { status, .. } => Some(*status),
            GraphError::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Pull `error.message` out of a Graph error body, falling back to the
/// raw text
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            error: ErrorBody {
                message: Some(message),
                ..
            },
        }) if !message.is_empty() => message,
        Ok(ErrorEnvelope {
            error: ErrorBody {
                code: Some(code), ..
            },
        }) => code,
        _ if body.trim().is_empty() => String::from("no response body"),
        _ => body.trim().to_string(),
    }
}
