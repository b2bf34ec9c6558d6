//! Outcome classification
//!
//! Maps whatever the transport produced (a status + body, or a failure) onto
//! a closed set of outcomes. Pure: no I/O, no clock.
//!
//! | Input                              | Outcome              |
//! |------------------------------------|----------------------|
//! | transport timed out / aborted      | `Timeout`            |
//! | unreachable host, DNS, refused     | `NetworkFailure`     |
//! | 404                                | `NotFound`           |
//! | 500                                | `ServerError`        |
//! | other non-2xx                      | `GenericError`       |
//! | 2xx, body not an object / no array | `MalformedResponse`  |
//! | 2xx, well-formed                   | `Success`            |

use serde_json::Value;
use thiserror::Error;

use super::record::{ErrorBody, ProfessorRecord};

/// Status line + body as delivered by a `Transport`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("request exceeded {0} ms")]
    TimedOut(u32),
    #[error("network failure: {0}")]
    Network(String),
    #[error("{0}")]
    Other(String),
}

/// Error categories shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    ServerError,
    Timeout,
    NetworkFailure,
    MalformedResponse,
    GenericError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::ServerError => "server_error",
            ErrorKind::Timeout => "timeout",
            ErrorKind::NetworkFailure => "network_failure",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::GenericError => "generic_error",
        }
    }
}

/// Settled result of a professor lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(ProfessorRecord),
    NotFound,
    ServerError,
    Timeout,
    NetworkFailure,
    MalformedResponse(String),
    GenericError(String),
}

impl Outcome {
    /// `None` for `Success`.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Success(_) => None,
            Outcome::NotFound => Some(ErrorKind::NotFound),
            Outcome::ServerError => Some(ErrorKind::ServerError),
            Outcome::Timeout => Some(ErrorKind::Timeout),
            Outcome::NetworkFailure => Some(ErrorKind::NetworkFailure),
            Outcome::MalformedResponse(_) => Some(ErrorKind::MalformedResponse),
            Outcome::GenericError(_) => Some(ErrorKind::GenericError),
        }
    }

    /// Diagnostic text for the kinds that carry one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Outcome::MalformedResponse(reason) => Some(reason),
            Outcome::GenericError(message) => Some(message),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        self.error_kind().map_or("success", |kind| kind.as_str())
    }
}

/// Classify a transport result.
pub fn classify(result: Result<RawResponse, TransportError>) -> Outcome {
    match result {
        Err(TransportError::TimedOut(_)) => Outcome::Timeout,
        Err(TransportError::Network(_)) => Outcome::NetworkFailure,
        Err(TransportError::Other(message)) => Outcome::GenericError(message),
        Ok(response) => classify_response(&response),
    }
}

pub fn classify_response(response: &RawResponse) -> Outcome {
    match response.status {
        404 => Outcome::NotFound,
        500 => Outcome::ServerError,
        _ if !response.is_success() => Outcome::GenericError(status_message(response)),
        _ => match parse_record(&response.body) {
            Ok(record) => Outcome::Success(record),
            Err(reason) => Outcome::MalformedResponse(reason),
        },
    }
}

/// "HTTP 400: Professor name is required." when the body has a detail.
fn status_message(response: &RawResponse) -> String {
    match serde_json::from_str::<ErrorBody>(&response.body) {
        Ok(body) if !body.detail.trim().is_empty() => {
            format!("HTTP {}: {}", response.status, body.detail.trim())
        }
        _ => format!("HTTP {}", response.status),
    }
}

/// Shape-check then decode a success body.
pub fn parse_record(body: &str) -> Result<ProfessorRecord, String> {
    let value: Value = serde_json::from_str(body).map_err(|e| format!("invalid JSON: {}", e))?;

    let object = value
        .as_object()
        .ok_or_else(|| "response is not a JSON object".to_string())?;

    let reviews = match object.get("reviews") {
        Some(Value::Array(reviews)) => reviews,
        Some(_) => return Err("`reviews` is not an array".to_string()),
        None => return Err("missing `reviews` field".to_string()),
    };

    Ok(ProfessorRecord::from_object(object, reviews))
}
