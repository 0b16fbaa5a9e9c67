use std::{error::Error as StdError, fmt, io};

use reqwest::StatusCode;
use thiserror::Error;

const BODY_SNIPPET_LEN: usize = 256;

/// Where a transport-level failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// DNS resolution, connection refused/reset or TLS handshake failure.
    Connect,
    Timeout,
    /// A syscall failed underneath the HTTP client.
    Io,
    /// Any other failure while sending the request or reading the response body.
    Request,
    /// The caller's cancellation token fired.
    Cancelled,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Connect => write!(f, "connect"),
            TransportErrorKind::Timeout => write!(f, "timeout"),
            TransportErrorKind::Io => write!(f, "io"),
            TransportErrorKind::Request => write!(f, "request"),
            TransportErrorKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind} error: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn cancelled() -> Self {
        Self::new(TransportErrorKind::Cancelled, "request cancelled by caller")
    }

    /// Connectivity failures. A cancellation is the caller's decision, not a sign that the
    /// node is unreachable.
    pub fn is_disconnection(&self) -> bool {
        self.kind != TransportErrorKind::Cancelled
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_connect() {
            TransportErrorKind::Connect
        } else if has_io_source(&err) {
            TransportErrorKind::Io
        } else {
            TransportErrorKind::Request
        };

        Self::new(kind, err.to_string())
    }
}

fn has_io_source(err: &(dyn StdError + 'static)) -> bool {
    let mut source = err.source();
    while let Some(inner) = source {
        if inner.downcast_ref::<io::Error>().is_some() {
            return true;
        }
        source = inner.source();
    }
    false
}

/// A value inside an otherwise well-formed response could not be interpreted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Parse a decimal-string integer as the beacon API puts them on the wire.
pub fn parse_quoted_u64(field: &str, value: &str) -> Result<u64, FieldError> {
    value
        .parse::<u64>()
        .map_err(|err| FieldError::new(field, format!("invalid integer {value:?}: {err}")))
}

#[derive(Debug, Error)]
pub enum BeaconError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error(
        "Request to {endpoint} failed with status code: {status_code}, body: {}",
        snippet(.body)
    )]
    HttpStatus {
        endpoint: String,
        status_code: StatusCode,
        body: String,
    },

    #[error(
        "Failed to decode {field} from {endpoint}: {message}, body: {}",
        snippet(.body)
    )]
    Decode {
        endpoint: String,
        field: String,
        message: String,
        body: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Submission to {endpoint} rejected with status code: {status_code}, body: {body}")]
    SubmissionRejected {
        endpoint: String,
        status_code: StatusCode,
        body: String,
    },

    #[error("No beacon clients are ready")]
    NoClientsReady,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Signer error: {0}")]
    Signer(String),
}

impl BeaconError {
    pub fn http_status(endpoint: &str, status_code: StatusCode, body: &[u8]) -> Self {
        BeaconError::HttpStatus {
            endpoint: endpoint.to_string(),
            status_code,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    pub fn submission_rejected(endpoint: &str, status_code: StatusCode, body: &[u8]) -> Self {
        BeaconError::SubmissionRejected {
            endpoint: endpoint.to_string(),
            status_code,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    pub fn decode(endpoint: &str, field: FieldError, body: &[u8]) -> Self {
        BeaconError::Decode {
            endpoint: endpoint.to_string(),
            field: field.field,
            message: field.message,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    /// Reports the JSON path of the value that failed to deserialize, e.g. `data.head_slot`.
    pub fn json(
        endpoint: &str,
        err: serde_path_to_error::Error<serde_json::Error>,
        body: &[u8],
    ) -> Self {
        let path = err.path().to_string();
        // Syntax errors before the first value have no path.
        let field = if path == "." { "response body".to_string() } else { path };
        Self::decode(endpoint, FieldError::new(field, err.into_inner().to_string()), body)
    }

    /// Whether the failover manager should treat this error as the node being unreachable.
    pub fn is_disconnection(&self) -> bool {
        matches!(self, BeaconError::Transport(err) if err.is_disconnection())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            BeaconError::Transport(TransportError {
                kind: TransportErrorKind::Cancelled,
                ..
            })
        )
    }
}

impl From<reqwest::Error> for BeaconError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            return BeaconError::InvalidInput(err.to_string());
        }
        BeaconError::Transport(err.into())
    }
}

fn snippet(body: &str) -> &str {
    match body.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}
