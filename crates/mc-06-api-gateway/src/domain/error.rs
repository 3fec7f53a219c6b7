//! API Gateway error types and their HTTP mapping.
//!
//! | Kind | Status |
//! |------|--------|
//! | `bad_request`, `invalid_transaction`, `invalid_profile` | 400 |
//! | `access_denied` | 403 |
//! | `not_found` | 404 |
//! | `duplicate` | 409 |
//! | `upstream` | authority status, or 502 |
//! | `not_enough_transactions`, `internal` | 500 |

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mc_03_authority::AuthorityError;
use mc_04_chain_sync::SyncError;
use mc_05_patient_index::IndexError;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Request-level error, rendered as a JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Body or query could not be parsed
    #[error("Malformed request: {0}")]
    BadRequest(String),

    /// Transaction hash or signature does not verify
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// Patient profile or key is unusable
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Transaction or patient already known
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Seal requested on an empty pool
    #[error("Not enough transactions to seal a block")]
    NotEnoughTransactions,

    /// The authority refused or could not be reached
    #[error("Authority error: {message}")]
    Upstream { status: Option<u16>, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// `{"error": {"kind", "message"}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub kind: String,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::InvalidTransaction(_) | Self::InvalidProfile(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::AccessDenied(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Duplicate(_) => StatusCode::CONFLICT,
            Self::Upstream { status, .. } => status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Self::NotEnoughTransactions | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::InvalidTransaction(_) => "invalid_transaction",
            Self::InvalidProfile(_) => "invalid_profile",
            Self::AccessDenied(_) => "access_denied",
            Self::NotFound(_) => "not_found",
            Self::Duplicate(_) => "duplicate",
            Self::NotEnoughTransactions => "not_enough_transactions",
            Self::Upstream { .. } => "upstream",
            Self::Internal(_) => "internal",
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: ErrorDetail {
                kind: self.kind().to_string(),
                message: self.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("[mc-06] {} -> {}", self, status);
        }
        (status, Json(self.body())).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<AuthorityError> for ApiError {
    fn from(e: AuthorityError) -> Self {
        match e {
            AuthorityError::InvalidTransaction(reason) => {
                warn!(target: "security", "[mc-06] Rejected transaction: {}", reason);
                Self::InvalidTransaction(reason)
            }
            AuthorityError::DuplicateTransaction(hash) => Self::Duplicate(hash),
            AuthorityError::NotEnoughTransactions => Self::NotEnoughTransactions,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<SyncError> for ApiError {
    fn from(e: SyncError) -> Self {
        match e {
            SyncError::UnknownBlock(hash) => Self::NotFound(format!("block {}", hash)),
            SyncError::Rejected { status, message } => Self::Upstream {
                status: Some(status),
                message,
            },
            other => Self::Upstream {
                status: None,
                message: other.to_string(),
            },
        }
    }
}

impl From<IndexError> for ApiError {
    fn from(e: IndexError) -> Self {
        match e {
            IndexError::UnknownPatient(id) => Self::NotFound(format!("patient {}", id)),
            IndexError::NoRecords(id) => Self::NotFound(format!("records of patient {}", id)),
            IndexError::AlreadyRegistered(id) => Self::Duplicate(format!("patient {}", id)),
            IndexError::AccessDenied(id) => Self::AccessDenied(format!("records of patient {}", id)),
            IndexError::InvalidProfile(reason) => Self::InvalidProfile(reason),
            IndexError::Store(reason) => Self::Internal(reason),
            IndexError::Crypto(e) => Self::Internal(e.to_string()),
        }
    }
}

/// Gateway-level errors (not request-scoped)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Server stopped with an I/O error
    #[error("server error: {0}")]
    Serve(String),
}
