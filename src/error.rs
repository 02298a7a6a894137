// Structure error taxonomy and HTTP mapping
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::store::StoreError;

/// Discriminated errors produced by the mutation gateway and re-checked by
/// the server handlers. Every kind maps to one stable machine-readable code
/// that survives the HTTP round-trip, so a client gateway can reconstruct
/// the kind from a server rejection.
#[derive(Debug, thiserror::Error)]
pub enum StructureError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("permission denied")]
    Forbidden,

    #[error("creating a root department requires structure administration rights")]
    ForbiddenParentRequired,

    #[error("a department manager cannot move their department in the hierarchy")]
    ForbiddenParentChange,

    #[error("department name must not be empty")]
    NameRequired,

    #[error("invalid department id")]
    InvalidId,

    #[error("department not found")]
    NotFound,

    #[error("a department cannot become its own ancestor")]
    ParentCycle,

    /// The store call itself failed (network or server fault), as opposed to
    /// a rejected business rule. The only kind worth retrying.
    #[error("store request failed: {0}")]
    Transport(String),
}

impl StructureError {
    /// Stable wire code, also used as the `{ "error": ... }` body field.
    pub fn code(&self) -> &'static str {
        match self {
            StructureError::Unauthenticated => "unauthorized",
            StructureError::Forbidden => "forbidden",
            StructureError::ForbiddenParentRequired => "forbidden_parent_required",
            StructureError::ForbiddenParentChange => "forbidden_change_parent",
            StructureError::NameRequired => "name_required",
            StructureError::InvalidId => "bad_id",
            StructureError::NotFound => "not_found",
            StructureError::ParentCycle => "parent_cycle",
            StructureError::Transport(_) => "server_error",
        }
    }

    /// Reverse of [`code`](Self::code) for codes a server may legitimately
    /// return to a client gateway. Unknown codes surface as `None` and are
    /// treated as transport-level faults by the caller.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "unauthorized" => Some(StructureError::Unauthenticated),
            "forbidden" => Some(StructureError::Forbidden),
            "forbidden_parent_required" => Some(StructureError::ForbiddenParentRequired),
            "forbidden_change_parent" => Some(StructureError::ForbiddenParentChange),
            "name_required" => Some(StructureError::NameRequired),
            "bad_id" => Some(StructureError::InvalidId),
            "not_found" => Some(StructureError::NotFound),
            "parent_cycle" => Some(StructureError::ParentCycle),
            _ => None,
        }
    }

    /// Whether the UI may offer a "retry" affordance. Business rejections
    /// are final until the user changes the request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StructureError::Transport(_))
    }
}

impl From<StoreError> for StructureError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => StructureError::NotFound,
            StoreError::Rejected { code } => StructureError::from_code(&code)
                .unwrap_or_else(|| StructureError::Transport(format!("unexpected rejection: {}", code))),
            StoreError::Sqlx(e) => {
                tracing::error!("database error: {}", e);
                StructureError::Transport("database error".to_string())
            }
            StoreError::Http(e) => StructureError::Transport(e.to_string()),
            StoreError::Unavailable(msg) => StructureError::Transport(msg),
        }
    }
}

/// HTTP wrapper for [`StructureError`]. Keeps status-code concerns out of
/// the domain type so the view core never links against axum semantics.
#[derive(Debug)]
pub struct ApiError(pub StructureError);

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0 {
            StructureError::Unauthenticated => StatusCode::UNAUTHORIZED,
            StructureError::Forbidden
            | StructureError::ForbiddenParentRequired
            | StructureError::ForbiddenParentChange => StatusCode::FORBIDDEN,
            StructureError::NameRequired | StructureError::InvalidId => StatusCode::BAD_REQUEST,
            StructureError::NotFound => StatusCode::NOT_FOUND,
            StructureError::ParentCycle => StatusCode::CONFLICT,
            StructureError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StructureError> for ApiError {
    fn from(err: StructureError) -> Self {
        ApiError(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError(StructureError::from(err))
    }
}

impl From<crate::database::manager::DatabaseError> for ApiError {
    fn from(err: crate::database::manager::DatabaseError) -> Self {
        tracing::error!("database manager error: {}", err);
        ApiError(StructureError::Transport("database unavailable".to_string()))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(json!({ "error": self.0.code() }))).into_response()
    }
}
