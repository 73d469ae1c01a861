use rusqlite::ErrorCode;
use thiserror::Error;
use tracing::debug;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a store operation.
///
/// Variants carry context for logs only. Callers should branch on
/// [`StoreError::kind`] and render a fixed message per kind.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Malformed identifier, invalid enumerated value, missing or wrong-shaped field.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Well-formed reference to an entity that does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// The store rejected a write on a referential, check or not-null constraint.
    #[error("constraint violation: {0}")]
    ConstraintViolation(#[source] rusqlite::Error),

    #[error("unexpected store failure: {0}")]
    Unexpected(String),
}

/// What the caller of a store operation is told.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Unexpected,
}

impl StoreError {
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest(reason.into())
    }

    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// A missing foreign key is an absence from the caller's point of view.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::NotFound { .. } | Self::ConstraintViolation(_) => ErrorKind::NotFound,
            Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => {
                debug!("Reclassifying constraint violation: {}", err);
                Self::ConstraintViolation(err)
            }
            _ => Self::Unexpected(err.to_string()),
        }
    }
}
