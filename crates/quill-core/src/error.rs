use thiserror::Error;

use quill_store::StoreError;

/// Failure of a service operation.
///
/// Every failure falls into exactly one of three kinds. The message is meant
/// for the caller and names the entity or identifier involved.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A malformed external identifier, or a stored reference that cannot be
    /// parsed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No document matched a lookup, including lookups in the middle of a
    /// sequence.
    #[error("not found: {0}")]
    NotFound(String),

    /// Store I/O failure, undecodable stored document, or an unexpected write
    /// acknowledgment.
    #[error("internal error: {0}")]
    Internal(String),
}

/// The taxonomy code of a [`ServiceError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Internal,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The detail message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArgument(m) | Self::NotFound(m) | Self::Internal(m) => m,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        Self::Internal(format!("document store: {err}"))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
