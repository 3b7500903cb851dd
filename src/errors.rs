use thiserror::Error;

/// Service error codes that mean the caller's credentials were rejected.
const AUTH_ERROR_CODES: [&str; 4] = [
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "ExpiredToken",
    "InvalidToken",
];

/// Errors surfaced by the object storage layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("bucket `{0}` not found")]
    BucketNotFound(String),
    #[error("access to bucket `{0}` denied")]
    BucketAccessDenied(String),
    #[error("object `{key}` not found in bucket `{bucket}`")]
    ObjectNotFound { bucket: String, key: String },
    #[error("{operation} failed: {message}")]
    Access {
        operation: &'static str,
        code: String,
        message: String,
    },
    #[error("invalid restore request: {0}")]
    InvalidRestoreRequest(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Shortcut for a service error carrying an S3 error code.
    pub fn access(
        operation: &'static str,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Access {
            operation,
            code: code.into(),
            message: message.into(),
        }
    }

    /// The S3 error code behind this error, if the service reported one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::BucketNotFound(_) => Some("NoSuchBucket"),
            Self::BucketAccessDenied(_) => Some("AccessDenied"),
            Self::ObjectNotFound { .. } => Some("NoSuchKey"),
            Self::Access { code, .. } if !code.is_empty() => Some(code.as_str()),
            Self::Access { .. } | Self::InvalidRestoreRequest(_) => None,
        }
    }

    /// Whether the error should abort the whole command rather than be
    /// reported against a single object.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::BucketNotFound(_) | Self::BucketAccessDenied(_) => true,
            Self::Access { code, .. } => AUTH_ERROR_CODES.contains(&code.as_str()),
            Self::ObjectNotFound { .. } | Self::InvalidRestoreRequest(_) => false,
        }
    }
}
