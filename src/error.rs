//! Structured error types for property capture and environment resolution.

use crate::config::RodsEnvironment;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Caller errors
    InvalidInputParam,

    // Soft, field-local failures
    KeyNotFound,
    WouldTruncate,

    // Store errors
    TypeMismatch,

    // Resolution errors
    MissingServerConfig,
    MissingRequiredKey,
    InvalidRequiredValue,

    // Loading errors
    FileReadError,
    FileParseError,
}

/// A value did not fit into a capacity-bounded string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("value of {len} bytes does not fit in a buffer of capacity {capacity}")]
pub struct CapacityError {
    pub len: usize,
    pub capacity: usize,
}

/// Errors raised by the property store's typed accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{key} is not defined")]
    NotFound { key: String },

    #[error("property {key} is not of type {expected}")]
    TypeMismatch { key: String, expected: &'static str },
}

impl StoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::NotFound { .. } => ErrorCode::KeyNotFound,
            StoreError::TypeMismatch { .. } => ErrorCode::TypeMismatch,
        }
    }
}

/// Field-level failure of a single property capture.
///
/// None of these abort a client-role resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("invalid input parameter: {reason}")]
    InvalidInput { reason: &'static str },

    #[error("{key} is not defined")]
    NotFound { key: String },

    #[error("{key} would be truncated: {source}")]
    WouldTruncate {
        key: String,
        #[source]
        source: CapacityError,
    },

    #[error(transparent)]
    Store(StoreError),
}

impl CaptureError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CaptureError::InvalidInput { .. } => ErrorCode::InvalidInputParam,
            CaptureError::NotFound { .. } => ErrorCode::KeyNotFound,
            CaptureError::WouldTruncate { .. } => ErrorCode::WouldTruncate,
            CaptureError::Store(err) => err.code(),
        }
    }

    /// Whether the failure is an expected soft miss rather than something worth
    /// reporting at error severity.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            CaptureError::NotFound { .. } | CaptureError::WouldTruncate { .. }
        )
    }
}

impl From<StoreError> for CaptureError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { key } => CaptureError::NotFound { key },
            other => CaptureError::Store(other),
        }
    }
}

/// Fatal outcome of a resolution pass.
///
/// Only the server role produces these for configuration content; the
/// partially filled record is carried along for diagnostics.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("server role requires a server configuration document")]
    MissingServerConfig,

    #[error("required server configuration key '{key}' is missing")]
    MissingRequiredKey {
        key: String,
        partial: Box<RodsEnvironment>,
    },

    #[error("server configuration key '{key}' must be {expected}")]
    InvalidRequiredValue {
        key: String,
        expected: &'static str,
        partial: Box<RodsEnvironment>,
    },
}

impl ResolveError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ResolveError::MissingServerConfig => ErrorCode::MissingServerConfig,
            ResolveError::MissingRequiredKey { .. } => ErrorCode::MissingRequiredKey,
            ResolveError::InvalidRequiredValue { .. } => ErrorCode::InvalidRequiredValue,
        }
    }

    /// The record as it stood when resolution aborted, if any.
    pub fn partial(&self) -> Option<&RodsEnvironment> {
        match self {
            ResolveError::MissingServerConfig => None,
            ResolveError::MissingRequiredKey { partial, .. }
            | ResolveError::InvalidRequiredValue { partial, .. } => Some(&**partial),
        }
    }
}

/// Errors while capturing configuration files into a property store.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path} must contain a JSON object at the top level")]
    NotAnObject { path: PathBuf },
}

impl LoadError {
    pub fn code(&self) -> ErrorCode {
        match self {
            LoadError::Read { .. } => ErrorCode::FileReadError,
            LoadError::Parse { .. } | LoadError::NotAnObject { .. } => ErrorCode::FileParseError,
        }
    }
}
