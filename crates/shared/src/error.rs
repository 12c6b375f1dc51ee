use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageOperation {
    Read,
    Write,
    Delete,
}

impl fmt::Display for StorageOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Delete => "delete",
        })
    }
}

/// The only failure the key-value store reports, whatever the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("storage {operation} failed for key '{key}': {message}")]
pub struct StorageOperationFailed {
    pub operation: StorageOperation,
    pub key: String,
    pub message: String,
}

impl StorageOperationFailed {
    pub fn new(
        operation: StorageOperation,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn read(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StorageOperation::Read, key, message)
    }

    pub fn write(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StorageOperation::Write, key, message)
    }

    pub fn delete(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StorageOperation::Delete, key, message)
    }
}
