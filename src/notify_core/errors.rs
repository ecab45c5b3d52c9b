// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Domain error types - failure kinds without leaking paths or secrets to the UI

use std::path::PathBuf;
use thiserror::Error;

/// Persistence failures reported by a credential or notification store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backing document could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing document or entry does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backing document exists but is not the expected JSON shape
    #[error("Malformed document {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid YAML for `Config`
    #[error("Failed to parse config file: {0}")]
    Parse(String),

    /// An environment variable holds a value of the wrong type
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: String, value: String },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        StoreError::Malformed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Short failure kind, stable across messages.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Io { .. } => "io_error",
            StoreError::NotFound(_) => "not_found",
            StoreError::Malformed { .. } => "malformed",
        }
    }

    /// Get user-friendly error message (no paths, no secrets).
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Io { .. } => "Storage unavailable".to_string(),
            StoreError::NotFound(_) => "Invalid or expired code".to_string(),
            StoreError::Malformed { .. } => "Storage unavailable".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_named() {
        let io = StoreError::io(
            "/srv/data/otps.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(io.kind(), "io_error");
        assert_eq!(StoreError::NotFound("x".into()).kind(), "not_found");
        assert_eq!(StoreError::malformed("otps.json", "eof").kind(), "malformed");
    }

    #[test]
    fn test_user_messages_no_sensitive_data() {
        let err = StoreError::malformed("/srv/secret/otps.json", "expected value at line 1");
        let user_msg = err.user_message();

        assert!(!user_msg.contains("/srv/secret"));
        assert_eq!(user_msg, "Storage unavailable");
        assert!(err.to_string().contains("/srv/secret/otps.json"));
    }
}
