// Copyright 2025 Lablup Inc. and Jeongkyu Shin
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

//! Error types for session establishment, remote file operations, and local
//! persistence.
//!
//! Every failure is surfaced to the immediate caller as a distinct variant so
//! callers can decide whether to retry, prompt for new credentials, or abort.
//! Nothing is retried or swallowed internally.

use std::io;

use russh_sftp::protocol::StatusCode;
use thiserror::Error;

/// Errors produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Local I/O failure (key file read, local file create/write/sync).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The private key file could not be parsed or decrypted.
    #[error("invalid private key: {0}")]
    KeyInvalid(#[source] russh::keys::Error),

    /// Transport-level SSH failure from russh (dial, key exchange, channel).
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// SFTP subsystem failure that is neither not-found nor permission-denied.
    #[error("SFTP error: {0}")]
    Sftp(#[source] russh_sftp::client::error::Error),

    /// The address could not be resolved to any socket address.
    #[error("invalid address: {0}")]
    AddressInvalid(#[source] io::Error),

    /// The connection attempt did not complete within the configured bound.
    #[error("connection timeout after {0} seconds")]
    ConnectTimeout(u64),

    /// The server rejected the offered private key.
    #[error("key authentication failed: the private key was rejected by the server")]
    KeyAuthFailed,

    /// The server rejected the offered password.
    #[error("password authentication failed")]
    PasswordWrong,

    /// Host key verification failed (unknown or changed host key).
    #[error("host key verification failed for {host}:{port}")]
    ServerCheckFailed { host: String, port: u16 },

    /// The underlying transport is closed; no operations can be issued.
    #[error("not connected: the SSH session has been closed")]
    NotConnected,

    /// The remote path does not exist.
    #[error("remote file not found: {0}")]
    NotFound(String),

    /// The remote server refused access to the path.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
}

impl Error {
    /// Classify an SFTP error against the path that triggered it.
    ///
    /// Not-found and permission-denied status responses become their own
    /// variants so callers can tell them apart from generic protocol
    /// failures.
    pub(crate) fn from_sftp(err: russh_sftp::client::error::Error, path: &str) -> Self {
        if let russh_sftp::client::error::Error::Status(ref status) = err {
            match status.status_code {
                StatusCode::NoSuchFile => return Error::NotFound(path.to_string()),
                StatusCode::PermissionDenied => {
                    return Error::PermissionDenied(path.to_string())
                }
                _ => {}
            }
        }
        Error::Sftp(err)
    }

    /// Whether this error means the remote path does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// Result type for all operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use russh_sftp::protocol::Status;

    fn status_error(code: StatusCode) -> russh_sftp::client::error::Error {
        russh_sftp::client::error::Error::Status(Status {
            id: 0,
            status_code: code,
            error_message: String::new(),
            language_tag: String::new(),
        })
    }

    #[test]
    fn test_not_found_classification() {
        let err = Error::from_sftp(status_error(StatusCode::NoSuchFile), "/data/x.txt");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("/data/x.txt"));
    }

    #[test]
    fn test_permission_denied_classification() {
        let err = Error::from_sftp(status_error(StatusCode::PermissionDenied), "/root/secret");
        assert!(matches!(err, Error::PermissionDenied(ref p) if p == "/root/secret"));
    }

    #[test]
    fn test_generic_status_stays_sftp() {
        let err = Error::from_sftp(status_error(StatusCode::Failure), "/data/x.txt");
        assert!(matches!(err, Error::Sftp(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_error_display() {
        let err = Error::NotConnected;
        assert_eq!(
            err.to_string(),
            "not connected: the SSH session has been closed"
        );

        let err = Error::ConnectTimeout(30);
        assert_eq!(err.to_string(), "connection timeout after 30 seconds");

        let err = Error::ServerCheckFailed {
            host: "example.com".to_string(),
            port: 22,
        };
        assert_eq!(
            err.to_string(),
            "host key verification failed for example.com:22"
        );
    }
}
