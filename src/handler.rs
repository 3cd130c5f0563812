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

//! Host key verification policy and the russh client handler.
//!
//! Verification defaults to the user's `known_hosts` file. Accepting any
//! host key is possible but only through the explicit [`NoCheck`] opt-in;
//! it is never the silent default.
//!
//! [`NoCheck`]: ServerCheckMethod::NoCheck

use russh::client::Handler;
use russh::keys::PublicKey;

use crate::error::Error;

/// Server host key verification method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum ServerCheckMethod {
    /// Verify against `~/.ssh/known_hosts`.
    #[default]
    DefaultKnownHostsFile,
    /// Verify against a specific known_hosts file.
    KnownHostsFile(String),
    /// Accept any host key. Insecure; use only against trusted networks or
    /// throwaway test servers.
    NoCheck,
}

impl ServerCheckMethod {
    /// Convenience method to create a [`ServerCheckMethod`] from a file path.
    pub fn with_known_hosts_file(known_hosts_file: &str) -> Self {
        Self::KnownHostsFile(known_hosts_file.to_string())
    }
}

/// Client-side handler answering the transport library's host key query.
///
/// No host key algorithm restriction is applied here; the full negotiation
/// set offered by the library is used.
#[derive(Debug, Clone)]
pub(crate) struct ClientHandler {
    hostname: String,
    port: u16,
    server_check: ServerCheckMethod,
}

impl ClientHandler {
    pub(crate) fn new(hostname: String, port: u16, server_check: ServerCheckMethod) -> Self {
        Self {
            hostname,
            port,
            server_check,
        }
    }

    fn check_failed(&self) -> Error {
        Error::ServerCheckFailed {
            host: self.hostname.clone(),
            port: self.port,
        }
    }
}

impl Handler for ClientHandler {
    type Error = Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        match &self.server_check {
            ServerCheckMethod::NoCheck => {
                tracing::warn!(
                    "Host key verification disabled for {}:{}",
                    self.hostname,
                    self.port
                );
                Ok(true)
            }
            ServerCheckMethod::KnownHostsFile(known_hosts_path) => {
                russh::keys::known_hosts::check_known_hosts_path(
                    &self.hostname,
                    self.port,
                    server_public_key,
                    known_hosts_path,
                )
                .map_err(|_| self.check_failed())
            }
            ServerCheckMethod::DefaultKnownHostsFile => {
                russh::keys::known_hosts::check_known_hosts(
                    &self.hostname,
                    self.port,
                    server_public_key,
                )
                .map_err(|_| self.check_failed())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_known_hosts_checking() {
        assert_eq!(
            ServerCheckMethod::default(),
            ServerCheckMethod::DefaultKnownHostsFile
        );
    }

    #[test]
    fn test_with_known_hosts_file() {
        let method = ServerCheckMethod::with_known_hosts_file("/tmp/known_hosts");
        assert_eq!(
            method,
            ServerCheckMethod::KnownHostsFile("/tmp/known_hosts".to_string())
        );
    }
}
