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

//! Connection parameters for [`RemoteFileClient`].
//!
//! [`RemoteFileClient`]: crate::client::RemoteFileClient

use std::time::Duration;

use crate::auth::AuthMethod;
use crate::handler::ServerCheckMethod;

// SSH connection timeout design:
// - 30 seconds accommodates slow networks and SSH negotiation
// - Industry standard for SSH client connections
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Parameters for establishing an authenticated SFTP session.
///
/// Host key verification defaults to the user's `known_hosts` file and the
/// connect timeout defaults to 30 seconds; both can be overridden with the
/// `with_*` methods.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub host: String,
    pub port: u16,
    pub username: String,
    /// Transfer protocol label. Informational only; the session is always
    /// negotiated as SFTP over SSH.
    pub protocol: String,
    pub auth: AuthMethod,
    pub server_check: ServerCheckMethod,
    pub connect_timeout: Duration,
}

impl ConnectOptions {
    pub fn new(host: impl Into<String>, username: impl Into<String>, auth: AuthMethod) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: username.into(),
            protocol: "sftp".to_string(),
            auth,
            server_check: ServerCheckMethod::default(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    pub fn with_server_check(mut self, server_check: ServerCheckMethod) -> Self {
        self.server_check = server_check;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}
