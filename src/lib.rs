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

//! A minimal client wrapper for transferring files over SFTP, powered by
//! russh and russh-sftp.
//!
//! The wire protocol, key exchange and file-transfer semantics are entirely
//! delegated to the transport libraries; this crate is the thin orchestration
//! on top: establish an authenticated session, map remote listings to open
//! file handles, and persist them locally.
//!
//! # Example
//!
//! ```no_run
//! use sftp_fetch::{persist_all, AuthMethod, ConnectOptions, RemoteFileClient};
//!
//! #[tokio::main]
//! async fn main() -> sftp_fetch::Result<()> {
//!     let options = ConnectOptions::new(
//!         "files.example.com",
//!         "deploy",
//!         AuthMethod::with_key_file("/home/deploy/.ssh/id_ed25519", None),
//!     );
//!
//!     let client = RemoteFileClient::connect(options).await?;
//!     let files = client.list_open_files("/upload/inbox").await?;
//!     persist_all(files, "/var/spool/inbox").await?;
//!     client.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod persist;

pub use auth::AuthMethod;
pub use client::{RemoteDirectoryListing, RemoteFileClient, RemoteFileHandle};
pub use config::ConnectOptions;
pub use error::{Error, Result};
pub use handler::ServerCheckMethod;
pub use persist::persist_all;
