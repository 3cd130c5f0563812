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

//! The SFTP client: session establishment and remote file operations.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::io;
use std::sync::Arc;

use russh::client::{Config, Handle};
use russh::Disconnect;
use russh_sftp::client::SftpSession;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::config::ConnectOptions;
use crate::error::{Error, Result};
use crate::handler::ClientHandler;

/// An open, readable remote file stream tied to one path on one session.
///
/// Owned by the caller once returned. The [`RemoteFileClient`] it came from
/// must outlive it for reads to succeed.
pub type RemoteFileHandle = russh_sftp::client::fs::File;

/// A transient mapping from file name to its open handle, built per
/// [`RemoteFileClient::list_open_files`] call.
pub type RemoteDirectoryListing = HashMap<String, RemoteFileHandle>;

/// An authenticated SFTP session to a remote host.
///
/// Construction via [`connect`] either yields a client whose session is fully
/// authenticated with the SFTP subsystem negotiated, or an error. There is no
/// partially-initialized state: if you hold a `RemoteFileClient`, it was
/// usable at construction time.
///
/// The client is built for single-owner sequential use. For concurrent
/// transfers, open one client per worker.
///
/// [`connect`]: RemoteFileClient::connect
pub struct RemoteFileClient {
    connection_handle: Arc<Handle<ClientHandler>>,
    sftp: SftpSession,
    host: String,
    port: u16,
    username: String,
    protocol: String,
}

impl RemoteFileClient {
    /// Open an authenticated SFTP session to a remote host.
    ///
    /// Key material is read and parsed before anything touches the network,
    /// so a missing or malformed key file fails with [`Error::Io`] /
    /// [`Error::KeyInvalid`] without a dial attempt. The dial, authentication
    /// and subsystem negotiation together are bounded by
    /// `options.connect_timeout`.
    pub async fn connect(options: ConnectOptions) -> Result<Self> {
        let resolved = options.auth.resolve()?;
        let timeout_secs = options.connect_timeout.as_secs();

        tracing::debug!("Connecting to {}:{}", options.host, options.port);

        match tokio::time::timeout(
            options.connect_timeout,
            Self::connect_inner(&options, resolved),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(Error::ConnectTimeout(timeout_secs)),
        }
    }

    async fn connect_inner(
        options: &ConnectOptions,
        resolved: crate::auth::ResolvedAuth,
    ) -> Result<Self> {
        let config = Arc::new(Config::default());

        // Connection loop inspired by std::net::TcpStream::connect: try each
        // resolved address until one accepts.
        let addrs = tokio::net::lookup_host((options.host.as_str(), options.port))
            .await
            .map_err(Error::AddressInvalid)?;

        let mut connect_res: Result<Handle<ClientHandler>> =
            Err(Error::AddressInvalid(io::Error::new(
                io::ErrorKind::InvalidInput,
                "could not resolve to any addresses",
            )));
        for addr in addrs {
            let handler = ClientHandler::new(
                options.host.clone(),
                options.port,
                options.server_check.clone(),
            );
            match russh::client::connect(config.clone(), addr, handler).await {
                Ok(handle) => {
                    connect_res = Ok(handle);
                    break;
                }
                Err(e) => connect_res = Err(e.into()),
            }
        }
        let mut handle = connect_res?;

        resolved.authenticate(&mut handle, &options.username).await?;

        tracing::debug!("Authenticated; negotiating SFTP subsystem");

        let channel = handle.channel_open_session().await?;
        channel.request_subsystem(true, "sftp").await?;
        let sftp = SftpSession::new(channel.into_stream())
            .await
            .map_err(Error::Sftp)?;

        tracing::debug!(
            "SFTP session established for {}@{}:{}",
            options.username,
            options.host,
            options.port
        );

        Ok(Self {
            connection_handle: Arc::new(handle),
            sftp,
            host: options.host.clone(),
            port: options.port,
            username: options.username.clone(),
            protocol: options.protocol.clone(),
        })
    }

    /// Open the remote file `directory/file_name` for reading.
    ///
    /// The returned handle is positioned at offset 0. A missing path yields
    /// [`Error::NotFound`], a refused one [`Error::PermissionDenied`].
    pub async fn open_file(&self, directory: &str, file_name: &str) -> Result<RemoteFileHandle> {
        self.ensure_connected()?;
        let path = join_remote(directory, file_name);
        tracing::debug!("Opening remote file {}", path);
        self.sftp
            .open(&path)
            .await
            .map_err(|e| Error::from_sftp(e, &path))
    }

    /// Remove the remote file `directory/file_name`.
    pub async fn delete_file(&self, directory: &str, file_name: &str) -> Result<()> {
        self.ensure_connected()?;
        let path = join_remote(directory, file_name);
        tracing::debug!("Removing remote file {}", path);
        self.sftp
            .remove_file(&path)
            .await
            .map_err(|e| Error::from_sftp(e, &path))
    }

    /// List `directory` and open every entry for reading.
    ///
    /// All-or-nothing: if any entry fails to open, every handle opened so far
    /// is closed and the error is returned; no partial listing escapes.
    ///
    /// Subdirectory entries are not filtered out; attempting to open one
    /// surfaces the server's error and therefore aborts the listing.
    pub async fn list_open_files(&self, directory: &str) -> Result<RemoteDirectoryListing> {
        self.ensure_connected()?;
        tracing::debug!("Listing remote directory {}", directory);

        let entries = self
            .sftp
            .read_dir(directory)
            .await
            .map_err(|e| Error::from_sftp(e, directory))?;

        let names: Vec<String> = entries
            .map(|entry| entry.file_name())
            .filter(|name| name.as_str() != "." && name.as_str() != "..")
            .collect();

        let files = match open_all(names, |name| async move {
            self.open_file(directory, &name).await
        })
        .await
        {
            Ok(files) => files,
            Err(e) => {
                tracing::debug!("Aborting listing of {}: {}", directory, e);
                return Err(e);
            }
        };

        tracing::debug!("Opened {} files under {}", files.len(), directory);
        Ok(files)
    }

    /// Close the underlying SSH session.
    pub async fn disconnect(&self) -> Result<()> {
        self.connection_handle
            .disconnect(Disconnect::ByApplication, "", "")
            .await
            .map_err(Error::Ssh)
    }

    /// Whether the underlying transport has been closed.
    pub fn is_closed(&self) -> bool {
        self.connection_handle.is_closed()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The stored transfer protocol label (informational only).
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connection_handle.is_closed() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }
}

impl Debug for RemoteFileClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteFileClient")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("protocol", &self.protocol)
            .field("connection_handle", &"Handle<ClientHandler>")
            .finish()
    }
}

/// Join a remote directory and file name with forward-slash semantics.
///
/// Remote paths are always slash-separated regardless of the local platform.
fn join_remote(directory: &str, file_name: &str) -> String {
    if directory.is_empty() {
        return file_name.to_string();
    }
    format!("{}/{}", directory.trim_end_matches('/'), file_name)
}

/// Open every name through `open`, accumulating a name → handle mapping.
///
/// All-or-nothing: the first failed open closes every handle opened so far
/// and returns the error, so no partial mapping escapes and nothing after
/// the failing entry is opened.
async fn open_all<H, F, Fut>(names: Vec<String>, mut open: F) -> Result<HashMap<String, H>>
where
    H: AsyncWrite + Unpin,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<H>>,
{
    let mut files = HashMap::new();
    for name in names {
        match open(name.clone()).await {
            Ok(handle) => {
                files.insert(name, handle);
            }
            Err(e) => {
                close_all(files).await;
                return Err(e);
            }
        }
    }
    Ok(files)
}

/// Close a batch of handles, ignoring individual close failures.
async fn close_all<H>(files: HashMap<String, H>)
where
    H: AsyncWrite + Unpin,
{
    for (name, mut handle) in files {
        if let Err(e) = handle.shutdown().await {
            tracing::debug!("Failed to close handle for {}: {}", name, e);
        }
    }
}
