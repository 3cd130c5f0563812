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

//! Authentication methods for the SSH session.
//!
//! Key-file authentication is the primary path. Password authentication is a
//! real fallback rather than dead configuration state. Secrets are held in
//! [`Zeroizing`] wrappers so they are wiped on drop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use russh::client::Handle;
use russh::keys::{self, PrivateKey, PrivateKeyWithHashAlg};
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::handler::ClientHandler;

/// An authentication token used when connecting a client.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AuthMethod {
    /// Password authentication.
    Password(Zeroizing<String>),
    /// Private key material already held in memory.
    PrivateKey {
        /// Entire contents of a private key file.
        key_data: Zeroizing<String>,
        key_pass: Option<Zeroizing<String>>,
    },
    /// Private key loaded from a file on disk.
    PrivateKeyFile {
        key_file_path: PathBuf,
        key_pass: Option<Zeroizing<String>>,
    },
}

impl AuthMethod {
    /// Convenience method to create an [`AuthMethod`] from a password.
    pub fn with_password(password: &str) -> Self {
        Self::Password(Zeroizing::new(password.to_string()))
    }

    pub fn with_key(key: &str, passphrase: Option<&str>) -> Self {
        Self::PrivateKey {
            key_data: Zeroizing::new(key.to_string()),
            key_pass: passphrase.map(|p| Zeroizing::new(p.to_string())),
        }
    }

    pub fn with_key_file<T: AsRef<Path>>(key_file_path: T, passphrase: Option<&str>) -> Self {
        Self::PrivateKeyFile {
            key_file_path: key_file_path.as_ref().to_path_buf(),
            key_pass: passphrase.map(|p| Zeroizing::new(p.to_string())),
        }
    }

    /// Resolve this method into credentials that are ready to offer.
    ///
    /// Key material is read and parsed here, before any network dial, so a
    /// missing or malformed key file fails early with [`Error::Io`] or
    /// [`Error::KeyInvalid`] and never leaves a half-usable client behind.
    pub(crate) fn resolve(&self) -> Result<ResolvedAuth> {
        match self {
            AuthMethod::Password(password) => Ok(ResolvedAuth::Password(password.clone())),
            AuthMethod::PrivateKey { key_data, key_pass } => {
                let key =
                    keys::decode_secret_key(key_data, key_pass.as_deref().map(String::as_str))
                        .map_err(Error::KeyInvalid)?;
                Ok(ResolvedAuth::PrivateKey(Arc::new(key)))
            }
            AuthMethod::PrivateKeyFile {
                key_file_path,
                key_pass,
            } => {
                tracing::debug!("Loading private key from {:?}", key_file_path);
                let key_data = std::fs::read_to_string(key_file_path)?;
                let key =
                    keys::decode_secret_key(&key_data, key_pass.as_deref().map(String::as_str))
                        .map_err(Error::KeyInvalid)?;
                Ok(ResolvedAuth::PrivateKey(Arc::new(key)))
            }
        }
    }
}

/// Parsed credentials, ready to be offered to the server.
pub(crate) enum ResolvedAuth {
    Password(Zeroizing<String>),
    PrivateKey(Arc<PrivateKey>),
}

impl ResolvedAuth {
    /// Perform authentication on a freshly dialed handle.
    pub(crate) async fn authenticate(
        self,
        handle: &mut Handle<ClientHandler>,
        username: &str,
    ) -> Result<()> {
        match self {
            ResolvedAuth::Password(password) => {
                tracing::debug!("Authenticating with password");
                let auth_result = handle.authenticate_password(username, &**password).await?;
                if !auth_result.success() {
                    return Err(Error::PasswordWrong);
                }
            }
            ResolvedAuth::PrivateKey(key) => {
                tracing::debug!("Authenticating with private key");
                let auth_result = handle
                    .authenticate_publickey(
                        username,
                        PrivateKeyWithHashAlg::new(
                            key,
                            handle.best_supported_rsa_hash().await?.flatten(),
                        ),
                    )
                    .await?;
                if !auth_result.success() {
                    return Err(Error::KeyAuthFailed);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_with_key_file_keeps_path_and_passphrase() {
        let auth = AuthMethod::with_key_file("/home/user/.ssh/id_ed25519", Some("secret"));
        match auth {
            AuthMethod::PrivateKeyFile {
                key_file_path,
                key_pass,
            } => {
                assert_eq!(key_file_path, PathBuf::from("/home/user/.ssh/id_ed25519"));
                assert_eq!(key_pass.as_deref().map(String::as_str), Some("secret"));
            }
            other => panic!("unexpected auth method: {other:?}"),
        }
    }

    #[test]
    fn test_resolve_malformed_key_data() {
        let auth = AuthMethod::with_key("this is not a private key", None);
        match auth.resolve() {
            Err(Error::KeyInvalid(_)) => {}
            other => panic!("expected KeyInvalid, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn test_resolve_malformed_key_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "-----BEGIN GARBAGE-----").unwrap();
        writeln!(file, "not base64 at all").unwrap();
        writeln!(file, "-----END GARBAGE-----").unwrap();

        let auth = AuthMethod::with_key_file(file.path(), None);
        assert!(matches!(auth.resolve(), Err(Error::KeyInvalid(_))));
    }

    #[test]
    fn test_resolve_missing_key_file() {
        let auth = AuthMethod::with_key_file("/this/key/does/not/exist", None);
        assert!(matches!(auth.resolve(), Err(Error::Io(_))));
    }

    #[test]
    fn test_resolve_password_passthrough() {
        let auth = AuthMethod::with_password("hunter2");
        assert!(matches!(
            auth.resolve(),
            Ok(ResolvedAuth::Password(ref p)) if p.as_str() == "hunter2"
        ));
    }
}
