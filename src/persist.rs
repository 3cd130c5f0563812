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

//! Local persistence for batches of open remote file handles.

use std::collections::HashMap;
use std::path::Path;

use tokio::io::{AsyncRead, AsyncWriteExt};

use crate::error::Result;

/// Drain a batch of open file streams into `local_directory`.
///
/// For each `(name, stream)` pair, creates (or truncates) a local file at
/// `local_directory/name`, copies the full stream into it, and flushes the
/// write to durable storage. Re-running with the same names overwrites; it
/// never appends.
///
/// Fail-fast: the first create, copy, or sync error aborts the batch and is
/// returned. Files already persisted remain on disk (no rollback); callers
/// needing atomicity must pre-validate or post-verify.
///
/// The batch is consumed: each stream is dropped (closed) once its copy
/// completes or the batch aborts. Iteration order is unspecified, and the
/// persisted files are independent of one another.
///
/// Generic over the stream type, so it accepts
/// [`RemoteFileHandle`](crate::client::RemoteFileHandle)s from
/// [`list_open_files`](crate::client::RemoteFileClient::list_open_files) as
/// well as any other async readers.
pub async fn persist_all<R>(
    files: HashMap<String, R>,
    local_directory: impl AsRef<Path>,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let local_directory = local_directory.as_ref();

    for (name, mut stream) in files {
        let local_path = local_directory.join(&name);
        tracing::debug!("Persisting {:?}", local_path);

        let mut local_file = tokio::fs::File::create(&local_path).await?;
        tokio::io::copy(&mut stream, &mut local_file).await?;
        local_file.flush().await?;
        local_file.sync_all().await?;
    }

    Ok(())
}
