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

//! Tests for draining a batch of open file streams into a local directory.
//!
//! `persist_all` is generic over the stream type, so these tests drive it
//! with in-memory readers instead of a live SFTP session.

use std::collections::HashMap;
use std::io::Cursor;

use sftp_fetch::{persist_all, Error};
use tempfile::TempDir;

fn batch(entries: &[(&str, &[u8])]) -> HashMap<String, Cursor<Vec<u8>>> {
    entries
        .iter()
        .map(|(name, data)| (name.to_string(), Cursor::new(data.to_vec())))
        .collect()
}

#[tokio::test]
async fn test_persist_all_writes_byte_identical_copies() {
    let dir = TempDir::new().unwrap();

    let stream_a = b"first file contents\n".as_slice();
    let stream_b = b"\x00\x01\x02binary\xffpayload".as_slice();
    let files = batch(&[("x.txt", stream_a), ("y.txt", stream_b)]);

    persist_all(files, dir.path()).await.unwrap();

    assert_eq!(std::fs::read(dir.path().join("x.txt")).unwrap(), stream_a);
    assert_eq!(std::fs::read(dir.path().join("y.txt")).unwrap(), stream_b);
}

#[tokio::test]
async fn test_persist_all_overwrites_instead_of_appending() {
    let dir = TempDir::new().unwrap();

    let long = b"a much longer first version of the file".as_slice();
    persist_all(batch(&[("x.txt", long)]), dir.path())
        .await
        .unwrap();

    let short = b"short".as_slice();
    persist_all(batch(&[("x.txt", short)]), dir.path())
        .await
        .unwrap();

    // Truncated to exactly the new contents, not appended and not padded
    // with leftovers from the first run.
    assert_eq!(std::fs::read(dir.path().join("x.txt")).unwrap(), short);
}

#[tokio::test]
async fn test_persist_all_empty_batch_is_a_noop() {
    let dir = TempDir::new().unwrap();

    let files: HashMap<String, Cursor<Vec<u8>>> = HashMap::new();
    persist_all(files, dir.path()).await.unwrap();

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_persist_all_fails_fast_on_unwritable_directory() {
    let files = batch(&[("x.txt", b"contents".as_slice())]);

    let result = persist_all(files, "/this/directory/does/not/exist").await;

    assert!(matches!(result, Err(Error::Io(_))));
}
