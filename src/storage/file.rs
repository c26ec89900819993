//! File-backed storage backend.
//!
//! One file per key inside `<root>/file_storage`. File contents are the
//! codec's textual form of the value; file names come from an injectable
//! key-to-file-name function. All I/O goes through `tokio::fs`, which runs it
//! on the blocking thread pool rather than on the calling task's thread.

use std::fmt::{self, Display};
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::StorageResult;
use crate::storage::{Codec, Storage};

/// Name of the managed directory under the application root.
pub const STORAGE_DIR_NAME: &str = "file_storage";

/// Maps a key to the name of its file.
pub type KeyToFileName<K> = Arc<dyn Fn(&K) -> String + Send + Sync>;

// == Key To File Name ==
/// Replaces every character outside `[a-zA-Z0-9._-]` with `_`.
///
/// Distinct keys can collapse onto the same name (`"a b"` and `"a/b"` both
/// become `"a_b"`); use [`hashed_file_name`] when keys are not known to be
/// file-safe already. Names that would address the directory itself
/// (`""`, `"."`, `".."`) are replaced with underscores.
pub fn sanitize_file_name(name: &str) -> String {
    match name {
        "" => "_".to_string(),
        "." | ".." => "_".repeat(name.len()),
        _ => name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect(),
    }
}

/// Lowercase hex SHA-256 of the name. Collision resistant, not human readable.
pub fn hashed_file_name(name: &str) -> String {
    hex::encode(Sha256::digest(name.as_bytes()))
}

/// Name of the temporary file a write of `file_name` goes through.
///
/// Fixed length regardless of the target name, so any name the file system
/// accepts for the target also fits its temp file. '~' never appears in
/// sanitized or hashed names.
fn temp_file_name(file_name: &str) -> String {
    format!("~{}.tmp", &hashed_file_name(file_name)[..16])
}

// == File Storage ==
/// Storage writing each entry to its own file.
pub struct FileStorage<K, V, C> {
    dir: PathBuf,
    dir_ready: bool,
    codec: C,
    key_to_file_name: KeyToFileName<K>,
    _marker: PhantomData<fn() -> V>,
}

fn sanitized_key_name<K: Display>(key: &K) -> String {
    sanitize_file_name(&key.to_string())
}

fn hashed_key_name<K: Display>(key: &K) -> String {
    hashed_file_name(&key.to_string())
}

impl<K, V, C> FileStorage<K, V, C>
where
    K: Display + 'static,
{
    // == Constructor ==
    /// Creates a storage rooted at `<root>/file_storage` using sanitized
    /// `Display` output of keys as file names.
    ///
    /// The directory is created on first write, not here.
    pub fn new(root: impl AsRef<Path>, codec: C) -> Self {
        Self {
            dir: root.as_ref().join(STORAGE_DIR_NAME),
            dir_ready: false,
            codec,
            key_to_file_name: Arc::new(sanitized_key_name::<K>),
            _marker: PhantomData,
        }
    }

    /// Switches to SHA-256 file names.
    pub fn hashed(self) -> Self {
        self.with_key_to_file_name(hashed_key_name::<K>)
    }
}

impl<K, V, C> FileStorage<K, V, C> {
    /// Replaces the key-to-file-name function.
    pub fn with_key_to_file_name<F>(mut self, f: F) -> Self
    where
        F: Fn(&K) -> String + Send + Sync + 'static,
    {
        self.key_to_file_name = Arc::new(f);
        self
    }

    /// The managed directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &K) -> PathBuf {
        self.dir.join((self.key_to_file_name)(key))
    }

    async fn ensure_dir(&mut self) -> std::io::Result<()> {
        if !self.dir_ready {
            fs::create_dir_all(&self.dir).await?;
            self.dir_ready = true;
        }
        Ok(())
    }
}

impl<K, V, C> fmt::Debug for FileStorage<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStorage")
            .field("dir", &self.dir)
            .field("dir_ready", &self.dir_ready)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<K, V, C> Storage<K, V> for FileStorage<K, V, C>
where
    K: Send + Sync + 'static,
    V: Send + 'static,
    C: Codec<V> + 'static,
{
    async fn put(&mut self, key: &K, value: V) -> StorageResult<()> {
        self.ensure_dir().await?;

        let text = self.codec.encode(&value)?;
        let file_name = (self.key_to_file_name)(key);
        let path = self.dir.join(&file_name);
        let tmp_path = self.dir.join(temp_file_name(&file_name));

        match fs::write(&tmp_path, &text).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // Directory removed behind our back
                warn!(dir = %self.dir.display(), "Storage directory missing, recreating");
                self.dir_ready = false;
                self.ensure_dir().await?;
                fs::write(&tmp_path, &text).await?;
            }
            Err(e) => return Err(e.into()),
        }
        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        debug!(path = %path.display(), "Wrote cache file");
        Ok(())
    }

    async fn get(&mut self, key: &K) -> StorageResult<Option<V>> {
        let path = self.path_for(key);

        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!(path = %path.display(), "Cache file is not valid UTF-8, treating as absent");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match self.codec.decode(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unreadable cache file, treating as absent");
                Ok(None)
            }
        }
    }

    async fn remove(&mut self, key: &K) -> StorageResult<()> {
        let path = self.path_for(key);

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn clear(&mut self) -> StorageResult<()> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0usize;
        let mut failed = 0usize;

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    failed += 1;
                    warn!(dir = %self.dir.display(), error = %e, "Failed to list cache directory");
                    break;
                }
            };
            let path = entry.path();
            if let Ok(file_type) = entry.file_type().await {
                if file_type.is_dir() {
                    continue;
                }
            }

            match fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    failed += 1;
                    warn!(path = %path.display(), error = %e, "Failed to delete cache file");
                }
            }
        }

        debug!(dir = %self.dir.display(), removed, failed, "Cleared file storage");
        Ok(())
    }
}
