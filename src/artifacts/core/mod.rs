//! Core utilities and shared types
//!
//! This module contains the pieces every area of the repository leans on:
//!
//! - `config`: the JSON repository configuration
//! - `error`: the typed error returned by all areas
//! - [`write_atomically`]: temp-file-and-rename writes for objects, index and refs
//! - [`LockFile`]: an exclusive advisory lock that serializes writers across processes

pub mod config;
pub mod error;

use crate::artifacts::core::error::{Error, Result, StorageContext};
use fake::rand;
use file_guard::{FileGuard, Lock};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Replace the file at `path` with `content` in a single rename
///
/// The content is first written and flushed to a uniquely named sibling, so
/// readers observe either the previous file or the complete new one.
pub fn write_atomically(path: &Path, content: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| Error::InvalidPath(path.display().to_string()))?;
    std::fs::create_dir_all(dir).at_path(dir)?;

    let temp_path = dir.join(generate_temp_name());
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .at_path(&temp_path)?;

    file.write_all(content).at_path(&temp_path)?;
    file.sync_all().at_path(&temp_path)?;

    std::fs::rename(&temp_path, path).at_path(path)
}

fn generate_temp_name() -> String {
    format!("tmp-{}-{}", std::process::id(), rand::random::<u32>())
}

/// Exclusive lock guarding read-modify-write cycles on a single file
///
/// The lock lives on a `<name>.lock` sibling of the guarded file and is
/// released when the value is dropped.
pub struct LockFile {
    path: PathBuf,
    _guard: FileGuard<Box<File>>,
}

impl LockFile {
    pub fn acquire(target: &Path) -> Result<Self> {
        let path = Self::lock_path(target)?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).at_path(dir)?;
        }

        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .at_path(&path)?;
        let guard = file_guard::lock(Box::new(file), Lock::Exclusive, 0, 1).at_path(&path)?;

        tracing::trace!(lock = %path.display(), "lock acquired");

        Ok(LockFile {
            path,
            _guard: guard,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(target: &Path) -> Result<PathBuf> {
        let file_name = target
            .file_name()
            .ok_or_else(|| Error::InvalidPath(target.display().to_string()))?;

        Ok(target.with_file_name(format!("{}.lock", file_name.to_string_lossy())))
    }
}
