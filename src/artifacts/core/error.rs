//! Typed failures of the repository engine
//!
//! Every area (database, index, refs, workspace) reports failures through
//! [`Error`], so the command layer can tell an unknown object apart from a
//! broken HEAD or a failing disk and map each one to its own exit code.

use crate::artifacts::objects::object_id::ObjectId;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("cannot resolve ref {name}: {reason}")]
    RefResolution { name: String, reason: String },

    #[error("storage failure at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt object {oid}: {reason}")]
    CorruptObject { oid: String, reason: String },

    #[error("corrupt index at line {line}: {reason}")]
    CorruptIndex { line: usize, reason: String },

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("not a bitlet repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("operation requires a working copy, but the repository is bare")]
    BareRepository,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn storage(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn ref_resolution(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RefResolution {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn corrupt_object(oid: impl ToString, reason: impl Into<String>) -> Self {
        Self::CorruptObject {
            oid: oid.to_string(),
            reason: reason.into(),
        }
    }

    pub fn corrupt_index(line: usize, reason: impl Into<String>) -> Self {
        Self::CorruptIndex {
            line,
            reason: reason.into(),
        }
    }

    /// Process exit code reported by the binary for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ObjectNotFound(_) => 3,
            Error::RefResolution { .. } => 4,
            Error::Storage { .. } => 5,
            Error::CorruptObject { .. } | Error::CorruptIndex { .. } => 6,
            Error::InvalidObjectId(_) | Error::InvalidPath(_) => 7,
            Error::Config(_) => 8,
            Error::NotARepository(_) => 9,
            Error::BareRepository => 10,
        }
    }
}

/// Attach the failing path to a raw I/O result
pub trait StorageContext<T> {
    fn at_path(self, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> StorageContext<T> for std::io::Result<T> {
    fn at_path(self, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::storage(path, source))
    }
}
