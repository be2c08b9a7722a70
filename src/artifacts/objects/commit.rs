//! Commit object
//!
//! Commits bind a root tree snapshot to its parent commits, a timestamp and a
//! free-text message. They are immutable once written.
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! commit <tree-sha>
//! parent <parent-sha>
//! Date: <rfc2822 timestamp>
//!
//! <commit message>
//! ```

use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};

/// Environment variable overriding the commit timestamp
pub const COMMIT_DATE_ENV: &str = "BITLET_COMMIT_DATE";

/// Accepted layout of [`COMMIT_DATE_ENV`]
pub const COMMIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Root tree of the snapshot
    tree_oid: ObjectId,
    /// Parent commit IDs (empty for a root commit)
    parents: Vec<ObjectId>,
    timestamp: DateTime<FixedOffset>,
    message: String,
}

impl Commit {
    pub fn new(
        tree_oid: ObjectId,
        parents: Vec<ObjectId>,
        timestamp: DateTime<FixedOffset>,
        message: String,
    ) -> Self {
        Commit {
            tree_oid,
            parents,
            timestamp,
            message,
        }
    }

    /// Timestamp for a new commit
    ///
    /// Uses [`COMMIT_DATE_ENV`] when it is set and well formed, the local clock otherwise.
    pub fn timestamp_from_env() -> DateTime<FixedOffset> {
        std::env::var(COMMIT_DATE_ENV)
            .ok()
            .and_then(|date| DateTime::parse_from_str(&date, COMMIT_DATE_FORMAT).ok())
            .unwrap_or_else(|| chrono::Local::now().fixed_offset())
    }

    /// Extract the tree hash from a raw commit payload
    ///
    /// Returns `None` when the payload is not shaped like a commit.
    pub fn tree_oid_of(payload: &[u8]) -> Option<ObjectId> {
        if ObjectType::infer(payload) != ObjectType::Commit {
            return None;
        }

        let text = std::str::from_utf8(payload).ok()?;
        let first_line = text.lines().next()?;
        let (_, hash) = first_line.split_once(' ')?;

        ObjectId::try_parse(hash).ok()
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// First line of the commit message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    fn header_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("commit {}", self.tree_oid)];
        for parent in &self.parents {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("Date: {}", self.timestamp.to_rfc2822()));

        lines
    }
}

impl Packable for Commit {
    fn serialize(&self) -> Result<Bytes> {
        let content = format!("{}\n\n{}", self.header_lines().join("\n"), self.message);

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Commit {
    fn deserialize(oid: &ObjectId, payload: Bytes) -> Result<Self> {
        let content = std::str::from_utf8(&payload)
            .map_err(|_| Error::corrupt_object(oid, "commit payload is not utf-8"))?;
        let (header, message) = content
            .split_once("\n\n")
            .ok_or_else(|| Error::corrupt_object(oid, "commit has no message separator"))?;

        let mut lines = header.lines();

        let tree_oid = lines
            .next()
            .and_then(|line| line.strip_prefix("commit "))
            .ok_or_else(|| Error::corrupt_object(oid, "missing commit line"))
            .and_then(|hash| {
                ObjectId::try_parse(hash)
                    .map_err(|_| Error::corrupt_object(oid, format!("invalid tree hash {hash:?}")))
            })?;

        // zero or more parent lines precede the date
        let mut parents = Vec::new();
        let mut next_line = lines
            .next()
            .ok_or_else(|| Error::corrupt_object(oid, "missing date line"))?;

        while let Some(parent) = next_line.strip_prefix("parent ") {
            parents.push(ObjectId::try_parse(parent).map_err(|_| {
                Error::corrupt_object(oid, format!("invalid parent hash {parent:?}"))
            })?);

            next_line = lines
                .next()
                .ok_or_else(|| Error::corrupt_object(oid, "missing date line"))?;
        }

        let timestamp = next_line
            .strip_prefix("Date: ")
            .and_then(|date| DateTime::parse_from_rfc2822(date).ok())
            .ok_or_else(|| Error::corrupt_object(oid, format!("invalid date line {next_line:?}")))?;

        Ok(Self::new(tree_oid, parents, timestamp, message.to_string()))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }
}
