use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::objects::PATH_SEPARATOR;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::path::{Component, Path};

/// Conflict-stage marker of a regular, non-conflicted entry
pub const NORMAL_STAGE: u8 = 0;

/// Key of an index entry: a workspace-relative path plus its stage
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, new)]
pub struct IndexKey {
    pub path: String,
    pub stage: u8,
}

impl IndexKey {
    pub fn normal(path: impl Into<String>) -> Self {
        Self::new(path.into(), NORMAL_STAGE)
    }

    /// Whether this entry sits at or below `path`
    pub fn is_within(&self, path: &str) -> bool {
        path.is_empty()
            || self.path == path
            || self
                .path
                .strip_prefix(path)
                .is_some_and(|rest| rest.starts_with(PATH_SEPARATOR))
    }
}

/// One staged file: `<path> <stage> <hash>`
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct IndexEntry {
    pub key: IndexKey,
    pub oid: ObjectId,
}

impl IndexEntry {
    /// Parse one line of the index file
    ///
    /// Fields are split from the right so the path itself may contain spaces.
    pub fn parse_line(line_number: usize, line: &str) -> Result<Self> {
        let mut fields = line.rsplitn(3, ' ');
        let (Some(hash), Some(stage), Some(path)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(Error::corrupt_index(
                line_number,
                "expected `<path> <stage> <hash>`",
            ));
        };

        if path.is_empty() {
            return Err(Error::corrupt_index(line_number, "empty path"));
        }
        let stage = stage
            .parse::<u8>()
            .map_err(|_| Error::corrupt_index(line_number, format!("invalid stage {stage:?}")))?;
        let oid = ObjectId::try_parse(hash)
            .map_err(|_| Error::corrupt_index(line_number, format!("invalid hash {hash:?}")))?;

        Ok(Self::new(IndexKey::new(path.to_string(), stage), oid))
    }

    pub fn to_line(&self) -> String {
        format!("{} {} {}", self.key.path, self.key.stage, self.oid)
    }

    /// Parent directories of the entry, outermost first
    ///
    /// `a/b/c` yields `["a", "a/b"]`.
    pub fn parent_dirs(&self) -> Vec<&str> {
        self.key
            .path
            .match_indices(PATH_SEPARATOR)
            .map(|(position, _)| &self.key.path[..position])
            .collect()
    }
}

/// Render a workspace-relative path with `/` separators
///
/// Segments holding a line break are rejected, since every index entry is a
/// single line.
pub fn to_index_path(path: &Path) -> Result<String> {
    let segments = path
        .components()
        .filter(|component| *component != Component::CurDir)
        .map(|component| match component {
            Component::Normal(segment) => segment
                .to_str()
                .filter(|segment| !segment.contains(['\n', '\r']))
                .map(str::to_string)
                .ok_or_else(|| Error::InvalidPath(format!("{path:?}"))),
            _ => Err(Error::InvalidPath(path.display().to_string())),
        })
        .collect::<Result<Vec<_>>>()?;

    if segments.is_empty() {
        return Err(Error::InvalidPath(path.display().to_string()));
    }

    Ok(segments.join(&PATH_SEPARATOR.to_string()))
}
