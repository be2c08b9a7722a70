use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::objects::OBJECT_ID_LENGTH;

/// Kind tag of a stored object
///
/// The tag is part of the framed bytes on disk (`<kind> <len>\0<payload>`),
/// so the kind of any stored object is known without looking at its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    /// Split a framed object into its kind tag and payload
    pub fn parse_header(framed: &[u8]) -> Result<(ObjectType, &[u8])> {
        let nul = framed
            .iter()
            .position(|byte| *byte == 0)
            .ok_or_else(|| Error::corrupt_object("<unknown>", "missing header terminator"))?;
        let (header, payload) = (&framed[..nul], &framed[nul + 1..]);

        let header = std::str::from_utf8(header)
            .map_err(|_| Error::corrupt_object("<unknown>", "header is not utf-8"))?;
        let (kind, size) = header
            .split_once(' ')
            .ok_or_else(|| Error::corrupt_object("<unknown>", "header has no size"))?;

        let object_type = ObjectType::try_from(kind)?;
        let size = size
            .parse::<usize>()
            .map_err(|_| Error::corrupt_object("<unknown>", format!("invalid size {size}")))?;

        if size != payload.len() {
            return Err(Error::corrupt_object(
                "<unknown>",
                format!("declared size {size} but payload has {} bytes", payload.len()),
            ));
        }

        Ok((object_type, payload))
    }

    /// Classify an untagged payload by its shape
    ///
    /// A payload whose first line is `commit <hash>` is a commit, a non-empty
    /// payload made only of `<blob|tree> <hash> <name>` lines is a tree, and
    /// everything else is a blob.
    pub fn infer(payload: &[u8]) -> ObjectType {
        let Ok(text) = std::str::from_utf8(payload) else {
            return ObjectType::Blob;
        };

        let first_line = text.lines().next().unwrap_or_default();
        if let Some(("commit", hash)) = first_line.split_once(' ')
            && is_hex_digest(hash)
        {
            return ObjectType::Commit;
        }

        let mut lines = text.lines().filter(|line| !line.is_empty()).peekable();
        if lines.peek().is_some() && lines.all(is_tree_line) {
            ObjectType::Tree
        } else {
            ObjectType::Blob
        }
    }
}

fn is_hex_digest(text: &str) -> bool {
    text.len() == OBJECT_ID_LENGTH && text.chars().all(|c| c.is_ascii_hexdigit())
}

fn is_tree_line(line: &str) -> bool {
    let mut fields = line.splitn(3, ' ');

    matches!(
        (fields.next(), fields.next(), fields.next()),
        (Some("blob" | "tree"), Some(hash), Some(name)) if is_hex_digest(hash) && !name.is_empty()
    )
}

impl TryFrom<&str> for ObjectType {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            _ => Err(Error::corrupt_object(
                "<unknown>",
                format!("invalid object type {value}"),
            )),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
