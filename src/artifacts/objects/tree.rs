//! Tree object
//!
//! A tree records one directory level: an ordered list of names, each pointing
//! either at a blob (file) or at another tree (subdirectory).
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry is one line: `<blob|tree> <hash> <name>\n`
//!
//! Entries keep the order in which they were inserted; they are never re-sorted.

use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;

/// Target of a single tree entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEntry {
    /// File content
    Blob(ObjectId),
    /// Nested directory
    Tree(ObjectId),
}

impl TreeEntry {
    pub fn object_type(&self) -> ObjectType {
        match self {
            TreeEntry::Blob(_) => ObjectType::Blob,
            TreeEntry::Tree(_) => ObjectType::Tree,
        }
    }

    pub fn oid(&self) -> &ObjectId {
        match self {
            TreeEntry::Blob(oid) | TreeEntry::Tree(oid) => oid,
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, TreeEntry::Tree(_))
    }
}

/// One stored directory level
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<(String, TreeEntry)>,
}

impl Tree {
    pub fn new(entries: Vec<(String, TreeEntry)>) -> Self {
        Tree { entries }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &TreeEntry)> {
        self.entries.iter().map(|(name, entry)| (name, entry))
    }

    pub fn into_entries(self) -> impl Iterator<Item = (String, TreeEntry)> {
        self.entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn parse_line(oid: &ObjectId, line: &str) -> Result<(String, TreeEntry)> {
        // the name is everything after the second space, so it may contain spaces
        let mut fields = line.splitn(3, ' ');
        let (Some(kind), Some(hash), Some(name)) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(Error::corrupt_object(
                oid,
                format!("tree line has fewer than three fields: {line:?}"),
            ));
        };

        if name.is_empty() {
            return Err(Error::corrupt_object(oid, "tree entry has an empty name"));
        }

        let hash = ObjectId::try_parse(hash)
            .map_err(|_| Error::corrupt_object(oid, format!("invalid entry hash {hash:?}")))?;
        let entry = match ObjectType::try_from(kind) {
            Ok(ObjectType::Blob) => TreeEntry::Blob(hash),
            Ok(ObjectType::Tree) => TreeEntry::Tree(hash),
            _ => {
                return Err(Error::corrupt_object(
                    oid,
                    format!("invalid entry kind {kind:?}"),
                ));
            }
        };

        Ok((name.to_string(), entry))
    }
}

impl Packable for Tree {
    fn serialize(&self) -> Result<Bytes> {
        let content = self
            .entries
            .iter()
            .map(|(name, entry)| format!("{} {} {}\n", entry.object_type(), entry.oid(), name))
            .collect::<String>();

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Tree {
    fn deserialize(oid: &ObjectId, payload: Bytes) -> Result<Self> {
        let content = std::str::from_utf8(&payload)
            .map_err(|_| Error::corrupt_object(oid, "tree payload is not utf-8"))?;

        let entries = content
            .split('\n')
            .filter(|line| !line.is_empty())
            .map(|line| Self::parse_line(oid, line))
            .collect::<Result<Vec<_>>>()?;

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }
}
