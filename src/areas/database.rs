use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::core::write_atomically;
use crate::artifacts::diff::tree_diff::TreeDiff;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// Content-addressed object store
///
/// Objects are written once under `objects/<hash>` and never mutated or deleted.
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn tree_diff(
        &self,
        receiver: Option<&ObjectId>,
        giver: Option<&ObjectId>,
    ) -> Result<TreeDiff<'_>> {
        let mut tree_diff = TreeDiff::new(self);
        tree_diff.compare_commits(receiver, giver)?;
        Ok(tree_diff)
    }

    /// Persist an object and return its hash
    ///
    /// Storing content that is already present is a no-op.
    pub fn store(&self, object: &impl Object) -> Result<ObjectId> {
        let framed = object.pack()?;
        let oid = ObjectId::hash(&framed);
        let object_path = self.object_path(&oid);

        if object_path.exists() {
            tracing::trace!(oid = %oid, "object already stored");
        } else {
            write_atomically(&object_path, &framed)?;
            tracing::debug!(
                oid = %oid,
                kind = %object.object_type(),
                size = framed.len(),
                "object stored"
            );
        }

        Ok(oid)
    }

    /// Read an object's kind tag and payload
    pub fn load(&self, oid: &ObjectId) -> Result<(ObjectType, Bytes)> {
        let object_path = self.object_path(oid);

        let framed = match std::fs::read(&object_path) {
            Ok(framed) => framed,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ObjectNotFound(oid.clone()));
            }
            Err(error) => return Err(Error::storage(&object_path, error)),
        };

        if ObjectId::hash(&framed) != *oid {
            return Err(Error::corrupt_object(oid, "content does not match its hash"));
        }

        let (object_type, payload) = ObjectType::parse_header(&framed).map_err(|error| match error {
            Error::CorruptObject { reason, .. } => Error::corrupt_object(oid, reason),
            other => other,
        })?;

        Ok((object_type, Bytes::copy_from_slice(payload)))
    }

    pub fn exists(&self, oid: &ObjectId) -> bool {
        self.object_path(oid).exists()
    }

    pub fn load_blob(&self, oid: &ObjectId) -> Result<Blob> {
        let payload = self.load_as(oid, ObjectType::Blob)?;
        Blob::deserialize(oid, payload)
    }

    pub fn load_tree(&self, oid: &ObjectId) -> Result<Tree> {
        let payload = self.load_as(oid, ObjectType::Tree)?;
        Tree::deserialize(oid, payload)
    }

    pub fn load_commit(&self, oid: &ObjectId) -> Result<Commit> {
        let payload = self.load_as(oid, ObjectType::Commit)?;
        Commit::deserialize(oid, payload)
    }

    /// Payload of an object that must be of the given kind
    pub fn load_as(&self, oid: &ObjectId, expected: ObjectType) -> Result<Bytes> {
        let (object_type, payload) = self.load(oid)?;

        if object_type != expected {
            return Err(Error::corrupt_object(
                oid,
                format!("expected a {expected} but found a {object_type}"),
            ));
        }

        Ok(payload)
    }

    fn object_path(&self, oid: &ObjectId) -> PathBuf {
        self.path.join(oid.to_path())
    }
}
