use crate::areas::database::Database;
use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::file_tree::FileTree;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use derive_new::new;
use std::collections::BTreeMap;

/// Flattened snapshot of a commit: `path -> blob`
pub type Snapshot = BTreeMap<String, ObjectId>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffStatus {
    Same,
    Add,
    Delete,
    Modify,
}

impl DiffStatus {
    pub fn classify(receiver: Option<&ObjectId>, giver: Option<&ObjectId>) -> Option<Self> {
        match (receiver, giver) {
            (Some(receiver), Some(giver)) if receiver == giver => Some(DiffStatus::Same),
            (Some(_), Some(_)) => Some(DiffStatus::Modify),
            (None, Some(_)) => Some(DiffStatus::Add),
            (Some(_), None) => Some(DiffStatus::Delete),
            (None, None) => None,
        }
    }
}

/// Status of one path, with the blob each side holds for it
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct DiffEntry {
    pub status: DiffStatus,
    pub path: String,
    pub receiver: Option<ObjectId>,
    pub giver: Option<ObjectId>,
}

/// Compare two flattened snapshots path by path
///
/// `receiver` is the state being moved away from, `giver` the state being
/// moved to. Every path of either side gets exactly one entry.
pub fn diff_snapshots(receiver: &Snapshot, giver: &Snapshot) -> BTreeMap<String, DiffEntry> {
    receiver
        .keys()
        .chain(giver.keys())
        .filter_map(|path| {
            let (old, new) = (receiver.get(path), giver.get(path));
            let status = DiffStatus::classify(old, new)?;

            Some((
                path.clone(),
                DiffEntry::new(status, path.clone(), old.cloned(), new.cloned()),
            ))
        })
        .collect()
}

/// Path-level diff between two commits
#[derive(Debug)]
pub struct TreeDiff<'r> {
    database: &'r Database,
    entries: BTreeMap<String, DiffEntry>,
}

impl<'r> TreeDiff<'r> {
    pub fn new(database: &'r Database) -> Self {
        TreeDiff {
            database,
            entries: BTreeMap::new(),
        }
    }

    /// Diff two commits; a missing commit stands for the empty snapshot
    pub fn compare_commits(
        &mut self,
        receiver: Option<&ObjectId>,
        giver: Option<&ObjectId>,
    ) -> Result<()> {
        let receiver = self.expand(receiver)?;
        let giver = self.expand(giver)?;

        self.entries = diff_snapshots(&receiver, &giver);

        tracing::debug!(
            paths = self.entries.len(),
            changes = self.changes().count(),
            "commits compared"
        );

        Ok(())
    }

    /// Flattened tree of a commit
    ///
    /// `None` is an unborn branch and expands to the empty snapshot.
    pub fn expand(&self, commit_oid: Option<&ObjectId>) -> Result<Snapshot> {
        let Some(commit_oid) = commit_oid else {
            return Ok(Snapshot::new());
        };

        let (object_type, payload) = self.database.load(commit_oid)?;
        if object_type != ObjectType::Commit {
            return Err(Error::corrupt_object(
                commit_oid,
                format!("expected a commit but found a {object_type}"),
            ));
        }

        let tree_oid = Commit::tree_oid_of(&payload)
            .ok_or_else(|| Error::corrupt_object(commit_oid, "missing tree line"))?;

        Ok(FileTree::read(self.database, &tree_oid)?.flatten())
    }

    pub fn entries(&self) -> &BTreeMap<String, DiffEntry> {
        &self.entries
    }

    /// Entries whose status is not [`DiffStatus::Same`]
    pub fn changes(&self) -> impl Iterator<Item = &DiffEntry> {
        self.entries
            .values()
            .filter(|entry| entry.status != DiffStatus::Same)
    }
}
