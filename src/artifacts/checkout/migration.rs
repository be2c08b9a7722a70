use crate::areas::database::Database;
use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::diff::tree_diff::{DiffStatus, Snapshot, TreeDiff};
use crate::artifacts::objects::PATH_SEPARATOR;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::collections::{BTreeSet, HashMap};

/// Type of file system action required for checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Create new file
    Add,
    /// Delete file
    Delete,
    /// Overwrite existing file
    Modify,
}

impl ActionType {
    pub fn from_status(status: DiffStatus) -> Option<Self> {
        match status {
            DiffStatus::Same => None,
            DiffStatus::Add => Some(ActionType::Add),
            DiffStatus::Delete => Some(ActionType::Delete),
            DiffStatus::Modify => Some(ActionType::Modify),
        }
    }
}

/// Planned actions grouped by type; writes carry the blob to write
pub type ActionsSet = HashMap<ActionType, Vec<(String, Option<ObjectId>)>>;

/// Working-copy changes that move a checkout from one commit to another
pub struct Migration<'r> {
    database: &'r Database,
    tree_diff: TreeDiff<'r>,
    actions: ActionsSet,
    /// Parent directories of deleted files, candidates for removal once empty
    rmdirs: BTreeSet<String>,
}

impl<'r> Migration<'r> {
    pub fn new(database: &'r Database, tree_diff: TreeDiff<'r>) -> Self {
        let actions = HashMap::from([
            (ActionType::Add, Vec::new()),
            (ActionType::Delete, Vec::new()),
            (ActionType::Modify, Vec::new()),
        ]);

        let mut migration = Self {
            database,
            tree_diff,
            actions,
            rmdirs: BTreeSet::new(),
        };
        migration.plan_changes();

        migration
    }

    fn plan_changes(&mut self) {
        for entry in self.tree_diff.changes() {
            let Some(action) = ActionType::from_status(entry.status) else {
                continue;
            };

            if action == ActionType::Delete {
                self.rmdirs.extend(
                    entry
                        .path
                        .match_indices(PATH_SEPARATOR)
                        .map(|(position, _)| entry.path[..position].to_string()),
                );
            }

            self.actions
                .entry(action)
                .or_default()
                .push((entry.path.clone(), entry.giver.clone()));
        }
    }

    pub fn actions(&self) -> &ActionsSet {
        &self.actions
    }

    pub fn action_set(&self, action: ActionType) -> &[(String, Option<ObjectId>)] {
        self.actions
            .get(&action)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Directories that may be left empty, deepest first
    pub fn rmdirs(&self) -> impl Iterator<Item = &str> {
        self.rmdirs.iter().rev().map(String::as_str)
    }

    /// Number of files the migration touches
    pub fn len(&self) -> usize {
        self.actions.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattened snapshot of the commit being checked out
    pub fn target(&self) -> Snapshot {
        self.tree_diff
            .entries()
            .values()
            .filter_map(|entry| Some((entry.path.clone(), entry.giver.clone()?)))
            .collect()
    }

    pub fn load_blob_data(&self, path: &str, oid: Option<&ObjectId>) -> Result<Bytes> {
        let oid =
            oid.ok_or_else(|| Error::InvalidPath(format!("{path}: no content to write")))?;

        Ok(self.database.load_blob(oid)?.into_content())
    }
}
