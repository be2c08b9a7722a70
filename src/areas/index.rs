//! Staging area
//!
//! The index records which blob each path will have in the next commit.
//! It is a plain text file (see [`crate::artifacts::index`]) rewritten as a
//! whole after every staging batch, under an exclusive lock so concurrent
//! writers cannot lose each other's updates.

use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::error::{Error, Result};
use crate::artifacts::core::{LockFile, write_atomically};
use crate::artifacts::index::index_entry::{IndexEntry, IndexKey, NORMAL_STAGE};
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.bitlet/index`)
    path: Box<Path>,
    entries: BTreeMap<IndexKey, ObjectId>,
    /// Whether the entries differ from what was last loaded or written
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Load the index from disk
    ///
    /// A missing index file is an empty staging area, not an error.
    pub fn rehydrate(&mut self) -> Result<()> {
        self.entries.clear();
        self.changed = false;

        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(error) => return Err(Error::storage(&self.path, error)),
        };

        for (number, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let entry = IndexEntry::parse_line(number + 1, line)?;
            self.entries.insert(entry.key, entry.oid);
        }

        tracing::trace!(entries = self.entries.len(), "index loaded");

        Ok(())
    }

    /// Entries keyed by `(path, stage)`
    pub fn read_staged(&self) -> &BTreeMap<IndexKey, ObjectId> {
        &self.entries
    }

    /// Entries keyed by path alone, as needed to build a tree
    ///
    /// When a path has several stages the normal stage wins, otherwise the
    /// lowest one does.
    pub fn read_paths(&self) -> BTreeMap<String, ObjectId> {
        let mut paths = BTreeMap::new();

        for (key, oid) in &self.entries {
            paths.entry(key.path.clone()).or_insert_with(|| oid.clone());
        }

        paths
    }

    pub fn entry_by_path(&self, path: &str) -> Option<&ObjectId> {
        self.entries.get(&IndexKey::normal(path))
    }

    pub fn entries(&self) -> impl Iterator<Item = IndexEntry> + '_ {
        self.entries
            .iter()
            .map(|(key, oid)| IndexEntry::new(key.clone(), oid.clone()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stage an entry, replacing whatever it collides with
    ///
    /// A file replaces any directory of the same name, and any file sitting
    /// where one of its parent directories would go.
    pub fn add(&mut self, entry: IndexEntry) {
        self.discard_conflicts(&entry);

        self.entries.insert(entry.key, entry.oid);
        self.changed = true;
    }

    fn discard_conflicts(&mut self, entry: &IndexEntry) {
        let parents = entry.parent_dirs();

        self.entries.retain(|key, _| {
            let is_parent_file = parents.contains(&key.path.as_str());
            let is_nested = key.path != entry.key.path && key.is_within(&entry.key.path);

            !(is_parent_file || is_nested)
        });
    }

    /// Unstage every entry at or below `path`
    pub fn remove(&mut self, path: &str) {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.is_within(path));

        if self.entries.len() != before {
            self.changed = true;
        }
    }

    /// Replace the whole staging area with a flat `path -> blob` listing
    pub fn reset(&mut self, paths: impl IntoIterator<Item = (String, ObjectId)>) {
        self.entries = paths
            .into_iter()
            .map(|(path, oid)| (IndexKey::new(path, NORMAL_STAGE), oid))
            .collect();
        self.changed = true;
    }

    /// Persist the entries, replacing the index file in one rename
    pub fn write_updates(&mut self) -> Result<()> {
        let content = self
            .entries()
            .map(|entry| entry.to_line() + "\n")
            .collect::<String>();

        write_atomically(&self.path, content.as_bytes())?;
        self.changed = false;

        tracing::debug!(entries = self.entries.len(), "index written");

        Ok(())
    }

    /// Read-modify-write cycle under the index lock
    ///
    /// The index is reloaded once the lock is held, so changes made by
    /// another writer in the meantime are kept.
    pub fn update<T>(&mut self, change: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let _lock = LockFile::acquire(&self.path)?;

        self.rehydrate()?;
        let outcome = change(self)?;

        if self.changed {
            self.write_updates()?;
        }

        Ok(outcome)
    }

    /// Store each path's current content as a blob and stage it
    ///
    /// Paths that no longer exist in the workspace are unstaged instead.
    pub fn stage_files(
        &mut self,
        paths: &[String],
        workspace: &Workspace,
        database: &Database,
    ) -> Result<()> {
        for path in paths {
            if !workspace.exists(path) {
                self.remove(path);
                tracing::debug!(path = %path, "unstaged");
                continue;
            }

            let blob = workspace.parse_blob(path)?;
            let oid = database.store(&blob)?;

            tracing::debug!(path = %path, oid = %oid, "staged");
            self.add(IndexEntry::new(IndexKey::normal(path.clone()), oid));
        }

        Ok(())
    }
}
