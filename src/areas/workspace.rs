use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::core::error::{Error, Result, StorageContext};
use crate::artifacts::core::write_atomically;
use crate::artifacts::index::index_entry::to_index_path;
use crate::artifacts::objects::PATH_SEPARATOR;
use crate::artifacts::objects::blob::Blob;
use bytes::Bytes;
use std::collections::HashSet;
use std::path::{Component, Path};
use walkdir::WalkDir;

/// Name of the metadata directory, never part of the working copy
pub const METADATA_DIR: &str = ".bitlet";

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse_blob(&self, path: &str) -> Result<Blob> {
        Ok(Blob::new(self.read_file(path)?))
    }

    /// Workspace-relative path of `path`, which may be absolute or relative to the root
    ///
    /// The root itself is the empty path.
    pub fn relative_path(&self, path: &Path) -> Result<String> {
        let relative = if path.is_absolute() {
            path.strip_prefix(&self.path)
                .map_err(|_| Error::InvalidPath(path.display().to_string()))?
        } else {
            path
        };

        if relative
            .components()
            .all(|component| component == Component::CurDir)
        {
            return Ok(String::new());
        }

        to_index_path(relative)
    }

    /// Files under `path`, as sorted workspace-relative paths
    ///
    /// A file yields itself; a directory is walked recursively, skipping the
    /// metadata directory. A path that does not exist yields nothing.
    pub fn list_files(&self, path: &Path) -> Result<Vec<String>> {
        let root_file_path = self.path.join(path);

        if !root_file_path.exists() {
            return Ok(Vec::new());
        }

        let mut files = WalkDir::new(&root_file_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != METADATA_DIR)
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| self.relative_path(entry.path()))
            .collect::<Result<Vec<_>>>()?;
        files.sort();

        Ok(files)
    }

    pub fn exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    pub fn read_file(&self, path: &str) -> Result<Bytes> {
        let file_path = self.path.join(path);

        std::fs::read(&file_path)
            .map(Bytes::from)
            .at_path(file_path)
    }

    /// Create or overwrite a file, creating its parent directories
    ///
    /// An empty directory in the way is replaced; a non-empty one is an error.
    pub fn write_file(&self, path: &str, content: &[u8]) -> Result<()> {
        let file_path = self.path.join(path);

        if file_path.is_dir() {
            std::fs::remove_dir(&file_path).at_path(&file_path)?;
        }

        write_atomically(&file_path, content)
    }

    pub fn remove_file(&self, path: &str) -> Result<()> {
        let file_path = self.path.join(path);

        match std::fs::remove_file(&file_path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(Error::storage(file_path, error)),
        }
    }

    /// Remove a directory if it is empty; the workspace root is never removed
    fn remove_empty_directory(&self, path: &str) -> Result<()> {
        let dir_path = self.path.join(path);

        if dir_path == *self.path || !dir_path.is_dir() {
            return Ok(());
        }

        let mut entries = std::fs::read_dir(&dir_path).at_path(&dir_path)?;
        if entries.next().is_none() {
            std::fs::remove_dir(&dir_path).at_path(&dir_path)?;
        }

        Ok(())
    }

    /// Fail if writing the migration would clobber content it does not track
    ///
    /// A file written where a directory stands needs every file below it to be
    /// deleted by the same migration, and a file cannot be written below a
    /// path that stays a file.
    pub fn check_migration(&self, migration: &Migration) -> Result<()> {
        let deleted = migration
            .action_set(ActionType::Delete)
            .iter()
            .map(|(path, _)| path.as_str())
            .collect::<HashSet<_>>();

        for action in [ActionType::Modify, ActionType::Add] {
            for (path, _) in migration.action_set(action) {
                let file_path = self.path.join(path);

                if file_path.is_dir() {
                    let untracked = self
                        .list_files(Path::new(path))?
                        .into_iter()
                        .find(|file| !deleted.contains(file.as_str()));

                    if let Some(untracked) = untracked {
                        return Err(Error::InvalidPath(format!(
                            "{path}: untracked file {untracked} would be overwritten by checkout"
                        )));
                    }
                }

                let blocking_parent = path
                    .match_indices(PATH_SEPARATOR)
                    .map(|(position, _)| &path[..position])
                    .find(|parent| self.path.join(parent).is_file() && !deleted.contains(parent));

                if let Some(parent) = blocking_parent {
                    return Err(Error::InvalidPath(format!(
                        "{path}: untracked file {parent} would be overwritten by checkout"
                    )));
                }
            }
        }

        Ok(())
    }

    // Deletions run first, then the directories they emptied are removed
    // deepest first, and only then are files written, so a path that turns
    // from a directory into a file (or back) is free by the time it is written.
    pub fn apply_migration(&self, migration: &Migration) -> Result<()> {
        self.check_migration(migration)?;

        for (path, _) in migration.action_set(ActionType::Delete) {
            self.remove_file(path)?;
            tracing::debug!(path = %path, "deleted");
        }

        for dir_path in migration.rmdirs() {
            self.remove_empty_directory(dir_path)?;
        }

        for action in [ActionType::Modify, ActionType::Add] {
            for (path, oid) in migration.action_set(action) {
                let data = migration.load_blob_data(path, oid.as_ref())?;
                self.write_file(path, &data)?;
                tracing::debug!(path = %path, action = ?action, "written");
            }
        }

        Ok(())
    }
}
