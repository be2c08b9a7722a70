use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::{METADATA_DIR, Workspace};
use crate::artifacts::core::config::Config;
use crate::artifacts::core::error::{Error, Result, StorageContext};
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Explicit repository context
///
/// Every operation reaches the object store, index, refs and working copy
/// through this value; nothing below the binary reads the current directory.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: Arc<Mutex<Index>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    pub fn new(path: impl AsRef<Path>, writer: Box<dyn std::io::Write>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            std::fs::create_dir_all(path).at_path(path)?;
        }
        let path = path.canonicalize().at_path(path)?;
        let git_path = path.join(METADATA_DIR);

        let index = Index::new(git_path.join("index").into_boxed_path());
        let database = Database::new(git_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(git_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: Arc::new(Mutex::new(index)),
            database,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The reserved metadata directory, `<root>/.bitlet`
    pub fn git_path(&self) -> PathBuf {
        self.path.join(METADATA_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.git_path().join("config")
    }

    pub fn is_initialized(&self) -> bool {
        self.git_path().is_dir()
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(Error::NotARepository(self.path.to_path_buf()))
        }
    }

    pub fn config(&self) -> Result<Config> {
        Config::load(&self.config_path())
    }

    /// Fail unless the repository has a working copy
    pub fn ensure_working_copy(&self) -> Result<()> {
        self.ensure_initialized()?;

        if self.config()?.is_bare() {
            return Err(Error::BareRepository);
        }

        Ok(())
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
