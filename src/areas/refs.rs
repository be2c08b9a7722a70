//! References (HEAD and branches)
//!
//! HEAD is always symbolic and names the current branch:
//!
//! ```text
//! HEAD                ref: refs/heads/master\n
//! refs/heads/master   <40-hex commit id>\n      (missing or empty until the first commit)
//! ```

use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::core::error::{Error, Result, StorageContext};
use crate::artifacts::core::{LockFile, write_atomically};
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::path::{Path, PathBuf};

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (refs/heads/.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata directory (typically `.bitlet`)
    path: Box<Path>,
}

impl Refs {
    /// Turn a ref name into the concrete ref it designates
    ///
    /// HEAD is followed one level to its branch; every other name is already
    /// concrete and comes back unchanged.
    pub fn resolve(&self, name: &str) -> Result<SymRefName> {
        if name != HEAD_REF_NAME {
            return Ok(SymRefName::new(name.to_string()));
        }

        let head_path = self.head_path();
        let content = match std::fs::read_to_string(&head_path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ref_resolution(name, "HEAD is missing"));
            }
            Err(error) => return Err(Error::storage(&head_path, error)),
        };

        let re = regex::Regex::new(SYMREF_REGEX)
            .map_err(|error| Error::ref_resolution(name, error.to_string()))?;

        match re.captures(content.trim()) {
            Some(captures) => {
                let sym_ref_name = SymRefName::new(captures[1].to_string());
                // a branch name never escapes refs/heads
                BranchName::try_parse_sym_ref_name(&sym_ref_name)?;

                Ok(sym_ref_name)
            }
            None => Err(Error::ref_resolution(
                name,
                format!("expected `ref: refs/heads/<branch>`, found {:?}", content.trim()),
            )),
        }
    }

    /// Commit the ref points at, if any
    ///
    /// A branch that has no commit yet (missing or empty ref file) reads as
    /// `None`.
    pub fn read_hash(&self, name: &str) -> Result<Option<ObjectId>> {
        let sym_ref_name = self.resolve(name)?;

        self.read_ref(&sym_ref_name)
    }

    /// Point the ref (or the branch HEAD names) at `oid`
    pub fn update(&self, name: &str, oid: &ObjectId) -> Result<SymRefName> {
        let sym_ref_name = self.resolve(name)?;
        let ref_path = self.ref_path(&sym_ref_name);

        let _lock = LockFile::acquire(&ref_path)?;
        write_atomically(&ref_path, format!("{oid}\n").as_bytes())?;

        tracing::debug!(r#ref = %sym_ref_name, oid = %oid, "ref updated");

        Ok(sym_ref_name)
    }

    /// Move the ref to the hash `change` derives from its current value
    ///
    /// The ref stays locked from the read to the write, so two writers
    /// advancing the same branch never start from the same tip. When `change`
    /// fails the ref is left as it was.
    pub fn update_with<T>(
        &self,
        name: &str,
        change: impl FnOnce(Option<ObjectId>) -> Result<(ObjectId, T)>,
    ) -> Result<(SymRefName, T)> {
        let sym_ref_name = self.resolve(name)?;
        let ref_path = self.ref_path(&sym_ref_name);

        let _lock = LockFile::acquire(&ref_path)?;
        let current = self.read_ref(&sym_ref_name)?;
        let (oid, outcome) = change(current)?;
        write_atomically(&ref_path, format!("{oid}\n").as_bytes())?;

        tracing::debug!(r#ref = %sym_ref_name, oid = %oid, "ref updated");

        Ok((sym_ref_name, outcome))
    }

    fn read_ref(&self, sym_ref_name: &SymRefName) -> Result<Option<ObjectId>> {
        let ref_path = self.ref_path(sym_ref_name);

        let content = match std::fs::read_to_string(&ref_path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(Error::storage(&ref_path, error)),
        };
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        ObjectId::try_parse(content).map(Some).map_err(|_| {
            Error::ref_resolution(sym_ref_name.as_ref_path(), "ref does not hold a commit id")
        })
    }

    /// Make HEAD a symbolic ref to `branch`
    pub fn set_head(&self, branch: &BranchName) -> Result<()> {
        let head_path = self.head_path();

        let _lock = LockFile::acquire(&head_path)?;
        write_atomically(
            &head_path,
            format!("ref: {}\n", branch.to_sym_ref_name()).as_bytes(),
        )
    }

    /// Branch HEAD currently points at
    pub fn current_branch(&self) -> Result<BranchName> {
        BranchName::try_parse_sym_ref_name(&self.resolve(HEAD_REF_NAME)?)
    }

    /// Create the empty ref namespace
    pub fn create_namespace(&self) -> Result<()> {
        let heads_path = self.heads_path();
        std::fs::create_dir_all(&heads_path).at_path(&heads_path)
    }

    fn ref_path(&self, sym_ref_name: &SymRefName) -> PathBuf {
        self.path.join(sym_ref_name.as_ref_path())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}
