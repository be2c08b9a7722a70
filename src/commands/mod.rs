//! Command implementations
//!
//! - `plumbing`: low-level commands working on objects directly (cat-file, hash-object, write-tree)
//! - `porcelain`: user-facing workflows (init, add, commit, checkout)
//!
//! Every command is a method on [`crate::areas::repository::Repository`] and
//! writes its user-facing output through the repository's writer.

pub mod plumbing;
pub mod porcelain;
