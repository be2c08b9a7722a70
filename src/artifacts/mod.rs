//! Data structures and algorithms of the repository engine
//!
//! - `branch`: branch and symbolic ref names
//! - `checkout`: planning working-copy changes from a commit diff
//! - `core`: typed errors, configuration, atomic writes and locking
//! - `diff`: path-level comparison of two commits
//! - `index`: index line format
//! - `objects`: blobs, trees, commits and whole-snapshot trees

pub mod branch;
pub mod checkout;
pub mod core;
pub mod diff;
pub mod index;
pub mod objects;
