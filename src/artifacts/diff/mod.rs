//! Snapshot comparison
//!
//! - `tree_diff`: per-path classification between two commits' flattened trees
//!
//! The diff is purely tree-level: it tells which files differ, never what
//! changed inside them.

pub mod tree_diff;
