//! Plumbing commands
//!
//! - `cat-file`: print an object's payload or kind
//! - `hash-object`: compute a file's blob id and optionally store it
//! - `write-tree`: store the index as a tree snapshot

pub mod cat_file;
pub mod hash_object;
pub mod write_tree;
