//! Object types and operations
//!
//! All content is stored as objects identified by SHA-1 hashes. There are three types:
//!
//! - **Blob**: File content (raw bytes)
//! - **Tree**: Directory listing (kinds, object IDs and names)
//! - **Commit**: Snapshot with metadata (tree, parents, date, message)
//!
//! All objects are framed on disk as `<type> <size>\0<payload>`.
//! `file_tree` nests flat path listings into whole snapshots made of many trees.

pub mod blob;
pub mod commit;
pub mod file_tree;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Separator between path segments in the index and in trees
pub const PATH_SEPARATOR: char = '/';
