//! Index file format
//!
//! The index (staging area) lists the files that make up the next commit.
//!
//! ## File Format
//!
//! ```text
//! <path> <stage> <hash>\n     one line per entry, sorted by path then stage
//! ```
//!
//! Paths are workspace-relative and always use `/` as separator. The stage is
//! a conflict marker, `0` for every regular entry.

pub mod index_entry;
