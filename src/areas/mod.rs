//! Core repository components
//!
//! - `database`: content-addressed store for blobs, trees and commits
//! - `index`: staging area for the next commit
//! - `refs`: HEAD and branch references
//! - `repository`: the context value tying the other areas together
//! - `workspace`: working copy reads and writes

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
