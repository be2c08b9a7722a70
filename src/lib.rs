//! A minimal local version-control engine
//!
//! Content-addressed objects, a staging index, linear commit history and a
//! diff/checkout engine that reconciles a working copy against stored
//! snapshots. Repository metadata lives in a reserved `.bitlet/` directory.

pub mod areas;
pub mod artifacts;
pub mod commands;
