//! Checkout planning
//!
//! Checking out a commit turns the path-level diff between the current
//! commit and the target into file system actions:
//! - deletions of files the target no longer has, followed by removal of the
//!   directories those deletions leave empty
//! - writes of files the target adds or changes, creating parent directories
//!   on the way
//!
//! Actions are applied one path at a time, there is no rollback if a later
//! action fails.

pub mod migration;
