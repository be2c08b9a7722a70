//! Porcelain commands
//!
//! - `init`: lay down an empty repository
//! - `add`: stage files for the next commit
//! - `commit`: record the staged snapshot and advance the current branch
//! - `checkout`: move the working copy, index and current branch to a commit

pub mod add;
pub mod checkout;
pub mod commit;
pub mod init;
