use crate::common::command::{bit_commit, metadata_path};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn commit_outside_a_repository_fails(
    #[from(crate::common::command::repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    bit_commit(repository_dir.path(), "first")
        .assert()
        .code(9)
        .stderr(predicate::str::contains("not a bitlet repository"));

    assert!(!metadata_path(repository_dir.path()).exists());

    Ok(())
}
