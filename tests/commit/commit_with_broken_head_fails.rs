use crate::common::command::{bit_commit, head_commit_id, metadata_path};
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
#[case("4b825dc642cb6eb9a060e54bf8d69288fbee4904\n")]
#[case("ref: refs/tags/v1\n")]
fn commit_with_broken_head_fails(
    #[from(crate::common::command::init_repository_dir)] repository_dir: TempDir,
    #[case] head: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let branch_ref = metadata_path(repository_dir.path()).join("refs/heads/master");
    let before = std::fs::read_to_string(&branch_ref)?;
    std::fs::write(metadata_path(repository_dir.path()).join("HEAD"), head)?;

    bit_commit(repository_dir.path(), "second").assert().code(4);

    pretty_assertions::assert_eq!(std::fs::read_to_string(&branch_ref)?, before);

    Ok(())
}

#[rstest]
fn commit_with_missing_head_fails(
    #[from(crate::common::command::init_repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::remove_file(metadata_path(repository_dir.path()).join("HEAD"))?;

    bit_commit(repository_dir.path(), "second").assert().code(4);

    assert!(head_commit_id(repository_dir.path()).is_none());

    Ok(())
}
