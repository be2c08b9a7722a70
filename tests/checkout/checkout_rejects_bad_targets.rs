use crate::common::command::{
    head_commit_id, metadata_path, run_bit_command, tree_id_of_commit,
};
use crate::common::file::read_file;
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn checkout_unknown_commit_fails(
    #[from(crate::common::command::init_repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let before = head_commit_id(repository_dir.path());

    run_bit_command(
        repository_dir.path(),
        &["checkout", "0123456789abcdef0123456789abcdef01234567"],
    )
    .assert()
    .code(3)
    .stderr(predicate::str::contains("object not found"));

    pretty_assertions::assert_eq!(head_commit_id(repository_dir.path()), before);

    Ok(())
}

#[rstest]
fn checkout_of_a_tree_fails(
    #[from(crate::common::command::init_repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let commit_id = head_commit_id(repository_dir.path()).expect("master has no commit");
    let tree_id = tree_id_of_commit(repository_dir.path(), &commit_id);

    run_bit_command(repository_dir.path(), &["checkout", &tree_id])
        .assert()
        .code(6);

    pretty_assertions::assert_eq!(
        read_file(&metadata_path(repository_dir.path()).join("HEAD")),
        "ref: refs/heads/master\n"
    );
    pretty_assertions::assert_eq!(head_commit_id(repository_dir.path()), Some(commit_id));

    Ok(())
}

#[rstest]
#[case("not-a-hash")]
#[case("b6fc4c6")]
#[case("b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0ff")]
fn checkout_invalid_id_fails(
    #[from(crate::common::command::init_repository_dir)] repository_dir: TempDir,
    #[case] target: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    run_bit_command(repository_dir.path(), &["checkout", target])
        .assert()
        .code(7);

    Ok(())
}
