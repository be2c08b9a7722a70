use crate::common::command::{
    head_commit_id, read_object, run_bit_command, stdout_of, tree_id_of_commit,
};
use crate::common::file::write_files;
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn write_tree_matches_the_committed_tree(
    #[from(crate::common::command::init_repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let commit_id = head_commit_id(repository_dir.path()).expect("master has no commit");

    let stdout = stdout_of(run_bit_command(repository_dir.path(), &["write-tree"]));

    pretty_assertions::assert_eq!(
        stdout.trim(),
        tree_id_of_commit(repository_dir.path(), &commit_id)
    );

    Ok(())
}

#[rstest]
fn write_tree_stores_only_staged_content(
    #[from(crate::common::command::repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_bit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_files(
        repository_dir.path(),
        &[("staged.txt", "hello"), ("unstaged.txt", "ignored")],
    );
    run_bit_command(repository_dir.path(), &["add", "staged.txt"])
        .assert()
        .success();

    let tree_id = stdout_of(run_bit_command(repository_dir.path(), &["write-tree"]));
    let tree_id = tree_id.trim();

    assert_eq!(tree_id.len(), 40);
    let (kind, tree) = read_object(repository_dir.path(), tree_id);
    pretty_assertions::assert_eq!(kind, "tree");
    pretty_assertions::assert_eq!(
        tree,
        "blob b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0 staged.txt\n"
    );
    assert!(head_commit_id(repository_dir.path()).is_none());

    Ok(())
}

#[rstest]
fn write_tree_outside_a_repository_fails(
    #[from(crate::common::command::repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_bit_command(repository_dir.path(), &["write-tree"])
        .assert()
        .code(9);

    Ok(())
}

#[rstest]
fn write_tree_with_corrupt_index_fails(
    #[from(crate::common::command::init_repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    write_files(repository_dir.path(), &[(".bitlet/index", "only-a-path\n")]);

    run_bit_command(repository_dir.path(), &["write-tree"])
        .assert()
        .code(6);

    Ok(())
}
