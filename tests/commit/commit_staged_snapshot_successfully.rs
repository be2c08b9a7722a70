use crate::common::command::{
    bit_commit, head_commit_id, metadata_path, read_object, run_bit_command, stdout_of,
    tree_id_of_commit,
};
use crate::common::file::write_files;
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

const HELLO_BLOB_ID: &str = "b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0";

#[rstest]
fn commit_single_file_as_root_commit(
    #[from(crate::common::command::repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_bit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_files(repository_dir.path(), &[("a.txt", "hello")]);
    run_bit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();

    let stdout = stdout_of(bit_commit(repository_dir.path(), "first"));

    let commit_id = head_commit_id(repository_dir.path()).expect("master has no commit");
    pretty_assertions::assert_eq!(
        stdout,
        format!("[master (root-commit) {}] first\n", &commit_id[..7])
    );

    let (kind, blob) = read_object(repository_dir.path(), HELLO_BLOB_ID);
    pretty_assertions::assert_eq!(kind, "blob");
    pretty_assertions::assert_eq!(blob, "hello");

    let tree_id = tree_id_of_commit(repository_dir.path(), &commit_id);
    let (kind, tree) = read_object(repository_dir.path(), &tree_id);
    pretty_assertions::assert_eq!(kind, "tree");
    pretty_assertions::assert_eq!(tree, format!("blob {HELLO_BLOB_ID} a.txt\n"));

    let (_, commit) = read_object(repository_dir.path(), &commit_id);
    pretty_assertions::assert_eq!(
        commit,
        format!("commit {tree_id}\nDate: Sun, 1 Jan 2023 12:00:00 +0000\n\nfirst")
    );

    Ok(())
}

#[rstest]
fn second_commit_chains_to_the_first(
    #[from(crate::common::command::repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_bit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_files(repository_dir.path(), &[("a.txt", "hello")]);
    run_bit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    bit_commit(repository_dir.path(), "first").assert().success();
    let first_id = head_commit_id(repository_dir.path()).expect("master has no commit");
    let first_object = std::fs::read(metadata_path(repository_dir.path()).join("objects").join(&first_id))?;

    write_files(repository_dir.path(), &[("a.txt", "world")]);
    run_bit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .success();
    let stdout = stdout_of(bit_commit(repository_dir.path(), "second\n\nwith a body"));

    let second_id = head_commit_id(repository_dir.path()).expect("master has no commit");
    assert_ne!(first_id, second_id);
    pretty_assertions::assert_eq!(stdout, format!("[master {}] second\n", &second_id[..7]));

    let (_, commit) = read_object(repository_dir.path(), &second_id);
    let mut lines = commit.lines().skip(1);
    pretty_assertions::assert_eq!(lines.next(), Some(format!("parent {first_id}").as_str()));
    assert!(commit.ends_with("\n\nsecond\n\nwith a body"));

    let tree_id = tree_id_of_commit(repository_dir.path(), &second_id);
    let (_, tree) = read_object(repository_dir.path(), &tree_id);
    let (_, world_blob) = read_object(
        repository_dir.path(),
        tree.split(' ').nth(1).expect("tree line has no hash"),
    );
    pretty_assertions::assert_eq!(world_blob, "world");

    pretty_assertions::assert_eq!(
        std::fs::read(metadata_path(repository_dir.path()).join("objects").join(&first_id))?,
        first_object
    );

    Ok(())
}

#[rstest]
fn nested_directories_become_nested_trees(
    #[from(crate::common::command::init_repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let commit_id = head_commit_id(repository_dir.path()).expect("master has no commit");
    let root_id = tree_id_of_commit(repository_dir.path(), &commit_id);

    let (_, root) = read_object(repository_dir.path(), &root_id);
    let kinds_and_names = root
        .lines()
        .map(|line| {
            let mut fields = line.splitn(3, ' ');
            let kind = fields.next().unwrap().to_string();
            let _hash = fields.next();
            (kind, fields.next().unwrap().to_string())
        })
        .collect::<Vec<_>>();
    pretty_assertions::assert_eq!(
        kinds_and_names,
        vec![
            ("blob".to_string(), "1.txt".to_string()),
            ("tree".to_string(), "a".to_string())
        ]
    );

    let a_id = root.lines().nth(1).unwrap().split(' ').nth(1).unwrap();
    let (kind, a_tree) = read_object(repository_dir.path(), a_id);
    pretty_assertions::assert_eq!(kind, "tree");
    assert!(a_tree.contains(" 2.txt\n"));
    assert!(a_tree.contains("tree "));

    Ok(())
}

#[rstest]
fn commit_with_empty_index_records_empty_tree(
    #[from(crate::common::command::repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_bit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    bit_commit(repository_dir.path(), "nothing yet")
        .assert()
        .success()
        .stdout(predicate::str::contains("(root-commit)"));

    let commit_id = head_commit_id(repository_dir.path()).expect("master has no commit");
    let tree_id = tree_id_of_commit(repository_dir.path(), &commit_id);
    let (kind, tree) = read_object(repository_dir.path(), &tree_id);
    pretty_assertions::assert_eq!(kind, "tree");
    pretty_assertions::assert_eq!(tree, "");

    Ok(())
}
