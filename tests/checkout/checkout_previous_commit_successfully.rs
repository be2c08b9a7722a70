use crate::common::command::{
    bit_commit, head_commit_id, metadata_path, read_index, run_bit_command, stdout_of,
};
use crate::common::file::{read_file, write_files};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use rstest::rstest;

fn commit_all(dir: &std::path::Path, message: &str) -> String {
    run_bit_command(dir, &["add", "."]).assert().success();
    bit_commit(dir, message).assert().success();

    head_commit_id(dir).expect("master has no commit")
}

#[rstest]
fn checkout_restores_modified_file(
    #[from(crate::common::command::repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_bit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_files(repository_dir.path(), &[("a.txt", "hello")]);
    let first_id = commit_all(repository_dir.path(), "first");
    let index_at_first = read_index(repository_dir.path());
    write_files(repository_dir.path(), &[("a.txt", "world")]);
    commit_all(repository_dir.path(), "second");

    let stdout = stdout_of(run_bit_command(
        repository_dir.path(),
        &["checkout", &first_id],
    ));

    pretty_assertions::assert_eq!(
        stdout,
        format!("HEAD is now at {} first\n", &first_id[..7])
    );
    pretty_assertions::assert_eq!(read_file(&repository_dir.path().join("a.txt")), "hello");
    pretty_assertions::assert_eq!(
        read_file(&metadata_path(repository_dir.path()).join("HEAD")),
        "ref: refs/heads/master\n"
    );
    pretty_assertions::assert_eq!(head_commit_id(repository_dir.path()), Some(first_id));
    pretty_assertions::assert_eq!(read_index(repository_dir.path()), index_at_first);

    Ok(())
}

#[rstest]
fn checkout_removes_added_files_and_empty_directories(
    #[from(crate::common::command::init_repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let first_id = head_commit_id(repository_dir.path()).expect("master has no commit");
    write_files(repository_dir.path(), &[("x/y/new.txt", "new")]);
    commit_all(repository_dir.path(), "add x/y/new.txt");

    run_bit_command(repository_dir.path(), &["checkout", &first_id])
        .assert()
        .success();

    repository_dir
        .child("x/y/new.txt")
        .assert(predicates::path::missing());
    repository_dir.child("x").assert(predicates::path::missing());
    repository_dir.child("1.txt").assert("one");
    repository_dir.child("a/2.txt").assert("two");
    repository_dir.child("a/b/3.txt").assert("three");
    assert!(!read_index(repository_dir.path()).contains("x/y/new.txt"));

    Ok(())
}

#[rstest]
fn checkout_moves_forward_again(
    #[from(crate::common::command::init_repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let first_id = head_commit_id(repository_dir.path()).expect("master has no commit");
    std::fs::remove_dir_all(repository_dir.path().join("a"))?;
    write_files(repository_dir.path(), &[("a", "a is a file now")]);
    let second_id = commit_all(repository_dir.path(), "turn a into a file");

    run_bit_command(repository_dir.path(), &["checkout", &first_id])
        .assert()
        .success();
    repository_dir.child("a/b/3.txt").assert("three");

    run_bit_command(repository_dir.path(), &["checkout", &second_id])
        .assert()
        .success();
    repository_dir.child("a").assert("a is a file now");
    pretty_assertions::assert_eq!(head_commit_id(repository_dir.path()), Some(second_id));

    Ok(())
}

#[rstest]
fn checkout_leaves_untracked_files_alone(
    #[from(crate::common::command::init_repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let first_id = head_commit_id(repository_dir.path()).expect("master has no commit");
    write_files(repository_dir.path(), &[("notes.txt", "scratch")]);

    run_bit_command(repository_dir.path(), &["checkout", &first_id])
        .assert()
        .success();

    repository_dir.child("notes.txt").assert("scratch");

    Ok(())
}

#[rstest]
fn checkout_refuses_to_overwrite_untracked_files(
    #[from(crate::common::command::repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_bit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_files(repository_dir.path(), &[("keep.txt", "keep")]);
    let first_id = commit_all(repository_dir.path(), "keep.txt only");
    write_files(repository_dir.path(), &[("a", "a is a file")]);
    let second_id = commit_all(repository_dir.path(), "add file a");

    run_bit_command(repository_dir.path(), &["checkout", &first_id])
        .assert()
        .success();
    write_files(repository_dir.path(), &[("a/precious.txt", "untracked")]);
    let index_at_first = read_index(repository_dir.path());

    run_bit_command(repository_dir.path(), &["checkout", &second_id])
        .assert()
        .code(7)
        .stderr(predicates::str::contains("a/precious.txt"));

    repository_dir.child("a/precious.txt").assert("untracked");
    repository_dir.child("keep.txt").assert("keep");
    pretty_assertions::assert_eq!(head_commit_id(repository_dir.path()), Some(first_id));
    pretty_assertions::assert_eq!(read_index(repository_dir.path()), index_at_first);

    Ok(())
}

#[rstest]
fn checkout_refuses_to_write_below_an_untracked_file(
    #[from(crate::common::command::repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_bit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    write_files(repository_dir.path(), &[("keep.txt", "keep")]);
    let first_id = commit_all(repository_dir.path(), "keep.txt only");
    write_files(repository_dir.path(), &[("docs/readme.txt", "docs")]);
    let second_id = commit_all(repository_dir.path(), "add docs");

    run_bit_command(repository_dir.path(), &["checkout", &first_id])
        .assert()
        .success();
    write_files(repository_dir.path(), &[("docs", "untracked notes")]);

    run_bit_command(repository_dir.path(), &["checkout", &second_id])
        .assert()
        .code(7);

    repository_dir.child("docs").assert("untracked notes");
    pretty_assertions::assert_eq!(head_commit_id(repository_dir.path()), Some(first_id));

    Ok(())
}
