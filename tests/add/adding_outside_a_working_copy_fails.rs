use crate::common::command::{metadata_path, run_bit_command};
use crate::common::file::write_files;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn adding_outside_a_repository_fails(
    #[from(crate::common::command::repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    write_files(repository_dir.path(), &[("a.txt", "a")]);

    run_bit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .code(9)
        .stderr(predicate::str::contains("not a bitlet repository"));

    Ok(())
}

#[rstest]
fn adding_to_a_bare_repository_fails(
    #[from(crate::common::command::repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_bit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    std::fs::write(
        metadata_path(repository_dir.path()).join("config"),
        r#"{"core": {"bare": true}}"#,
    )?;
    write_files(repository_dir.path(), &[("a.txt", "a")]);

    run_bit_command(repository_dir.path(), &["add", "a.txt"])
        .assert()
        .code(10);

    Ok(())
}

#[rstest]
fn malformed_config_is_reported(
    #[from(crate::common::command::repository_dir)] repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_bit_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    std::fs::write(
        metadata_path(repository_dir.path()).join("config"),
        "{ core: ",
    )?;

    run_bit_command(repository_dir.path(), &["add", "."])
        .assert()
        .code(8);

    Ok(())
}
