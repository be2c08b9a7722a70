use crate::areas::repository::Repository;
use crate::artifacts::branch::DEFAULT_BRANCH;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::config::Config;
use crate::artifacts::core::write_atomically;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    pub async fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            anyhow::bail!(
                "repository already exists in {}, leaving it untouched",
                self.git_path().display()
            );
        }

        fs::create_dir_all(self.database().objects_path())
            .context("failed to create .bitlet/objects directory")?;

        self.refs()
            .create_namespace()
            .context("failed to create .bitlet/refs/heads directory")?;

        let default_branch = BranchName::try_parse(DEFAULT_BRANCH)?;
        self.refs()
            .set_head(&default_branch)
            .context("failed to create initial HEAD reference")?;

        // the default branch exists but holds no commit yet
        write_atomically(
            &self.refs().heads_path().join(default_branch.as_ref()),
            b"",
        )?;

        Config::default()
            .save(&self.config_path())
            .context("failed to write .bitlet/config")?;

        tracing::info!(path = %self.git_path().display(), "repository initialized");

        writeln!(
            self.writer(),
            "Initialized empty bitlet repository in {}",
            self.git_path().display()
        )?;

        Ok(())
    }
}
