use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    /// Record the staged snapshot as a commit on top of the current branch
    ///
    /// Every tree object and the commit itself are stored before the branch
    /// ref moves, so the ref never names a partially written snapshot. The
    /// branch stays locked from reading the parent to moving the tip.
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<ObjectId> {
        self.ensure_initialized()?;

        let branch = self.refs().current_branch()?;
        let tree_oid = self.write_tree_object().await?;

        let (_, (commit_id, commit)) = self.refs().update_with(HEAD_REF_NAME, |parent| {
            let commit = Commit::new(
                tree_oid,
                parent.into_iter().collect(),
                Commit::timestamp_from_env(),
                message.to_string(),
            );
            let commit_id = self.database().store(&commit)?;

            Ok((commit_id.clone(), (commit_id, commit)))
        })?;

        tracing::info!(commit = %commit_id, branch = %branch, "commit created");

        let is_root = match commit.parent() {
            Some(_) => "",
            None => "(root-commit) ",
        };
        writeln!(
            self.writer(),
            "[{} {}{}] {}",
            branch,
            is_root,
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(commit_id)
    }
}
