use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    /// Bring the working copy, the index and the current branch to `target`
    ///
    /// HEAD stays symbolic: the branch it names is moved to the target.
    pub async fn checkout(&mut self, target: &str) -> anyhow::Result<()> {
        self.ensure_working_copy()?;

        let target_oid = ObjectId::try_parse(target)?;
        let target_commit = self.database().load_commit(&target_oid)?;
        let current_oid = self.refs().read_hash(HEAD_REF_NAME)?;

        let index = self.index();
        let mut index = index.lock().await;

        let tree_diff = self
            .database()
            .tree_diff(current_oid.as_ref(), Some(&target_oid))?;
        let migration = Migration::new(self.database(), tree_diff);

        self.workspace().apply_migration(&migration)?;
        index.update(|index| {
            index.reset(migration.target());
            Ok(())
        })?;
        self.refs().update(HEAD_REF_NAME, &target_oid)?;

        tracing::info!(
            commit = %target_oid,
            changes = migration.len(),
            "checkout applied"
        );

        writeln!(
            self.writer(),
            "HEAD is now at {} {}",
            target_oid.to_short_oid(),
            target_commit.short_message()
        )?;

        Ok(())
    }
}
