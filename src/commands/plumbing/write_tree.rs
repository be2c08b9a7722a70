use crate::areas::repository::Repository;
use crate::artifacts::core::error::Result;
use crate::artifacts::objects::file_tree::FileTree;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    pub async fn write_tree(&mut self) -> anyhow::Result<()> {
        let tree_oid = self.write_tree_object().await?;

        writeln!(self.writer(), "{tree_oid}")?;

        Ok(())
    }

    /// Nest the stage-less index and store every tree of the snapshot
    pub(crate) async fn write_tree_object(&self) -> Result<ObjectId> {
        self.ensure_initialized()?;

        let index = self.index();
        let mut index = index.lock().await;

        // Load the index file from the disk
        index.rehydrate()?;

        FileTree::nest(index.read_paths())?.write(self.database())
    }
}
