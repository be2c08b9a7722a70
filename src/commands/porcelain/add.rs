use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexKey;
use std::collections::BTreeSet;
use std::path::Path;

impl Repository {
    pub async fn add(&mut self, paths: &[String]) -> anyhow::Result<()> {
        self.ensure_working_copy()?;

        let index = self.index();
        let mut index = index.lock().await;

        index.update(|index| {
            let mut files = BTreeSet::new();

            for path in paths {
                let prefix = self.workspace().relative_path(Path::new(path))?;

                // files on disk below the path, plus tracked ones that vanished from it
                files.extend(self.workspace().list_files(Path::new(&prefix))?);
                files.extend(
                    index
                        .read_paths()
                        .into_keys()
                        .filter(|tracked| IndexKey::normal(tracked.as_str()).is_within(&prefix))
                        .filter(|tracked| !self.workspace().exists(tracked)),
                );
            }

            let files = files.into_iter().collect::<Vec<_>>();
            index.stage_files(&files, self.workspace(), self.database())
        })?;

        tracing::info!(entries = index.len(), "index updated");

        Ok(())
    }
}
