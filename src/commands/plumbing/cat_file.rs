use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    /// Print an object's payload, or only its kind when `show_type` is set
    pub fn cat_file(&mut self, object_id: &str, show_type: bool) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let object_id = ObjectId::try_parse(object_id)?;
        let (object_type, payload) = self.database().load(&object_id)?;

        if show_type {
            writeln!(self.writer(), "{object_type}")?;
        } else {
            self.writer().write_all(&payload)?;
        }

        Ok(())
    }
}
