use std::sync::Arc;

use chrono::Utc;
use fakedb_core::domain::command::RemoveVersionPrototype;
use fakedb_core::{CoreResult, DataCommand, ItemArgs};
use tracing::debug;

use crate::storage::DataStore;

/// Removes the version an item was read at, with its versioned values
pub struct RemoveVersionCommand {
    store: Arc<dyn DataStore>,
}

impl RemoveVersionCommand {
    /// Bind the command to a storage
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

impl DataCommand for RemoveVersionCommand {
    type Args = ItemArgs;
    type Output = bool;

    fn create_instance(&self) -> RemoveVersionPrototype {
        Box::new(RemoveVersionCommand::new(self.store.clone()))
    }

    fn execute(&self, args: ItemArgs) -> CoreResult<bool> {
        let item = args.item;
        let Some(mut record) = self.store.get_fake_item(&item.id) else {
            return Ok(false);
        };
        if item.version.is_latest() || !record.has_version(&item.language, item.version) {
            return Ok(false);
        }

        if let Some(versions) = record.versions.get_mut(&item.language) {
            versions.retain(|v| *v != item.version);
        }
        for field in &mut record.fields {
            field.remove_version(&item.language, item.version);
        }
        record.updated = Utc::now();
        self.store.put_fake_item(record)?;

        debug!(item = %item.id, language = %item.language, version = %item.version, "Removed version");
        Ok(true)
    }
}
