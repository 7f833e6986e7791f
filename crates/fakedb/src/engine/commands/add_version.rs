use std::sync::Arc;

use chrono::Utc;
use fakedb_core::domain::command::AddVersionPrototype;
use fakedb_core::{AddVersionArgs, CoreError, CoreResult, DataCommand, Version};
use tracing::debug;

use super::require_item;
use crate::storage::DataStore;

/// Adds a version to an item in the item's language.
///
/// The new number is one past the highest existing one, and versioned
/// values of the version the item was read at are carried over.
pub struct AddVersionCommand {
    store: Arc<dyn DataStore>,
}

impl AddVersionCommand {
    /// Bind the command to a storage
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

impl DataCommand for AddVersionCommand {
    type Args = AddVersionArgs;
    type Output = Version;

    fn create_instance(&self) -> AddVersionPrototype {
        Box::new(AddVersionCommand::new(self.store.clone()))
    }

    fn execute(&self, args: AddVersionArgs) -> CoreResult<Version> {
        let item = args.item;
        let mut record = require_item(self.store.as_ref(), &item.id, "Item")?;

        let language = &item.language;
        let next = match record.versions_in(language).iter().max() {
            Some(latest) => latest.next().ok_or_else(|| {
                CoreError::invalid_argument(format!(
                    "item {} has no version number after {}",
                    item.id, latest
                ))
            })?,
            None => Version::FIRST,
        };

        if !item.version.is_latest() {
            for field in &mut record.fields {
                field.copy_version(language, item.version, next);
            }
        }
        record.add_version(language, next);
        record.updated = Utc::now();
        self.store.put_fake_item(record)?;

        debug!(item = %item.id, %language, version = %next, "Added version");
        Ok(next)
    }
}
