use std::sync::Arc;

use chrono::Utc;
use fakedb_core::domain::command::SaveItemPrototype;
use fakedb_core::{ensure_not_empty, CoreError, CoreResult, DataCommand, FieldScope, ItemArgs, Version};
use tracing::debug;

use super::require_item;
use crate::storage::DataStore;

/// Writes the modified fields and the name of an item back to storage.
///
/// Each field is stored according to its scope: shared values for every
/// language, unversioned values for the item's language, versioned values
/// for the item's language and version. A versioned write to a language
/// without versions creates version 1 there. Saving an item read at a
/// version that has since been removed fails.
pub struct SaveItemCommand {
    store: Arc<dyn DataStore>,
}

impl SaveItemCommand {
    /// Bind the command to a storage
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

impl DataCommand for SaveItemCommand {
    type Args = ItemArgs;
    type Output = bool;

    fn create_instance(&self) -> SaveItemPrototype {
        Box::new(SaveItemCommand::new(self.store.clone()))
    }

    fn execute(&self, args: ItemArgs) -> CoreResult<bool> {
        let item = args.item;
        ensure_not_empty(&item.name, "itemName")?;
        let mut record = require_item(self.store.as_ref(), &item.id, "Item")?;

        let language = &item.language;
        if !item.version.is_latest() && !record.has_version(language, item.version) {
            return Err(CoreError::not_found(
                "Version",
                format!("{} {}#{}", item.id, language, item.version),
            ));
        }

        let mut modified = 0;
        for field in item.fields.modified() {
            match field.scope {
                FieldScope::Shared => record.field_mut(&field.id, &field.name).set_shared(&field.value),
                FieldScope::Unversioned => record
                    .field_mut(&field.id, &field.name)
                    .set_unversioned(language, &field.value),
                FieldScope::Versioned => {
                    let version = if !item.version.is_latest() {
                        item.version
                    } else if let Some(latest) = record.latest_version(language) {
                        latest
                    } else {
                        record.add_version(language, Version::FIRST);
                        Version::FIRST
                    };
                    record
                        .field_mut(&field.id, &field.name)
                        .set_versioned(language, version, &field.value);
                }
            }
            modified += 1;
        }

        if record.name != item.name {
            debug!(item = %item.id, from = %record.name, to = %item.name, "Renaming item");
            record.name = item.name.clone();
        }
        record.updated = Utc::now();
        self.store.put_fake_item(record)?;

        debug!(item = %item.id, %language, version = %item.version, fields = modified, "Saved item");
        Ok(true)
    }
}
