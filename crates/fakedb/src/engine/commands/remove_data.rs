use std::sync::Arc;

use chrono::Utc;
use fakedb_core::domain::command::RemoveDataPrototype;
use fakedb_core::{CoreResult, DataCommand, ItemArgs};
use tracing::debug;

use crate::storage::DataStore;

/// Removes every version and per-language value of the item's language.
///
/// Shared values belong to no language and are kept.
pub struct RemoveDataCommand {
    store: Arc<dyn DataStore>,
}

impl RemoveDataCommand {
    /// Bind the command to a storage
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

impl DataCommand for RemoveDataCommand {
    type Args = ItemArgs;
    type Output = bool;

    fn create_instance(&self) -> RemoveDataPrototype {
        Box::new(RemoveDataCommand::new(self.store.clone()))
    }

    fn execute(&self, args: ItemArgs) -> CoreResult<bool> {
        let Some(mut record) = self.store.get_fake_item(&args.item.id) else {
            return Ok(false);
        };

        let language = &args.item.language;
        record.versions.remove(language);
        for field in &mut record.fields {
            field.remove_language(language);
        }
        record.updated = Utc::now();
        self.store.put_fake_item(record)?;

        debug!(item = %args.item.id, %language, "Removed language data");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DbField, FakeItem};
    use crate::engine::commands::test_support::{fake, item};
    use crate::storage::MockDataStore;
    use fakedb_core::{Id, Language, Version};
    use parking_lot::Mutex;

    #[test]
    fn test_removes_only_the_item_language() {
        let id = Id::new_id();
        let da = Language::parse("da").unwrap();
        let mut record = fake(id, "home", None);
        record.add_version(&da, Version::FIRST);
        record.fields.push(
            DbField::new("Title")
                .with_value("shared")
                .with_version_value(Language::default(), Version::FIRST, "english")
                .with_version_value(da.clone(), Version::FIRST, "dansk"),
        );

        let saved: Arc<Mutex<Option<FakeItem>>> = Arc::new(Mutex::new(None));
        let sink = saved.clone();
        let mut store = MockDataStore::new();
        store.expect_get_fake_item().return_const(Some(record));
        store.expect_put_fake_item().returning(move |record| {
            *sink.lock() = Some(record);
            Ok(())
        });

        let mut target = item(id, "home");
        target.language = da.clone();
        assert!(RemoveDataCommand::new(Arc::new(store))
            .execute(ItemArgs { item: target })
            .unwrap());

        let saved = saved.lock().take().unwrap();
        assert!(saved.versions_in(&da).is_empty());
        assert_eq!(saved.versions_in(&Language::default()), &[Version::FIRST]);
        assert_eq!(saved.fields[0].value_for(&da, Version::FIRST), Some("shared"));
        assert_eq!(
            saved.fields[0].value_for(&Language::default(), Version::FIRST),
            Some("english")
        );
    }

    #[test]
    fn test_absent_item_returns_false() {
        let mut store = MockDataStore::new();
        store.expect_get_fake_item().returning(|_| None);
        store.expect_put_fake_item().never();

        assert!(!RemoveDataCommand::new(Arc::new(store))
            .execute(ItemArgs { item: item(Id::new_id(), "ghost") })
            .unwrap());
    }
}
