use std::sync::Arc;

use fakedb_core::domain::command::GetVersionsPrototype;
use fakedb_core::{CoreResult, DataCommand, GetVersionsArgs, Version};

use crate::storage::DataStore;

/// Lists the versions of an item in one language, in insertion order
pub struct GetVersionsCommand {
    store: Arc<dyn DataStore>,
}

impl GetVersionsCommand {
    /// Bind the command to a storage
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

impl DataCommand for GetVersionsCommand {
    type Args = GetVersionsArgs;
    type Output = Vec<Version>;

    fn create_instance(&self) -> GetVersionsPrototype {
        Box::new(GetVersionsCommand::new(self.store.clone()))
    }

    fn execute(&self, args: GetVersionsArgs) -> CoreResult<Vec<Version>> {
        Ok(self
            .store
            .get_fake_item(&args.item.id)
            .map(|record| record.versions_in(&args.language).to_vec())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::commands::test_support::{fake, item};
    use crate::storage::MockDataStore;
    use fakedb_core::{Id, Language};

    #[test]
    fn test_versions_keep_insertion_order() {
        let id = Id::new_id();
        let da = Language::parse("da").unwrap();
        let mut record = fake(id, "home", None);
        record.add_version(&da, Version::new(3));
        record.add_version(&da, Version::new(2));

        let mut store = MockDataStore::new();
        store.expect_get_fake_item().return_const(Some(record));

        let versions = GetVersionsCommand::new(Arc::new(store))
            .execute(GetVersionsArgs {
                item: item(id, "home"),
                language: da,
            })
            .unwrap();
        assert_eq!(versions, vec![Version::new(3), Version::new(2)]);
    }

    #[test]
    fn test_absent_item_has_no_versions() {
        let mut store = MockDataStore::new();
        store.expect_get_fake_item().returning(|_| None);

        let versions = GetVersionsCommand::new(Arc::new(store))
            .execute(GetVersionsArgs {
                item: item(Id::new_id(), "ghost"),
                language: Language::default(),
            })
            .unwrap();
        assert!(versions.is_empty());
    }
}
