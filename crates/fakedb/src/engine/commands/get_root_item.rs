use std::sync::Arc;

use fakedb_core::domain::command::GetRootItemPrototype;
use fakedb_core::{CoreResult, DataCommand, GetRootItemArgs, Item};

use crate::constants::ROOT_ID;
use crate::storage::DataStore;

/// Fetches the root of the content tree
pub struct GetRootItemCommand {
    store: Arc<dyn DataStore>,
}

impl GetRootItemCommand {
    /// Bind the command to a storage
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

impl DataCommand for GetRootItemCommand {
    type Args = GetRootItemArgs;
    type Output = Option<Item>;

    fn create_instance(&self) -> GetRootItemPrototype {
        Box::new(GetRootItemCommand::new(self.store.clone()))
    }

    fn execute(&self, args: GetRootItemArgs) -> CoreResult<Option<Item>> {
        self.store
            .get_item_instance(&ROOT_ID, &args.language, args.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::commands::test_support::item;
    use crate::storage::MockDataStore;
    use fakedb_core::{Language, Version};
    use mockall::predicate::{always, eq};

    #[test]
    fn test_materializes_well_known_root() {
        let root = item(ROOT_ID, "sitecore");
        let mut store = MockDataStore::new();
        store
            .expect_get_item_instance()
            .with(eq(ROOT_ID), always(), always())
            .returning({
                let found = root.clone();
                move |_, _, _| Ok(Some(found.clone()))
            });

        let found = GetRootItemCommand::new(Arc::new(store))
            .execute(GetRootItemArgs {
                language: Language::default(),
                version: Version::LATEST,
            })
            .unwrap();
        assert_eq!(found, Some(root));
    }
}
