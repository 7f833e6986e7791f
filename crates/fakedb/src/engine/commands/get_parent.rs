use std::sync::Arc;

use fakedb_core::domain::command::GetParentPrototype;
use fakedb_core::{CoreResult, DataCommand, Item, ItemArgs, Version};

use crate::storage::DataStore;

/// Fetches the parent of an item in the item's language
pub struct GetParentCommand {
    store: Arc<dyn DataStore>,
}

impl GetParentCommand {
    /// Bind the command to a storage
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

impl DataCommand for GetParentCommand {
    type Args = ItemArgs;
    type Output = Option<Item>;

    fn create_instance(&self) -> GetParentPrototype {
        Box::new(GetParentCommand::new(self.store.clone()))
    }

    fn execute(&self, args: ItemArgs) -> CoreResult<Option<Item>> {
        let parent_id = self
            .store
            .get_fake_item(&args.item.id)
            .and_then(|record| record.parent_id);

        match parent_id {
            Some(id) => self
                .store
                .get_item_instance(&id, &args.item.language, Version::LATEST),
            None => Ok(None),
        }
    }
}
