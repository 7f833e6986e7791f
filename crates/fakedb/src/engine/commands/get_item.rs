use std::sync::Arc;

use fakedb_core::domain::command::GetItemPrototype;
use fakedb_core::{CoreResult, DataCommand, GetItemArgs, Item};

use crate::storage::DataStore;

/// Looks an item up by id
pub struct GetItemCommand {
    store: Arc<dyn DataStore>,
}

impl GetItemCommand {
    /// Bind the command to a storage
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

impl DataCommand for GetItemCommand {
    type Args = GetItemArgs;
    type Output = Option<Item>;

    fn create_instance(&self) -> GetItemPrototype {
        Box::new(GetItemCommand::new(self.store.clone()))
    }

    fn execute(&self, args: GetItemArgs) -> CoreResult<Option<Item>> {
        self.store
            .get_item_instance(&args.item_id, &args.language, args.version)
    }
}
