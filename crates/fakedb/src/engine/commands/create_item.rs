use std::sync::Arc;

use fakedb_core::domain::command::CreateItemPrototype;
use fakedb_core::{CoreResult, CreateItemArgs, DataCommand, Item};

use crate::storage::DataStore;

/// Creates an item under a destination with a caller-supplied id
pub struct CreateItemCommand {
    store: Arc<dyn DataStore>,
}

impl CreateItemCommand {
    /// Bind the command to a storage
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

impl DataCommand for CreateItemCommand {
    type Args = CreateItemArgs;
    type Output = Item;

    fn create_instance(&self) -> CreateItemPrototype {
        Box::new(CreateItemCommand::new(self.store.clone()))
    }

    fn execute(&self, args: CreateItemArgs) -> CoreResult<Item> {
        super::create_item(
            self.store.as_ref(),
            args.item_id,
            &args.item_name,
            args.template_id,
            &args.destination,
        )
    }
}
