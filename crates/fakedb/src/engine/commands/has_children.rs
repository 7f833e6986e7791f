use std::sync::Arc;

use fakedb_core::domain::command::HasChildrenPrototype;
use fakedb_core::{CoreResult, DataCommand, ItemArgs};

use crate::storage::DataStore;

/// Checks whether an item has at least one child
pub struct HasChildrenCommand {
    store: Arc<dyn DataStore>,
}

impl HasChildrenCommand {
    /// Bind the command to a storage
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

impl DataCommand for HasChildrenCommand {
    type Args = ItemArgs;
    type Output = bool;

    fn create_instance(&self) -> HasChildrenPrototype {
        Box::new(HasChildrenCommand::new(self.store.clone()))
    }

    fn execute(&self, args: ItemArgs) -> CoreResult<bool> {
        Ok(self
            .store
            .get_fake_item(&args.item.id)
            .is_some_and(|record| !record.children.is_empty()))
    }
}
