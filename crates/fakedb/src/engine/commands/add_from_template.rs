use std::sync::Arc;

use fakedb_core::domain::command::AddFromTemplatePrototype;
use fakedb_core::{AddFromTemplateArgs, CoreResult, DataCommand, Item};

use crate::storage::DataStore;

/// Creates an item from a template with a caller-chosen id
pub struct AddFromTemplateCommand {
    store: Arc<dyn DataStore>,
}

impl AddFromTemplateCommand {
    /// Bind the command to a storage
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

impl DataCommand for AddFromTemplateCommand {
    type Args = AddFromTemplateArgs;
    type Output = Item;

    fn create_instance(&self) -> AddFromTemplatePrototype {
        Box::new(AddFromTemplateCommand::new(self.store.clone()))
    }

    fn execute(&self, args: AddFromTemplateArgs) -> CoreResult<Item> {
        super::create_item(
            self.store.as_ref(),
            args.new_id,
            &args.item_name,
            args.template_id,
            &args.destination,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DbTemplate;
    use crate::engine::commands::test_support::{fake, item};
    use crate::storage::MockDataStore;
    use fakedb_core::{CoreError, Id};

    #[test]
    fn test_existing_id_is_a_duplicate() {
        let existing = Id::new_id();
        let mut store = MockDataStore::new();
        store
            .expect_get_fake_template()
            .returning(|id| Some(DbTemplate::with_id(*id, "Sample")));
        store
            .expect_get_fake_item()
            .returning(|id| Some(fake(*id, "x", None)));
        store.expect_add_fake_item().never();

        let err = AddFromTemplateCommand::new(Arc::new(store))
            .execute(AddFromTemplateArgs {
                item_name: "home".to_string(),
                template_id: Id::new_id(),
                destination: item(Id::new_id(), "content"),
                new_id: existing,
            })
            .unwrap_err();
        assert_eq!(err, CoreError::DuplicateKey(existing.to_string()));
    }

    #[test]
    fn test_null_id_is_rejected() {
        let store = MockDataStore::new();
        let err = AddFromTemplateCommand::new(Arc::new(store))
            .execute(AddFromTemplateArgs {
                item_name: "home".to_string(),
                template_id: Id::new_id(),
                destination: item(Id::new_id(), "content"),
                new_id: Id::NULL,
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }
}
