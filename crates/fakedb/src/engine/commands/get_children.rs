use std::sync::Arc;

use fakedb_core::domain::command::GetChildrenPrototype;
use fakedb_core::{CoreResult, DataCommand, ItemArgs, ItemList, Version};

use crate::storage::DataStore;

/// Lists the children of an item in declaration order.
///
/// Children are materialized in the parent's language at their latest
/// version. An unknown parent has no children.
pub struct GetChildrenCommand {
    store: Arc<dyn DataStore>,
}

impl GetChildrenCommand {
    /// Bind the command to a storage
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

impl DataCommand for GetChildrenCommand {
    type Args = ItemArgs;
    type Output = ItemList;

    fn create_instance(&self) -> GetChildrenPrototype {
        Box::new(GetChildrenCommand::new(self.store.clone()))
    }

    fn execute(&self, args: ItemArgs) -> CoreResult<ItemList> {
        let Some(record) = self.store.get_fake_item(&args.item.id) else {
            return Ok(ItemList::new());
        };

        let mut children = ItemList::with_capacity(record.children.len());
        for child_id in &record.children {
            if let Some(child) =
                self.store
                    .get_item_instance(child_id, &args.item.language, Version::LATEST)?
            {
                children.push(child);
            }
        }
        Ok(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::commands::test_support::{fake, item};
    use crate::storage::MockDataStore;
    use fakedb_core::{Id, Language};
    use mockall::predicate::{always, eq};

    #[test]
    fn test_create_instance_behaves_like_the_prototype() {
        let mut store = MockDataStore::new();
        store.expect_get_fake_item().returning(|_| None);

        let prototype = GetChildrenCommand::new(Arc::new(store));
        let blank = prototype.create_instance();

        let args = ItemArgs { item: item(Id::new_id(), "item") };
        assert_eq!(
            prototype.execute(args.clone()).unwrap(),
            blank.execute(args).unwrap()
        );
    }

    #[test]
    fn test_returns_item_children() {
        let (item_id, child1_id, child2_id) = (Id::new_id(), Id::new_id(), Id::new_id());
        let mut record = fake(item_id, "item", None);
        record.children = vec![child1_id, child2_id];

        let child1 = item(child1_id, "child1");
        let child2 = item(child2_id, "child2");

        let mut store = MockDataStore::new();
        store
            .expect_get_fake_item()
            .with(eq(item_id))
            .return_const(Some(record));
        store
            .expect_get_item_instance()
            .with(eq(child1_id), eq(Language::default()), always())
            .returning({
                let found = child1.clone();
                move |_, _, _| Ok(Some(found.clone()))
            });
        store
            .expect_get_item_instance()
            .with(eq(child2_id), eq(Language::default()), always())
            .returning({
                let found = child2.clone();
                move |_, _, _| Ok(Some(found.clone()))
            });

        let children = GetChildrenCommand::new(Arc::new(store))
            .execute(ItemArgs { item: item(item_id, "item") })
            .unwrap();

        assert_eq!(children.len(), 2);
        assert_eq!(children[0], child1);
        assert_eq!(children[1], child2);
    }

    #[test]
    fn test_childless_item_returns_empty_list() {
        let item_id = Id::new_id();
        let mut store = MockDataStore::new();
        store
            .expect_get_fake_item()
            .return_const(Some(fake(item_id, "leaf", None)));
        store.expect_get_item_instance().never();

        let children = GetChildrenCommand::new(Arc::new(store))
            .execute(ItemArgs { item: item(item_id, "leaf") })
            .unwrap();
        assert!(children.is_empty());
    }
}
