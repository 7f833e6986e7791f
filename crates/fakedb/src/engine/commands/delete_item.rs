use std::sync::Arc;

use fakedb_core::domain::command::DeletePrototype;
use fakedb_core::{CoreResult, DataCommand, ItemArgs};
use tracing::debug;

use super::subtree_ids;
use crate::storage::DataStore;

/// Deletes an item with all its descendants and their blobs
pub struct DeleteItemCommand {
    store: Arc<dyn DataStore>,
}

impl DeleteItemCommand {
    /// Bind the command to a storage
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

impl DataCommand for DeleteItemCommand {
    type Args = ItemArgs;
    type Output = bool;

    fn create_instance(&self) -> DeletePrototype {
        Box::new(DeleteItemCommand::new(self.store.clone()))
    }

    fn execute(&self, args: ItemArgs) -> CoreResult<bool> {
        let Some(record) = self.store.get_fake_item(&args.item.id) else {
            return Ok(false);
        };

        let ids = subtree_ids(self.store.as_ref(), &record);
        for id in ids.iter().rev() {
            self.store.remove_blobs(id);
            self.store.remove_fake_item(id);
        }

        debug!(item = %args.item.id, removed = ids.len(), "Deleted item");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::commands::test_support::{fake, item};
    use crate::storage::MockDataStore;
    use fakedb_core::Id;
    use mockall::predicate::eq;
    use mockall::Sequence;

    #[test]
    fn test_removes_descendants_first() {
        let (parent_id, child_id) = (Id::new_id(), Id::new_id());
        let mut parent = fake(parent_id, "parent", None);
        parent.children = vec![child_id];
        let child = fake(child_id, "child", Some(parent_id));

        let mut store = MockDataStore::new();
        store
            .expect_get_fake_item()
            .returning(move |id| {
                if *id == parent.id() {
                    Some(parent.clone())
                } else if *id == child.id() {
                    Some(child.clone())
                } else {
                    None
                }
            });
        store.expect_remove_blobs().times(2).return_const(());

        let mut seq = Sequence::new();
        store
            .expect_remove_fake_item()
            .with(eq(child_id))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(true);
        store
            .expect_remove_fake_item()
            .with(eq(parent_id))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(true);

        let deleted = DeleteItemCommand::new(Arc::new(store))
            .execute(ItemArgs { item: item(parent_id, "parent") })
            .unwrap();
        assert!(deleted);
    }

    #[test]
    fn test_absent_item_returns_false() {
        let mut store = MockDataStore::new();
        store.expect_get_fake_item().returning(|_| None);
        store.expect_remove_fake_item().never();

        let deleted = DeleteItemCommand::new(Arc::new(store))
            .execute(ItemArgs { item: item(Id::new_id(), "ghost") })
            .unwrap();
        assert!(!deleted);
    }
}
