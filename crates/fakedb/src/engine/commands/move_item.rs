use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use fakedb_core::domain::command::MoveItemPrototype;
use fakedb_core::{CoreError, CoreResult, DataCommand, MoveItemArgs};
use tracing::debug;

use super::require_item;
use crate::storage::DataStore;

/// Re-parents an item.
///
/// The item leaves its old parent's child list and is appended to the
/// destination's exactly once.
pub struct MoveItemCommand {
    store: Arc<dyn DataStore>,
}

impl MoveItemCommand {
    /// Bind the command to a storage
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

impl DataCommand for MoveItemCommand {
    type Args = MoveItemArgs;
    type Output = bool;

    fn create_instance(&self) -> MoveItemPrototype {
        Box::new(MoveItemCommand::new(self.store.clone()))
    }

    fn execute(&self, args: MoveItemArgs) -> CoreResult<bool> {
        let store = self.store.as_ref();
        let item_id = args.item.id;
        let destination_id = args.destination.id;

        let mut record = require_item(store, &item_id, "Item")?;
        require_item(store, &destination_id, "Destination")?;

        // The destination must not lie inside the moved subtree.
        let mut visited = HashSet::new();
        let mut cursor = Some(destination_id);
        while let Some(id) = cursor {
            if id == item_id {
                return Err(CoreError::invalid_argument(format!(
                    "cannot move {} under itself or one of its descendants",
                    item_id
                )));
            }
            if !visited.insert(id) {
                break;
            }
            cursor = store.get_fake_item(&id).and_then(|ancestor| ancestor.parent_id);
        }

        if let Some(mut old_parent) = record.parent_id.and_then(|id| store.get_fake_item(&id)) {
            old_parent.children.retain(|child| *child != item_id);
            store.put_fake_item(old_parent)?;
        }

        record.parent_id = Some(destination_id);
        record.updated = Utc::now();
        store.put_fake_item(record)?;

        let mut destination = require_item(store, &destination_id, "Destination")?;
        destination.children.retain(|child| *child != item_id);
        destination.children.push(item_id);
        store.put_fake_item(destination)?;

        debug!(item = %item_id, destination = %destination_id, "Moved item");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FakeItem;
    use crate::engine::commands::test_support::{fake, item};
    use crate::storage::MockDataStore;
    use fakedb_core::Id;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// A mock whose reads observe its own writes
    fn store_over(records: Vec<FakeItem>) -> (MockDataStore, Arc<Mutex<HashMap<Id, FakeItem>>>) {
        let state: Arc<Mutex<HashMap<Id, FakeItem>>> =
            Arc::new(Mutex::new(records.into_iter().map(|r| (r.id(), r)).collect()));

        let mut store = MockDataStore::new();
        let reads = state.clone();
        store
            .expect_get_fake_item()
            .returning(move |id| reads.lock().get(id).cloned());
        let writes = state.clone();
        store.expect_put_fake_item().returning(move |record| {
            writes.lock().insert(record.id(), record);
            Ok(())
        });
        (store, state)
    }

    #[test]
    fn test_moves_between_parents() {
        let (old_id, new_id, moved_id, sibling_id) =
            (Id::new_id(), Id::new_id(), Id::new_id(), Id::new_id());
        let mut old_parent = fake(old_id, "old", None);
        old_parent.children = vec![moved_id];
        let mut new_parent = fake(new_id, "new", None);
        new_parent.children = vec![sibling_id];

        let (store, state) = store_over(vec![
            old_parent,
            new_parent,
            fake(moved_id, "moved", Some(old_id)),
            fake(sibling_id, "sibling", Some(new_id)),
        ]);

        let moved = MoveItemCommand::new(Arc::new(store))
            .execute(MoveItemArgs {
                item: item(moved_id, "moved"),
                destination: item(new_id, "new"),
            })
            .unwrap();
        assert!(moved);

        let state = state.lock();
        assert!(state[&old_id].children.is_empty());
        assert_eq!(state[&new_id].children, vec![sibling_id, moved_id]);
        assert_eq!(state[&moved_id].parent_id, Some(new_id));
    }

    #[test]
    fn test_move_under_descendant_is_rejected() {
        let (parent_id, child_id) = (Id::new_id(), Id::new_id());
        let mut parent = fake(parent_id, "parent", None);
        parent.children = vec![child_id];

        let records: HashMap<Id, FakeItem> = vec![parent, fake(child_id, "child", Some(parent_id))]
            .into_iter()
            .map(|r| (r.id(), r))
            .collect();

        let mut store = MockDataStore::new();
        store
            .expect_get_fake_item()
            .returning(move |id| records.get(id).cloned());
        store.expect_put_fake_item().never();

        let err = MoveItemCommand::new(Arc::new(store))
            .execute(MoveItemArgs {
                item: item(parent_id, "parent"),
                destination: item(child_id, "child"),
            })
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn test_missing_destination_fails() {
        let moved_id = Id::new_id();
        let (store, _) = store_over(vec![fake(moved_id, "moved", None)]);

        let err = MoveItemCommand::new(Arc::new(store))
            .execute(MoveItemArgs {
                item: item(moved_id, "moved"),
                destination: item(Id::new_id(), "nowhere"),
            })
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
