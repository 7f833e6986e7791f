use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use fakedb_core::domain::command::CopyItemPrototype;
use fakedb_core::{ensure_not_empty, CopyItemArgs, CoreError, CoreResult, DataCommand, Id, Item, Version};
use tracing::debug;

use super::{require_item, subtree_ids};
use crate::storage::DataStore;

/// Copies an item, and with `deep` its whole subtree, under a destination.
///
/// The copy root takes the requested id and name; every other copied item
/// gets a fresh id. Child order and blobs are carried over.
pub struct CopyItemCommand {
    store: Arc<dyn DataStore>,
}

impl CopyItemCommand {
    /// Bind the command to a storage
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

impl DataCommand for CopyItemCommand {
    type Args = CopyItemArgs;
    type Output = Item;

    fn create_instance(&self) -> CopyItemPrototype {
        Box::new(CopyItemCommand::new(self.store.clone()))
    }

    fn execute(&self, args: CopyItemArgs) -> CoreResult<Item> {
        let store = self.store.as_ref();
        ensure_not_empty(&args.copy_name, "copyName")?;

        let source = require_item(store, &args.source.id, "Item")?;
        require_item(store, &args.destination.id, "Destination")?;
        if store.get_fake_item(&args.copy_id).is_some() {
            return Err(CoreError::DuplicateKey(args.copy_id.to_string()));
        }

        let originals = if args.deep {
            subtree_ids(store, &source)
        } else {
            vec![source.id()]
        };

        let mut new_ids: HashMap<Id, Id> = HashMap::new();
        new_ids.insert(source.id(), args.copy_id);
        for original in originals.iter().skip(1) {
            new_ids.insert(*original, Id::new_id());
        }

        let now = Utc::now();
        for original in &originals {
            let Some(record) = store.get_fake_item(original) else {
                continue;
            };

            let mut copy = record.with_new_id(new_ids[original]);
            copy.created = now;
            copy.updated = now;
            if *original == source.id() {
                copy.name = args.copy_name.clone();
                copy.parent_id = Some(args.destination.id);
            } else {
                copy.parent_id = record.parent_id.and_then(|id| new_ids.get(&id).copied());
            }
            copy.children = if args.deep {
                record
                    .children
                    .iter()
                    .filter_map(|child| new_ids.get(child).copied())
                    .collect()
            } else {
                Vec::new()
            };

            let copy_id = copy.id();
            store.add_fake_item(copy)?;
            for (field_id, data) in store.blobs_of(original) {
                store.set_blob(&copy_id, &field_id, data);
            }
        }

        debug!(
            source = %source.id(),
            copy = %args.copy_id,
            items = originals.len(),
            "Copied item"
        );
        store
            .get_item_instance(&args.copy_id, &args.source.language, Version::LATEST)?
            .ok_or_else(|| CoreError::not_found("Item", args.copy_id))
    }
}
