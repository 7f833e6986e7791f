//! Fake data commands, one per operation slot.
//!
//! Every command holds nothing but the storage it is bound to, so a blank
//! instance is a copy of that binding.

mod add_from_template;
mod add_version;
mod blob_stream;
mod copy_item;
mod create_item;
mod delete_item;
mod get_children;
mod get_item;
mod get_parent;
mod get_root_item;
mod get_versions;
mod has_children;
mod move_item;
mod remove_data;
mod remove_version;
mod resolve_path;
mod save_item;

pub use add_from_template::AddFromTemplateCommand;
pub use add_version::AddVersionCommand;
pub use blob_stream::{BlobStreamExistsCommand, GetBlobStreamCommand, SetBlobStreamCommand};
pub use copy_item::CopyItemCommand;
pub use create_item::CreateItemCommand;
pub use delete_item::DeleteItemCommand;
pub use get_children::GetChildrenCommand;
pub use get_item::GetItemCommand;
pub use get_parent::GetParentCommand;
pub use get_root_item::GetRootItemCommand;
pub use get_versions::GetVersionsCommand;
pub use has_children::HasChildrenCommand;
pub use move_item::MoveItemCommand;
pub use remove_data::RemoveDataCommand;
pub use remove_version::RemoveVersionCommand;
pub use resolve_path::ResolvePathCommand;
pub use save_item::SaveItemCommand;

use fakedb_core::{ensure_not_empty, CoreError, CoreResult, Id, Item, Version};
use tracing::debug;

use crate::data::FakeItem;
use crate::storage::DataStore;

/// Stored definition of an item the operation requires
fn require_item(store: &dyn DataStore, id: &Id, entity: &str) -> CoreResult<FakeItem> {
    store
        .get_fake_item(id)
        .ok_or_else(|| CoreError::not_found(entity, id))
}

/// Ids of `root` and all its descendants, pre-order
fn subtree_ids(store: &dyn DataStore, root: &FakeItem) -> Vec<Id> {
    let mut ids = vec![root.id()];
    let mut index = 0;
    while index < ids.len() {
        if let Some(item) = store.get_fake_item(&ids[index]) {
            let position = index + 1;
            let children: Vec<Id> = item
                .children
                .iter()
                .filter(|child| !ids.contains(child))
                .copied()
                .collect();
            // Depth-first: children go right after their parent.
            ids.splice(position..position, children);
        }
        index += 1;
    }
    ids
}

/// Shared by CreateItem and AddFromTemplate
fn create_item(
    store: &dyn DataStore,
    item_id: Id,
    item_name: &str,
    template_id: Id,
    destination: &Item,
) -> CoreResult<Item> {
    ensure_not_empty(item_name, "itemName")?;
    if item_id.is_null() {
        return Err(CoreError::invalid_argument("itemId cannot be null"));
    }
    if store.get_fake_template(&template_id).is_none() {
        return Err(CoreError::TemplateNotFound(template_id));
    }
    require_item(store, &destination.id, "Destination")?;
    if store.get_fake_item(&item_id).is_some() {
        return Err(CoreError::DuplicateKey(item_id.to_string()));
    }

    let record = FakeItem::new(
        item_id,
        item_name,
        template_id,
        Some(destination.id),
        &destination.language,
    );
    store.add_fake_item(record)?;
    debug!(item = %item_id, name = item_name, parent = %destination.id, "Created item");

    store
        .get_item_instance(&item_id, &destination.language, Version::LATEST)?
        .ok_or_else(|| CoreError::not_found("Item", item_id))
}
