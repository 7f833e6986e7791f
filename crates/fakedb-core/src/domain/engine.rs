//! The command slot table and the dispatcher that executes it.

use tracing::trace;

use crate::domain::command::*;
use crate::domain::item::{Item, ItemList};
use crate::error::CoreResult;
use crate::types::Version;

/// One replaceable command prototype per storage operation.
///
/// A fresh table rejects every operation with `UnsupportedOperation` until a
/// data provider installs its commands.
pub struct DataEngineCommands {
    /// Create from template with a caller-chosen id
    pub add_from_template_prototype: AddFromTemplatePrototype,
    /// Add a version
    pub add_version_prototype: AddVersionPrototype,
    /// Check for a blob
    pub blob_stream_exists_prototype: BlobStreamExistsPrototype,
    /// Copy an item
    pub copy_item_prototype: CopyItemPrototype,
    /// Create an item
    pub create_item_prototype: CreateItemPrototype,
    /// Delete an item with its descendants
    pub delete_prototype: DeletePrototype,
    /// Read a blob
    pub get_blob_stream_prototype: GetBlobStreamPrototype,
    /// List children
    pub get_children_prototype: GetChildrenPrototype,
    /// Look an item up by id
    pub get_item_prototype: GetItemPrototype,
    /// Fetch the parent
    pub get_parent_prototype: GetParentPrototype,
    /// Fetch the root
    pub get_root_item_prototype: GetRootItemPrototype,
    /// List versions
    pub get_versions_prototype: GetVersionsPrototype,
    /// Check for children
    pub has_children_prototype: HasChildrenPrototype,
    /// Re-parent an item
    pub move_item_prototype: MoveItemPrototype,
    /// Remove the data of one language
    pub remove_data_prototype: RemoveDataPrototype,
    /// Remove one version
    pub remove_version_prototype: RemoveVersionPrototype,
    /// Resolve a path
    pub resolve_path_prototype: ResolvePathPrototype,
    /// Save changed fields
    pub save_item_prototype: SaveItemPrototype,
    /// Write a blob
    pub set_blob_stream_prototype: SetBlobStreamPrototype,
}

impl Default for DataEngineCommands {
    fn default() -> Self {
        Self {
            add_from_template_prototype: Box::new(UnsupportedCommand::new("AddFromTemplate")),
            add_version_prototype: Box::new(UnsupportedCommand::new("AddVersion")),
            blob_stream_exists_prototype: Box::new(UnsupportedCommand::new("BlobStreamExists")),
            copy_item_prototype: Box::new(UnsupportedCommand::new("CopyItem")),
            create_item_prototype: Box::new(UnsupportedCommand::new("CreateItem")),
            delete_prototype: Box::new(UnsupportedCommand::new("DeleteItem")),
            get_blob_stream_prototype: Box::new(UnsupportedCommand::new("GetBlobStream")),
            get_children_prototype: Box::new(UnsupportedCommand::new("GetChildren")),
            get_item_prototype: Box::new(UnsupportedCommand::new("GetItem")),
            get_parent_prototype: Box::new(UnsupportedCommand::new("GetParent")),
            get_root_item_prototype: Box::new(UnsupportedCommand::new("GetRootItem")),
            get_versions_prototype: Box::new(UnsupportedCommand::new("GetVersions")),
            has_children_prototype: Box::new(UnsupportedCommand::new("HasChildren")),
            move_item_prototype: Box::new(UnsupportedCommand::new("MoveItem")),
            remove_data_prototype: Box::new(UnsupportedCommand::new("RemoveData")),
            remove_version_prototype: Box::new(UnsupportedCommand::new("RemoveVersion")),
            resolve_path_prototype: Box::new(UnsupportedCommand::new("ResolvePath")),
            save_item_prototype: Box::new(UnsupportedCommand::new("SaveItem")),
            set_blob_stream_prototype: Box::new(UnsupportedCommand::new("SetBlobStream")),
        }
    }
}

/// Run one execution of a slot on a blank copy of its prototype
fn run<A: 'static, O: 'static>(
    operation: &str,
    prototype: &CommandPrototype<A, O>,
    args: A,
) -> CoreResult<O> {
    trace!(operation, "Dispatching data command");
    prototype.create_instance().execute(args)
}

/// Dispatches storage operations of a database to its command table
#[derive(Default)]
pub struct DataEngine {
    commands: DataEngineCommands,
}

impl DataEngine {
    /// Create an engine over a command table
    pub fn new(commands: DataEngineCommands) -> Self {
        Self { commands }
    }

    /// The installed command table
    pub fn commands(&self) -> &DataEngineCommands {
        &self.commands
    }

    /// Mutable access for installing overrides
    pub fn commands_mut(&mut self) -> &mut DataEngineCommands {
        &mut self.commands
    }

    /// Put every slot back to the unsupported placeholder
    pub fn reset(&mut self) {
        self.commands = DataEngineCommands::default();
    }

    /// Run the `add_from_template` slot
    pub fn add_from_template(&self, args: AddFromTemplateArgs) -> CoreResult<Item> {
        run("AddFromTemplate", &self.commands.add_from_template_prototype, args)
    }

    /// Run the `add_version` slot
    pub fn add_version(&self, args: AddVersionArgs) -> CoreResult<Version> {
        run("AddVersion", &self.commands.add_version_prototype, args)
    }

    /// Run the `blob_stream_exists` slot
    pub fn blob_stream_exists(&self, args: BlobArgs) -> CoreResult<bool> {
        run("BlobStreamExists", &self.commands.blob_stream_exists_prototype, args)
    }

    /// Run the `copy_item` slot
    pub fn copy_item(&self, args: CopyItemArgs) -> CoreResult<Item> {
        run("CopyItem", &self.commands.copy_item_prototype, args)
    }

    /// Run the `create_item` slot
    pub fn create_item(&self, args: CreateItemArgs) -> CoreResult<Item> {
        run("CreateItem", &self.commands.create_item_prototype, args)
    }

    /// Run the `delete_item` slot
    pub fn delete_item(&self, args: ItemArgs) -> CoreResult<bool> {
        run("DeleteItem", &self.commands.delete_prototype, args)
    }

    /// Run the `get_blob_stream` slot
    pub fn get_blob_stream(&self, args: BlobArgs) -> CoreResult<Option<Vec<u8>>> {
        run("GetBlobStream", &self.commands.get_blob_stream_prototype, args)
    }

    /// Run the `get_children` slot
    pub fn get_children(&self, args: ItemArgs) -> CoreResult<ItemList> {
        run("GetChildren", &self.commands.get_children_prototype, args)
    }

    /// Run the `get_item` slot
    pub fn get_item(&self, args: GetItemArgs) -> CoreResult<Option<Item>> {
        run("GetItem", &self.commands.get_item_prototype, args)
    }

    /// Run the `get_parent` slot
    pub fn get_parent(&self, args: ItemArgs) -> CoreResult<Option<Item>> {
        run("GetParent", &self.commands.get_parent_prototype, args)
    }

    /// Run the `get_root_item` slot
    pub fn get_root_item(&self, args: GetRootItemArgs) -> CoreResult<Option<Item>> {
        run("GetRootItem", &self.commands.get_root_item_prototype, args)
    }

    /// Run the `get_versions` slot
    pub fn get_versions(&self, args: GetVersionsArgs) -> CoreResult<Vec<Version>> {
        run("GetVersions", &self.commands.get_versions_prototype, args)
    }

    /// Run the `has_children` slot
    pub fn has_children(&self, args: ItemArgs) -> CoreResult<bool> {
        run("HasChildren", &self.commands.has_children_prototype, args)
    }

    /// Run the `move_item` slot
    pub fn move_item(&self, args: MoveItemArgs) -> CoreResult<bool> {
        run("MoveItem", &self.commands.move_item_prototype, args)
    }

    /// Run the `remove_data` slot
    pub fn remove_data(&self, args: ItemArgs) -> CoreResult<bool> {
        run("RemoveData", &self.commands.remove_data_prototype, args)
    }

    /// Run the `remove_version` slot
    pub fn remove_version(&self, args: ItemArgs) -> CoreResult<bool> {
        run("RemoveVersion", &self.commands.remove_version_prototype, args)
    }

    /// Run the `resolve_path` slot
    pub fn resolve_path(&self, args: ResolvePathArgs) -> CoreResult<Option<Item>> {
        run("ResolvePath", &self.commands.resolve_path_prototype, args)
    }

    /// Run the `save_item` slot
    pub fn save_item(&self, args: ItemArgs) -> CoreResult<bool> {
        run("SaveItem", &self.commands.save_item_prototype, args)
    }

    /// Run the `set_blob_stream` slot
    pub fn set_blob_stream(&self, args: SetBlobStreamArgs) -> CoreResult<bool> {
        run("SetBlobStream", &self.commands.set_blob_stream_prototype, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::types::{Id, Language};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingHasChildren {
        instances: Arc<AtomicUsize>,
    }

    impl DataCommand for CountingHasChildren {
        type Args = ItemArgs;
        type Output = bool;

        fn create_instance(&self) -> HasChildrenPrototype {
            self.instances.fetch_add(1, Ordering::SeqCst);
            Box::new(CountingHasChildren {
                instances: self.instances.clone(),
            })
        }

        fn execute(&self, _args: ItemArgs) -> CoreResult<bool> {
            Ok(true)
        }
    }

    #[test]
    fn test_default_slots_are_unsupported() {
        let engine = DataEngine::default();
        let err = engine
            .get_root_item(GetRootItemArgs {
                language: Language::default(),
                version: Version::LATEST,
            })
            .unwrap_err();
        assert_eq!(err, CoreError::UnsupportedOperation("GetRootItem".to_string()));
    }

    #[test]
    fn test_dispatch_uses_a_fresh_instance_per_call() {
        let instances = Arc::new(AtomicUsize::new(0));
        let mut engine = DataEngine::default();
        engine.commands_mut().has_children_prototype = Box::new(CountingHasChildren {
            instances: instances.clone(),
        });

        let now = chrono::Utc::now();
        let item = Item {
            id: Id::new_id(),
            name: "home".to_string(),
            template_id: Id::NULL,
            template_name: String::new(),
            parent_id: None,
            path: "/home".to_string(),
            language: Language::default(),
            version: Version::FIRST,
            database: "master".to_string(),
            fields: Default::default(),
            created: now,
            updated: now,
        };

        assert!(engine.has_children(ItemArgs { item: item.clone() }).unwrap());
        assert!(engine.has_children(ItemArgs { item }).unwrap());
        assert_eq!(instances.load(Ordering::SeqCst), 2);

        engine.reset();
        assert_eq!(instances.load(Ordering::SeqCst), 2);
    }
}
