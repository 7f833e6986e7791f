//! Installs the fake data commands into a database's command table.

pub mod commands;

use std::sync::Arc;

use fakedb_core::DataEngineCommands;
use tracing::debug;

use crate::storage::DataStore;
use commands::*;

/// Replace every slot of `commands` with the fake command bound to `store`
pub fn install_commands(commands: &mut DataEngineCommands, store: Arc<dyn DataStore>) {
    commands.add_from_template_prototype = Box::new(AddFromTemplateCommand::new(store.clone()));
    commands.add_version_prototype = Box::new(AddVersionCommand::new(store.clone()));
    commands.blob_stream_exists_prototype = Box::new(BlobStreamExistsCommand::new(store.clone()));
    commands.copy_item_prototype = Box::new(CopyItemCommand::new(store.clone()));
    commands.create_item_prototype = Box::new(CreateItemCommand::new(store.clone()));
    commands.delete_prototype = Box::new(DeleteItemCommand::new(store.clone()));
    commands.get_blob_stream_prototype = Box::new(GetBlobStreamCommand::new(store.clone()));
    commands.get_children_prototype = Box::new(GetChildrenCommand::new(store.clone()));
    commands.get_item_prototype = Box::new(GetItemCommand::new(store.clone()));
    commands.get_parent_prototype = Box::new(GetParentCommand::new(store.clone()));
    commands.get_root_item_prototype = Box::new(GetRootItemCommand::new(store.clone()));
    commands.get_versions_prototype = Box::new(GetVersionsCommand::new(store.clone()));
    commands.has_children_prototype = Box::new(HasChildrenCommand::new(store.clone()));
    commands.move_item_prototype = Box::new(MoveItemCommand::new(store.clone()));
    commands.remove_data_prototype = Box::new(RemoveDataCommand::new(store.clone()));
    commands.remove_version_prototype = Box::new(RemoveVersionCommand::new(store.clone()));
    commands.resolve_path_prototype = Box::new(ResolvePathCommand::new(store.clone()));
    commands.save_item_prototype = Box::new(SaveItemCommand::new(store.clone()));
    commands.set_blob_stream_prototype = Box::new(SetBlobStreamCommand::new(store.clone()));

    debug!(database = %store.database_name(), "Installed fake data commands");
}
