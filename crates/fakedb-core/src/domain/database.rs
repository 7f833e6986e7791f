//! The database API host code calls.

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::command::*;
use crate::domain::engine::{DataEngine, DataEngineCommands};
use crate::domain::item::{Item, ItemList};
use crate::error::{ensure_not_empty, CoreResult};
use crate::types::{Id, Language, Version};

/// A named content database.
///
/// Every operation goes through the [`DataEngine`], so the behaviour of a
/// database is entirely defined by the commands installed in its slots.
pub struct Database {
    name: String,
    default_language: Language,
    engine: RwLock<DataEngine>,
}

impl Database {
    /// Create a database whose slots all reject calls
    pub fn new(name: impl Into<String>) -> CoreResult<Self> {
        let name = name.into();
        ensure_not_empty(&name, "databaseName")?;

        Ok(Self {
            name,
            default_language: Language::default(),
            engine: RwLock::new(DataEngine::default()),
        })
    }

    /// Create a database and let `installer` fill its command slots
    pub fn with_commands<F>(name: impl Into<String>, installer: F) -> CoreResult<Self>
    where
        F: FnOnce(&mut DataEngineCommands),
    {
        let database = Self::new(name)?;
        installer(database.engine.write().commands_mut());
        debug!(database = %database.name, "Installed data commands");
        Ok(database)
    }

    /// Language used by lookups that do not name one
    pub fn with_default_language(mut self, language: Language) -> Self {
        self.default_language = language;
        self
    }

    /// Database name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Language used by lookups that do not name one
    pub fn default_language(&self) -> &Language {
        &self.default_language
    }

    /// Put every command slot back to the unsupported placeholder
    pub fn uninstall_commands(&self) {
        self.engine.write().reset();
        debug!(database = %self.name, "Uninstalled data commands");
    }

    /// Latest version of an item in the default language
    pub fn get_item(&self, id: Id) -> CoreResult<Option<Item>> {
        self.get_item_version(id, &self.default_language, Version::LATEST)
    }

    /// Latest version of an item in `language`
    pub fn get_item_in(&self, id: Id, language: &Language) -> CoreResult<Option<Item>> {
        self.get_item_version(id, language, Version::LATEST)
    }

    /// A specific version of an item
    pub fn get_item_version(
        &self,
        id: Id,
        language: &Language,
        version: Version,
    ) -> CoreResult<Option<Item>> {
        self.engine.read().get_item(GetItemArgs {
            item_id: id,
            language: language.clone(),
            version,
        })
    }

    /// Resolve a path (or an id string) in the default language
    pub fn get_item_by_path(&self, path: &str) -> CoreResult<Option<Item>> {
        self.get_item_by_path_version(path, &self.default_language, Version::LATEST)
    }

    /// Resolve a path in `language`
    pub fn get_item_by_path_in(&self, path: &str, language: &Language) -> CoreResult<Option<Item>> {
        self.get_item_by_path_version(path, language, Version::LATEST)
    }

    /// Resolve a path for a specific version
    pub fn get_item_by_path_version(
        &self,
        path: &str,
        language: &Language,
        version: Version,
    ) -> CoreResult<Option<Item>> {
        ensure_not_empty(path, "path")?;
        self.engine.read().resolve_path(ResolvePathArgs {
            item_path: path.to_string(),
            language: language.clone(),
            version,
        })
    }

    /// The root item in the default language
    pub fn get_root_item(&self) -> CoreResult<Option<Item>> {
        self.engine.read().get_root_item(GetRootItemArgs {
            language: self.default_language.clone(),
            version: Version::LATEST,
        })
    }

    /// Children of `item` in declaration order
    pub fn get_children(&self, item: &Item) -> CoreResult<ItemList> {
        self.engine.read().get_children(ItemArgs { item: item.clone() })
    }

    /// Parent of `item`; `None` for the root
    pub fn get_parent(&self, item: &Item) -> CoreResult<Option<Item>> {
        self.engine.read().get_parent(ItemArgs { item: item.clone() })
    }

    /// Whether `item` has at least one child
    pub fn has_children(&self, item: &Item) -> CoreResult<bool> {
        self.engine.read().has_children(ItemArgs { item: item.clone() })
    }

    /// Create an item with a fresh id under `destination`
    pub fn create_item(&self, name: &str, destination: &Item, template_id: Id) -> CoreResult<Item> {
        self.create_item_with_id(Id::new_id(), name, destination, template_id)
    }

    /// Create an item with a chosen id under `destination`
    pub fn create_item_with_id(
        &self,
        id: Id,
        name: &str,
        destination: &Item,
        template_id: Id,
    ) -> CoreResult<Item> {
        ensure_not_empty(name, "itemName")?;
        self.engine.read().create_item(CreateItemArgs {
            item_id: id,
            item_name: name.to_string(),
            template_id,
            destination: destination.clone(),
        })
    }

    /// Create an item from a template with a chosen id
    pub fn add_from_template(
        &self,
        name: &str,
        template_id: Id,
        destination: &Item,
        new_id: Id,
    ) -> CoreResult<Item> {
        ensure_not_empty(name, "itemName")?;
        self.engine.read().add_from_template(AddFromTemplateArgs {
            item_name: name.to_string(),
            template_id,
            destination: destination.clone(),
            new_id,
        })
    }

    /// Copy `source` under `destination`; `deep` includes descendants
    pub fn copy_item(
        &self,
        source: &Item,
        destination: &Item,
        copy_name: &str,
        deep: bool,
    ) -> CoreResult<Item> {
        ensure_not_empty(copy_name, "copyName")?;
        self.engine.read().copy_item(CopyItemArgs {
            source: source.clone(),
            destination: destination.clone(),
            copy_name: copy_name.to_string(),
            copy_id: Id::new_id(),
            deep,
        })
    }

    /// Move `item` under `destination`
    pub fn move_item(&self, item: &Item, destination: &Item) -> CoreResult<bool> {
        self.engine.read().move_item(MoveItemArgs {
            item: item.clone(),
            destination: destination.clone(),
        })
    }

    /// Delete `item` and its descendants
    pub fn delete_item(&self, item: &Item) -> CoreResult<bool> {
        self.engine.read().delete_item(ItemArgs { item: item.clone() })
    }

    /// Persist modified fields and the name of `item`
    pub fn save_item(&self, item: &Item) -> CoreResult<bool> {
        self.engine.read().save_item(ItemArgs { item: item.clone() })
    }

    /// Add a version to `item` in its language
    pub fn add_version(&self, item: &Item) -> CoreResult<Version> {
        self.engine.read().add_version(AddVersionArgs { item: item.clone() })
    }

    /// Versions of `item` in `language`
    pub fn get_versions(&self, item: &Item, language: &Language) -> CoreResult<Vec<Version>> {
        self.engine.read().get_versions(GetVersionsArgs {
            item: item.clone(),
            language: language.clone(),
        })
    }

    /// Remove the version `item` was read at
    pub fn remove_version(&self, item: &Item) -> CoreResult<bool> {
        self.engine.read().remove_version(ItemArgs { item: item.clone() })
    }

    /// Remove all data of `item` in its language
    pub fn remove_data(&self, item: &Item) -> CoreResult<bool> {
        self.engine.read().remove_data(ItemArgs { item: item.clone() })
    }

    /// Read the blob stored for a field
    pub fn get_blob_stream(&self, item_id: Id, field_id: Id) -> CoreResult<Option<Vec<u8>>> {
        self.engine.read().get_blob_stream(BlobArgs { item_id, field_id })
    }

    /// Store a blob for a field
    pub fn set_blob_stream(&self, item_id: Id, field_id: Id, data: Vec<u8>) -> CoreResult<bool> {
        self.engine.read().set_blob_stream(SetBlobStreamArgs {
            item_id,
            field_id,
            data,
        })
    }

    /// Whether a blob is stored for a field
    pub fn blob_stream_exists(&self, item_id: Id, field_id: Id) -> CoreResult<bool> {
        self.engine.read().blob_stream_exists(BlobArgs { item_id, field_id })
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("name", &self.name)
            .field("default_language", &self.default_language)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    struct NoBlobs;

    impl DataCommand for NoBlobs {
        type Args = BlobArgs;
        type Output = bool;

        fn create_instance(&self) -> BlobStreamExistsPrototype {
            Box::new(NoBlobs)
        }

        fn execute(&self, _args: BlobArgs) -> CoreResult<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_empty_name_is_rejected() {
        assert!(matches!(Database::new(" "), Err(CoreError::InvalidArgument(_))));
    }

    #[test]
    fn test_installer_replaces_slots() {
        let database = Database::with_commands("master", |commands| {
            commands.blob_stream_exists_prototype = Box::new(NoBlobs);
        })
        .unwrap();

        assert_eq!(database.name(), "master");
        assert!(!database.blob_stream_exists(Id::new_id(), Id::new_id()).unwrap());
        assert!(matches!(
            database.get_item(Id::new_id()),
            Err(CoreError::UnsupportedOperation(_))
        ));

        database.uninstall_commands();
        assert!(matches!(
            database.blob_stream_exists(Id::new_id(), Id::new_id()),
            Err(CoreError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_empty_path_fails_before_dispatch() {
        let database = Database::new("web").unwrap();
        assert!(matches!(
            database.get_item_by_path(""),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_default_language_builder() {
        let database = Database::new("web")
            .unwrap()
            .with_default_language(Language::parse("da").unwrap());
        assert_eq!(database.default_language().name(), "da");
    }
}
