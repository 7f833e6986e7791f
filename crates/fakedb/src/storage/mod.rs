//! In-memory storage of fake items, templates and blobs.

mod data_storage;
mod item_builder;

pub use data_storage::DataStorage;
pub use item_builder::{DefinitionSource, ItemBuilder};

use fakedb_core::{CoreResult, Id, Item, Language, Version};

use crate::data::{DbTemplate, FakeItem};

/// Storage operations the data commands rely on.
///
/// Reads hand out snapshots; a command that changes an item reads it, edits
/// the copy and writes it back with [`DataStore::put_fake_item`].
pub trait DataStore: Send + Sync {
    /// Name of the database this storage backs
    fn database_name(&self) -> String;

    /// Snapshot of a stored item
    fn get_fake_item(&self, id: &Id) -> Option<FakeItem>;

    /// Snapshot of a stored template
    fn get_fake_template(&self, id: &Id) -> Option<DbTemplate>;

    /// Insert a new item and link it under its parent
    fn add_fake_item(&self, item: FakeItem) -> CoreResult<()>;

    /// Replace an existing item
    fn put_fake_item(&self, item: FakeItem) -> CoreResult<()>;

    /// Insert a new template
    fn add_fake_template(&self, template: DbTemplate) -> CoreResult<()>;

    /// Remove an item and unlink it from its parent; `false` when absent
    fn remove_fake_item(&self, id: &Id) -> bool;

    /// Remove a template; `false` when absent
    fn remove_fake_template(&self, id: &Id) -> bool;

    /// Materialize an item for a language and version
    fn get_item_instance(
        &self,
        id: &Id,
        language: &Language,
        version: Version,
    ) -> CoreResult<Option<Item>>;

    /// Blob stored for a field
    fn get_blob(&self, item_id: &Id, field_id: &Id) -> Option<Vec<u8>>;

    /// Store a blob for a field
    fn set_blob(&self, item_id: &Id, field_id: &Id, data: Vec<u8>);

    /// Whether a blob is stored for a field
    fn blob_exists(&self, item_id: &Id, field_id: &Id) -> bool;

    /// All blobs of an item as `(field id, bytes)`
    fn blobs_of(&self, item_id: &Id) -> Vec<(Id, Vec<u8>)>;

    /// Drop all blobs of an item
    fn remove_blobs(&self, item_id: &Id);
}

#[cfg(any(test, feature = "testing"))]
mockall::mock! {
    pub DataStore {}

    impl DataStore for DataStore {
        fn database_name(&self) -> String;
        fn get_fake_item(&self, id: &Id) -> Option<FakeItem>;
        fn get_fake_template(&self, id: &Id) -> Option<DbTemplate>;
        fn add_fake_item(&self, item: FakeItem) -> CoreResult<()>;
        fn put_fake_item(&self, item: FakeItem) -> CoreResult<()>;
        fn add_fake_template(&self, template: DbTemplate) -> CoreResult<()>;
        fn remove_fake_item(&self, id: &Id) -> bool;
        fn remove_fake_template(&self, id: &Id) -> bool;
        fn get_item_instance(
            &self,
            id: &Id,
            language: &Language,
            version: Version,
        ) -> CoreResult<Option<Item>>;
        fn get_blob(&self, item_id: &Id, field_id: &Id) -> Option<Vec<u8>>;
        fn set_blob(&self, item_id: &Id, field_id: &Id, data: Vec<u8>);
        fn blob_exists(&self, item_id: &Id, field_id: &Id) -> bool;
        fn blobs_of(&self, item_id: &Id) -> Vec<(Id, Vec<u8>)>;
        fn remove_blobs(&self, item_id: &Id);
    }
}
