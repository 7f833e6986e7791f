use std::sync::Arc;

use fakedb_core::domain::command::{
    BlobStreamExistsPrototype, GetBlobStreamPrototype, SetBlobStreamPrototype,
};
use fakedb_core::{BlobArgs, CoreResult, DataCommand, SetBlobStreamArgs};
use tracing::debug;

use super::require_item;
use crate::storage::DataStore;

/// Reads the blob stored for a field
pub struct GetBlobStreamCommand {
    store: Arc<dyn DataStore>,
}

impl GetBlobStreamCommand {
    /// Bind the command to a storage
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

impl DataCommand for GetBlobStreamCommand {
    type Args = BlobArgs;
    type Output = Option<Vec<u8>>;

    fn create_instance(&self) -> GetBlobStreamPrototype {
        Box::new(GetBlobStreamCommand::new(self.store.clone()))
    }

    fn execute(&self, args: BlobArgs) -> CoreResult<Option<Vec<u8>>> {
        Ok(self.store.get_blob(&args.item_id, &args.field_id))
    }
}

/// Stores a blob for a field of an existing item
pub struct SetBlobStreamCommand {
    store: Arc<dyn DataStore>,
}

impl SetBlobStreamCommand {
    /// Bind the command to a storage
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

impl DataCommand for SetBlobStreamCommand {
    type Args = SetBlobStreamArgs;
    type Output = bool;

    fn create_instance(&self) -> SetBlobStreamPrototype {
        Box::new(SetBlobStreamCommand::new(self.store.clone()))
    }

    fn execute(&self, args: SetBlobStreamArgs) -> CoreResult<bool> {
        require_item(self.store.as_ref(), &args.item_id, "Item")?;

        debug!(item = %args.item_id, field = %args.field_id, bytes = args.data.len(), "Storing blob");
        self.store.set_blob(&args.item_id, &args.field_id, args.data);
        Ok(true)
    }
}

/// Checks whether a field has a blob
pub struct BlobStreamExistsCommand {
    store: Arc<dyn DataStore>,
}

impl BlobStreamExistsCommand {
    /// Bind the command to a storage
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }
}

impl DataCommand for BlobStreamExistsCommand {
    type Args = BlobArgs;
    type Output = bool;

    fn create_instance(&self) -> BlobStreamExistsPrototype {
        Box::new(BlobStreamExistsCommand::new(self.store.clone()))
    }

    fn execute(&self, args: BlobArgs) -> CoreResult<bool> {
        Ok(self.store.blob_exists(&args.item_id, &args.field_id))
    }
}
