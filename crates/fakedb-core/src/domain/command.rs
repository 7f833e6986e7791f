//! Data command prototypes.
//!
//! Every storage operation of a [`Database`](crate::domain::database::Database)
//! is carried out by a command object sitting in a slot of the engine's
//! command table. The engine never executes the slot object directly: it asks
//! the prototype for a blank copy with [`DataCommand::create_instance`] and
//! executes that copy, so no execution state survives between calls.

use std::marker::PhantomData;

use crate::domain::item::{Item, ItemList};
use crate::error::{CoreError, CoreResult};
use crate::types::{Id, Language, Version};

/// A substitutable implementation of one storage operation
pub trait DataCommand: Send + Sync {
    /// Input of the operation
    type Args: 'static;
    /// Result of the operation
    type Output: 'static;

    /// Create a blank command of the same kind for a single execution
    fn create_instance(&self) -> CommandPrototype<Self::Args, Self::Output>;

    /// Run the operation
    fn execute(&self, args: Self::Args) -> CoreResult<Self::Output>;
}

/// A boxed command occupying one slot of the command table
pub type CommandPrototype<A, O> = Box<dyn DataCommand<Args = A, Output = O>>;

/// Default slot occupant: rejects every call
pub struct UnsupportedCommand<A, O> {
    operation: &'static str,
    _marker: PhantomData<fn(A) -> O>,
}

impl<A, O> UnsupportedCommand<A, O> {
    /// Create a placeholder for the named operation
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            _marker: PhantomData,
        }
    }
}

impl<A: 'static, O: 'static> DataCommand for UnsupportedCommand<A, O> {
    type Args = A;
    type Output = O;

    fn create_instance(&self) -> CommandPrototype<A, O> {
        Box::new(UnsupportedCommand::new(self.operation))
    }

    fn execute(&self, _args: A) -> CoreResult<O> {
        Err(CoreError::UnsupportedOperation(self.operation.to_string()))
    }
}

/// Create an item from a template under a destination, with a chosen id
#[derive(Debug, Clone)]
pub struct AddFromTemplateArgs {
    /// Name of the new item
    pub item_name: String,
    /// Template of the new item
    pub template_id: Id,
    /// Parent of the new item
    pub destination: Item,
    /// Identifier of the new item
    pub new_id: Id,
}

/// Add a version to an item in its language
#[derive(Debug, Clone)]
pub struct AddVersionArgs {
    /// The item whose version is copied
    pub item: Item,
}

/// Address of a binary payload stored next to a field
#[derive(Debug, Clone)]
pub struct BlobArgs {
    /// Owning item
    pub item_id: Id,
    /// Field the blob belongs to
    pub field_id: Id,
}

/// Copy an item (and optionally its subtree) under a destination
#[derive(Debug, Clone)]
pub struct CopyItemArgs {
    /// Item to copy
    pub source: Item,
    /// New parent
    pub destination: Item,
    /// Name of the copy
    pub copy_name: String,
    /// Identifier of the copy
    pub copy_id: Id,
    /// Copy descendants as well
    pub deep: bool,
}

/// Create an item under a destination
#[derive(Debug, Clone)]
pub struct CreateItemArgs {
    /// Identifier of the new item
    pub item_id: Id,
    /// Name of the new item
    pub item_name: String,
    /// Template of the new item
    pub template_id: Id,
    /// Parent of the new item
    pub destination: Item,
}

/// Arguments of operations that act on one item
#[derive(Debug, Clone)]
pub struct ItemArgs {
    /// Target item
    pub item: Item,
}

/// Look an item up by id
#[derive(Debug, Clone)]
pub struct GetItemArgs {
    /// Item identifier
    pub item_id: Id,
    /// Requested language
    pub language: Language,
    /// Requested version; `Version::LATEST` for the newest
    pub version: Version,
}

/// Fetch the root item
#[derive(Debug, Clone)]
pub struct GetRootItemArgs {
    /// Requested language
    pub language: Language,
    /// Requested version
    pub version: Version,
}

/// List the versions of an item in a language
#[derive(Debug, Clone)]
pub struct GetVersionsArgs {
    /// Target item
    pub item: Item,
    /// Language to list
    pub language: Language,
}

/// Re-parent an item
#[derive(Debug, Clone)]
pub struct MoveItemArgs {
    /// Item to move
    pub item: Item,
    /// New parent
    pub destination: Item,
}

/// Resolve an item by path or id string
#[derive(Debug, Clone)]
pub struct ResolvePathArgs {
    /// Path such as `/sitecore/content/home`, or a braced id
    pub item_path: String,
    /// Requested language
    pub language: Language,
    /// Requested version
    pub version: Version,
}

/// Store a binary payload next to a field
#[derive(Debug, Clone)]
pub struct SetBlobStreamArgs {
    /// Owning item
    pub item_id: Id,
    /// Field the blob belongs to
    pub field_id: Id,
    /// Payload
    pub data: Vec<u8>,
}

/// Add from template slot
pub type AddFromTemplatePrototype = CommandPrototype<AddFromTemplateArgs, Item>;
/// Add version slot
pub type AddVersionPrototype = CommandPrototype<AddVersionArgs, Version>;
/// Blob exists slot
pub type BlobStreamExistsPrototype = CommandPrototype<BlobArgs, bool>;
/// Copy slot
pub type CopyItemPrototype = CommandPrototype<CopyItemArgs, Item>;
/// Create slot
pub type CreateItemPrototype = CommandPrototype<CreateItemArgs, Item>;
/// Delete slot
pub type DeletePrototype = CommandPrototype<ItemArgs, bool>;
/// Blob read slot
pub type GetBlobStreamPrototype = CommandPrototype<BlobArgs, Option<Vec<u8>>>;
/// Children slot
pub type GetChildrenPrototype = CommandPrototype<ItemArgs, ItemList>;
/// Item lookup slot
pub type GetItemPrototype = CommandPrototype<GetItemArgs, Option<Item>>;
/// Parent slot
pub type GetParentPrototype = CommandPrototype<ItemArgs, Option<Item>>;
/// Root slot
pub type GetRootItemPrototype = CommandPrototype<GetRootItemArgs, Option<Item>>;
/// Versions slot
pub type GetVersionsPrototype = CommandPrototype<GetVersionsArgs, Vec<Version>>;
/// Has-children slot
pub type HasChildrenPrototype = CommandPrototype<ItemArgs, bool>;
/// Move slot
pub type MoveItemPrototype = CommandPrototype<MoveItemArgs, bool>;
/// Remove language data slot
pub type RemoveDataPrototype = CommandPrototype<ItemArgs, bool>;
/// Remove version slot
pub type RemoveVersionPrototype = CommandPrototype<ItemArgs, bool>;
/// Path resolution slot
pub type ResolvePathPrototype = CommandPrototype<ResolvePathArgs, Option<Item>>;
/// Save slot
pub type SaveItemPrototype = CommandPrototype<ItemArgs, bool>;
/// Blob write slot
pub type SetBlobStreamPrototype = CommandPrototype<SetBlobStreamArgs, bool>;
