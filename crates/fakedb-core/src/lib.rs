//!
//! FakeDb Core - host item model for the FakeDb test double
//!
//! This crate defines the content item model, the data command prototype
//! contract and the database API that host code programs against. It knows
//! nothing about storage: a database only does what the commands installed
//! in its slots do.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Domain layer - items, commands, engine and database
pub mod domain;

/// Identifier, language and version types
pub mod types;

/// Error types
pub mod error;

pub use error::{ensure_not_empty, CoreError, CoreResult};
pub use types::{FieldScope, Id, Language, Version};

pub use domain::command::{
    AddFromTemplateArgs, AddVersionArgs, BlobArgs, CommandPrototype, CopyItemArgs,
    CreateItemArgs, DataCommand, GetItemArgs, GetRootItemArgs, GetVersionsArgs, ItemArgs,
    MoveItemArgs, ResolvePathArgs, SetBlobStreamArgs, UnsupportedCommand,
};
pub use domain::database::Database;
pub use domain::engine::{DataEngine, DataEngineCommands};
pub use domain::item::{Field, FieldList, Item, ItemList};
