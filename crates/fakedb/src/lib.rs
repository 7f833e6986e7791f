//! FakeDb - an in-memory content database for unit tests
//!
//! Host code keeps calling the [`Database`] API it already uses; a [`Db`]
//! replaces every storage operation behind it with a fake data command that
//! serves the call from an in-memory item tree.

#![forbid(unsafe_code)]

pub mod config;
pub mod constants;
pub mod context;
pub mod data;
pub mod db;
pub mod engine;
pub mod init;
pub mod logging;
pub mod storage;

pub use config::{ConfigurationService, DbConfiguration, FakeDbConfig};
pub use context::DatabaseSwitcher;
pub use data::{DbField, DbItem, DbTemplate, DbTemplateField, FakeItem};
pub use db::Db;
pub use engine::install_commands;
pub use logging::init_tracing;
pub use storage::{DataStorage, DataStore, ItemBuilder};

#[cfg(any(test, feature = "testing"))]
pub use storage::MockDataStore;

pub use fakedb_core::{
    CoreError, CoreResult, Database, Field, FieldList, FieldScope, Id, Item, ItemList, Language,
    Version,
};
