//! Fake item, field and template definitions.

mod db_field;
mod db_item;
mod db_template;

pub use db_field::DbField;
pub use db_item::{DbItem, FakeItem};
pub use db_template::{DbTemplate, DbTemplateField};
