//! The item projection handed to host code.
//!
//! An [`Item`] is a snapshot: it is rebuilt from storage on every read and
//! carries no link back to the storage it came from. Changes made to its
//! fields only reach storage through `Database::save_item`.

use chrono::{DateTime, Utc};
use std::fmt;
use std::ops::Index;

use crate::error::{CoreError, CoreResult};
use crate::types::{FieldScope, Id, Language, Version};

/// One resolved field value on an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field identifier (the template field id)
    pub id: Id,
    /// Field name
    pub name: String,
    /// Sharing scope declared by the template
    pub scope: FieldScope,
    /// Resolved value for the item's language and version
    pub value: String,
    /// The value came from the template default rather than the item
    pub is_standard_value: bool,
    /// Set when host code changed the value after the item was read
    pub modified: bool,
}

impl Field {
    /// Create an unmodified field
    pub fn new(id: Id, name: impl Into<String>, scope: FieldScope, value: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            scope,
            value: value.into(),
            is_standard_value: false,
            modified: false,
        }
    }
}

/// Fields of an item in template declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldList {
    fields: Vec<Field>,
}

impl FieldList {
    /// Wrap an ordered list of fields
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Find a field by id (braced or bare) or by case-insensitive name
    pub fn get(&self, name_or_id: &str) -> Option<&Field> {
        match Id::parse(name_or_id) {
            Ok(id) => self.get_by_id(&id),
            Err(_) => self
                .fields
                .iter()
                .find(|f| f.name.eq_ignore_ascii_case(name_or_id)),
        }
    }

    /// Find a field by id
    pub fn get_by_id(&self, id: &Id) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == *id)
    }

    /// The resolved value of a field, if the field exists
    pub fn value(&self, name_or_id: &str) -> Option<&str> {
        self.get(name_or_id).map(|f| f.value.as_str())
    }

    /// Change a field value and mark it modified
    pub fn set(&mut self, name_or_id: &str, value: impl Into<String>) -> CoreResult<()> {
        let index = match Id::parse(name_or_id) {
            Ok(id) => self.fields.iter().position(|f| f.id == id),
            Err(_) => self
                .fields
                .iter()
                .position(|f| f.name.eq_ignore_ascii_case(name_or_id)),
        };

        let field = index
            .map(|i| &mut self.fields[i])
            .ok_or_else(|| CoreError::not_found("Field", name_or_id))?;

        field.value = value.into();
        field.is_standard_value = false;
        field.modified = true;
        Ok(())
    }

    /// Fields changed since the item was read
    pub fn modified(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.modified)
    }

    /// Iterate fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the item has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A content item materialized for one language and version
#[derive(Debug, Clone)]
pub struct Item {
    /// Item identifier
    pub id: Id,
    /// Item name
    pub name: String,
    /// Template identifier
    pub template_id: Id,
    /// Template name
    pub template_name: String,
    /// Parent identifier; `None` for the root item
    pub parent_id: Option<Id>,
    /// Full path from the root, e.g. `/sitecore/content/home`
    pub path: String,
    /// Language the fields were resolved for
    pub language: Language,
    /// Resolved version; `Version::LATEST` when the language has no versions
    pub version: Version,
    /// Name of the owning database
    pub database: String,
    /// Resolved fields
    pub fields: FieldList,
    /// Creation time of the item
    pub created: DateTime<Utc>,
    /// Last save time of the item
    pub updated: DateTime<Utc>,
}

impl Item {
    /// Rename the item; persisted by the next save
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Whether this is the root of its database
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether the item has any version in its language
    pub fn has_version(&self) -> bool {
        !self.version.is_latest()
    }
}

/// Items are equal when they denote the same item, language and version of
/// the same database, regardless of field values.
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.database == other.database
            && self.id == other.id
            && self.language == other.language
            && self.version == other.version
    }
}

impl Eq for Item {}

impl Index<&str> for Item {
    type Output = str;

    /// Field value by name or id; empty when the field does not exist
    fn index(&self, name_or_id: &str) -> &str {
        self.fields.value(name_or_id).unwrap_or("")
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {}#{})", self.path, self.id, self.language, self.version)
    }
}

/// Ordered list of items returned by child queries
pub type ItemList = Vec<Item>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> Item {
        let now = Utc::now();
        Item {
            id: Id::new_id(),
            name: "home".to_string(),
            template_id: Id::new_id(),
            template_name: "Sample Item".to_string(),
            parent_id: Some(Id::new_id()),
            path: "/sitecore/content/home".to_string(),
            language: Language::default(),
            version: Version::FIRST,
            database: "master".to_string(),
            fields: FieldList::new(vec![
                Field::new(Id::new_id(), "Title", FieldScope::Versioned, "Welcome"),
                Field::new(Id::new_id(), "Text", FieldScope::Shared, ""),
            ]),
            created: now,
            updated: now,
        }
    }

    #[test]
    fn test_index_by_name_is_case_insensitive() {
        let item = sample_item();
        assert_eq!(&item["Title"], "Welcome");
        assert_eq!(&item["title"], "Welcome");
        assert_eq!(&item["Missing"], "");
    }

    #[test]
    fn test_set_marks_field_modified() {
        let mut item = sample_item();
        item.fields.set("Text", "Lorem").unwrap();

        let modified: Vec<&str> = item.fields.modified().map(|f| f.name.as_str()).collect();
        assert_eq!(modified, vec!["Text"]);
        assert_eq!(&item["Text"], "Lorem");
    }

    #[test]
    fn test_set_by_id() {
        let mut item = sample_item();
        let id = item.fields.get("Title").unwrap().id;
        item.fields.set(&id.to_string(), "Hello").unwrap();
        assert_eq!(&item["Title"], "Hello");
    }

    #[test]
    fn test_set_unknown_field_fails() {
        let mut item = sample_item();
        assert!(item.fields.set("Nope", "x").unwrap_err().is_not_found());
    }

    #[test]
    fn test_identity_equality_ignores_field_values() {
        let item = sample_item();
        let mut other = item.clone();
        other.fields.set("Title", "Changed").unwrap();
        assert_eq!(item, other);

        other.version = Version::new(2);
        assert_ne!(item, other);
    }
}
