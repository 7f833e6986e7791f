use std::collections::HashMap;

use chrono::{DateTime, Utc};
use fakedb_core::{Id, Language, Version};

use super::db_field::DbField;

/// Authoring form of a fake item, possibly with nested children.
///
/// ```
/// use fakedb::{DbField, DbItem};
///
/// let home = DbItem::new("home")
///     .field(DbField::new("Title").with_value("Welcome"))
///     .child(DbItem::new("about"));
/// assert_eq!(home.children().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DbItem {
    id: Id,
    /// Item name
    pub name: String,
    /// Template; an item without one gets a template built from its fields
    pub template_id: Option<Id>,
    /// Explicit parent; nested children ignore it
    pub parent_id: Option<Id>,
    /// Field values
    pub fields: Vec<DbField>,
    children: Vec<DbItem>,
    versions: Vec<(Language, Version)>,
}

impl DbItem {
    /// Item with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Id::new_id(), name)
    }

    /// Item with a fixed id
    pub fn with_id(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            template_id: None,
            parent_id: None,
            fields: Vec::new(),
            children: Vec::new(),
            versions: Vec::new(),
        }
    }

    /// Item identifier
    pub fn id(&self) -> Id {
        self.id
    }

    /// Nested children in declaration order
    pub fn children(&self) -> &[DbItem] {
        &self.children
    }

    /// Use a registered template
    pub fn template(mut self, template_id: Id) -> Self {
        self.template_id = Some(template_id);
        self
    }

    /// Place the item under an existing item
    pub fn parent(mut self, parent_id: Id) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Add a field
    pub fn field(mut self, field: DbField) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a field holding a shared value
    pub fn field_value(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.field(DbField::new(name).with_value(value))
    }

    /// Add a nested child
    pub fn child(mut self, child: DbItem) -> Self {
        self.children.push(child);
        self
    }

    /// Declare a version that exists even without versioned values
    pub fn version(mut self, language: Language, version: Version) -> Self {
        self.versions.push((language, version));
        self
    }

    /// Identifiers of this item and all nested children, pre-order
    pub fn ids(&self) -> Vec<Id> {
        let mut ids = vec![self.id];
        for child in &self.children {
            ids.extend(child.ids());
        }
        ids
    }

    /// Flatten the tree into stored records, pre-order.
    ///
    /// `parent_id` applies to the top item when it names no parent. Nested
    /// children always hang under their containing item.
    /// `template_for` supplies the template of items that name none.
    pub fn flatten<F>(
        self,
        parent_id: Option<Id>,
        language: &Language,
        template_for: &mut F,
    ) -> Vec<FakeItem>
    where
        F: FnMut(&DbItem) -> Id,
    {
        let mut records = Vec::new();
        let parent_id = self.parent_id.or(parent_id);
        self.flatten_into(parent_id, language, template_for, &mut records);
        records
    }

    fn flatten_into<F>(
        self,
        parent_id: Option<Id>,
        language: &Language,
        template_for: &mut F,
        records: &mut Vec<FakeItem>,
    ) where
        F: FnMut(&DbItem) -> Id,
    {
        let template_id = match self.template_id {
            Some(id) => id,
            None => template_for(&self),
        };
        let mut versions: HashMap<Language, Vec<Version>> = HashMap::new();
        for (lang, version) in &self.versions {
            push_unique(versions.entry(lang.clone()).or_default(), *version);
        }
        for field in &self.fields {
            for (lang, values) in &field.versioned {
                let list = versions.entry(lang.clone()).or_default();
                for version in values.keys() {
                    push_unique(list, *version);
                }
            }
        }
        let default_versions = versions.entry(language.clone()).or_default();
        if default_versions.is_empty() {
            default_versions.push(Version::FIRST);
        }

        let now = Utc::now();
        let record = FakeItem {
            id: self.id,
            name: self.name,
            template_id,
            parent_id,
            children: self.children.iter().map(|c| c.id).collect(),
            fields: self.fields,
            versions,
            created: now,
            updated: now,
        };
        let id = record.id;
        records.push(record);

        for child in self.children {
            child.flatten_into(Some(id), language, template_for, records);
        }
    }
}

fn push_unique(list: &mut Vec<Version>, version: Version) {
    if !list.contains(&version) {
        list.push(version);
    }
}

/// A fake item as held by storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeItem {
    id: Id,
    /// Item name
    pub name: String,
    /// Template identifier
    pub template_id: Id,
    /// Parent identifier; `None` for the root
    pub parent_id: Option<Id>,
    /// Child identifiers in insertion order
    pub children: Vec<Id>,
    /// Field values
    pub fields: Vec<DbField>,
    /// Versions per language in insertion order
    pub versions: HashMap<Language, Vec<Version>>,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Last save time
    pub updated: DateTime<Utc>,
}

impl FakeItem {
    /// Childless record with version 1 in `language`
    pub fn new(
        id: Id,
        name: impl Into<String>,
        template_id: Id,
        parent_id: Option<Id>,
        language: &Language,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            template_id,
            parent_id,
            children: Vec::new(),
            fields: Vec::new(),
            versions: HashMap::from([(language.clone(), vec![Version::FIRST])]),
            created: now,
            updated: now,
        }
    }

    /// Same record under another identifier
    pub fn with_new_id(&self, id: Id) -> Self {
        Self { id, ..self.clone() }
    }

    /// Item identifier
    pub fn id(&self) -> Id {
        self.id
    }

    /// Versions of a language in insertion order
    pub fn versions_in(&self, language: &Language) -> &[Version] {
        self.versions.get(language).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Most recently added version of a language
    pub fn latest_version(&self, language: &Language) -> Option<Version> {
        self.versions_in(language).last().copied()
    }

    /// Whether a language holds `version`
    pub fn has_version(&self, language: &Language, version: Version) -> bool {
        self.versions_in(language).contains(&version)
    }

    /// Append a version to a language unless already present
    pub fn add_version(&mut self, language: &Language, version: Version) {
        push_unique(self.versions.entry(language.clone()).or_default(), version);
    }

    /// Field by id, falling back to a case-insensitive name match
    pub fn field(&self, id: &Id, name: &str) -> Option<&DbField> {
        self.fields
            .iter()
            .find(|f| f.id == *id)
            .or_else(|| self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name)))
    }

    /// Mutable field by id or name, created when missing
    pub fn field_mut(&mut self, id: &Id, name: &str) -> &mut DbField {
        let index = self
            .fields
            .iter()
            .position(|f| f.id == *id)
            .or_else(|| self.fields.iter().position(|f| f.name.eq_ignore_ascii_case(name)));

        match index {
            Some(i) => &mut self.fields[i],
            None => {
                self.fields.push(DbField::with_id(*id, name));
                let last = self.fields.len() - 1;
                &mut self.fields[last]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_is_pre_order_in_declaration_order() {
        let tree = DbItem::new("home")
            .child(DbItem::new("a").child(DbItem::new("a1")))
            .child(DbItem::new("b"));
        let parent = Id::new_id();
        let template = Id::new_id();

        let records = tree.flatten(Some(parent), &Language::default(), &mut |_| template);

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["home", "a", "a1", "b"]);
        assert_eq!(records[0].parent_id, Some(parent));
        assert_eq!(records[1].parent_id, Some(records[0].id()));
        assert_eq!(records[0].children, vec![records[1].id(), records[3].id()]);
        assert!(records.iter().all(|r| r.template_id == template));
    }

    #[test]
    fn test_nested_child_ignores_its_own_parent() {
        let elsewhere = Id::new_id();
        let explicit = Id::new_id();
        let tree = DbItem::new("holder")
            .parent(explicit)
            .child(DbItem::new("child").parent(elsewhere));

        let records = tree.flatten(None, &Language::default(), &mut |_| Id::NULL);

        assert_eq!(records[0].parent_id, Some(explicit));
        assert_eq!(records[0].children, vec![records[1].id()]);
        assert_eq!(records[1].parent_id, Some(records[0].id()));
    }

    #[test]
    fn test_flatten_collects_versions() {
        let en = Language::default();
        let da = Language::parse("da").unwrap();
        let item = DbItem::new("home")
            .version(da.clone(), Version::new(3))
            .field(DbField::new("Title").with_version_value(da.clone(), Version::FIRST, "x"));

        let records = item.flatten(None, &en, &mut |_| Id::NULL);

        assert_eq!(records[0].versions_in(&da), &[Version::new(3), Version::FIRST]);
        assert_eq!(records[0].versions_in(&en), &[Version::FIRST]);
        assert_eq!(records[0].latest_version(&da), Some(Version::FIRST));
    }

    #[test]
    fn test_explicit_template_is_kept() {
        let template = Id::new_id();
        let records = DbItem::new("home")
            .template(template)
            .flatten(None, &Language::default(), &mut |_| Id::NULL);
        assert_eq!(records[0].template_id, template);
    }

    #[test]
    fn test_field_mut_creates_missing_field() {
        let mut record = FakeItem::new(Id::new_id(), "home", Id::NULL, None, &Language::default());
        let field_id = Id::new_id();
        record
            .field_mut(&field_id, "Title")
            .set_shared("Welcome");

        assert_eq!(record.fields.len(), 1);
        assert_eq!(record.field(&field_id, "Title").unwrap().shared.as_deref(), Some("Welcome"));
        assert!(record.field(&Id::new_id(), "title").is_some());
    }
}
