use std::collections::HashSet;

use fakedb_core::{CoreError, CoreResult, Field, FieldList, Id, Item, Language, Version};

use crate::data::{DbTemplate, DbTemplateField, FakeItem};

/// Read access to stored definitions
pub trait DefinitionSource {
    /// Stored item
    fn fake_item(&self, id: &Id) -> Option<&FakeItem>;

    /// Stored template
    fn fake_template(&self, id: &Id) -> Option<&DbTemplate>;
}

/// Materializes [`Item`] projections from fake definitions
pub struct ItemBuilder<'a, S: DefinitionSource> {
    database: &'a str,
    source: &'a S,
}

impl<'a, S: DefinitionSource> ItemBuilder<'a, S> {
    /// Builder over the definitions of one database
    pub fn new(database: &'a str, source: &'a S) -> Self {
        Self { database, source }
    }

    /// Build the projection of `definition` for a language and version.
    ///
    /// `Version::LATEST` picks the newest version of the language. `None` is
    /// returned when an explicit version does not exist.
    pub fn create_instance(
        &self,
        definition: &FakeItem,
        language: &Language,
        version: Version,
    ) -> CoreResult<Option<Item>> {
        let template = self
            .source
            .fake_template(&definition.template_id)
            .ok_or(CoreError::TemplateNotFound(definition.template_id))?;

        let version = if version.is_latest() {
            definition.latest_version(language).unwrap_or(Version::LATEST)
        } else if definition.has_version(language, version) {
            version
        } else {
            return Ok(None);
        };

        let fields = self
            .template_fields(template)?
            .into_iter()
            .map(|template_field| resolve_field(definition, template_field, language, version))
            .collect();

        Ok(Some(Item {
            id: definition.id(),
            name: definition.name.clone(),
            template_id: template.id,
            template_name: template.name.clone(),
            parent_id: definition.parent_id,
            path: self.path_of(definition),
            language: language.clone(),
            version,
            database: self.database.to_string(),
            fields: FieldList::new(fields),
            created: definition.created,
            updated: definition.updated,
        }))
    }

    /// Own fields first, then those of each base in order, skipping repeats
    pub fn template_fields(&self, template: &'a DbTemplate) -> CoreResult<Vec<&'a DbTemplateField>> {
        let mut fields = Vec::new();
        let mut seen_fields = HashSet::new();
        let mut seen_templates = HashSet::new();
        self.collect_fields(template, &mut fields, &mut seen_fields, &mut seen_templates)?;
        Ok(fields)
    }

    fn collect_fields(
        &self,
        template: &'a DbTemplate,
        fields: &mut Vec<&'a DbTemplateField>,
        seen_fields: &mut HashSet<Id>,
        seen_templates: &mut HashSet<Id>,
    ) -> CoreResult<()> {
        if !seen_templates.insert(template.id) {
            return Ok(());
        }

        for field in &template.fields {
            if seen_fields.insert(field.id) {
                fields.push(field);
            }
        }

        for base_id in &template.base_ids {
            let base = self
                .source
                .fake_template(base_id)
                .ok_or(CoreError::TemplateNotFound(*base_id))?;
            self.collect_fields(base, fields, seen_fields, seen_templates)?;
        }
        Ok(())
    }

    /// Slash-separated names from the root down to `definition`
    pub fn path_of(&self, definition: &FakeItem) -> String {
        let mut names = vec![definition.name.as_str()];
        let mut visited = HashSet::from([definition.id()]);
        let mut parent_id = definition.parent_id;

        while let Some(id) = parent_id {
            if !visited.insert(id) {
                break;
            }
            match self.source.fake_item(&id) {
                Some(parent) => {
                    names.push(parent.name.as_str());
                    parent_id = parent.parent_id;
                }
                None => break,
            }
        }

        names.reverse();
        format!("/{}", names.join("/"))
    }
}

fn resolve_field(
    definition: &FakeItem,
    template_field: &DbTemplateField,
    language: &Language,
    version: Version,
) -> Field {
    let stored = definition
        .field(&template_field.id, &template_field.name)
        .and_then(|field| field.value_for(language, version));

    let mut field = Field::new(
        template_field.id,
        template_field.name.clone(),
        template_field.scope,
        "",
    );
    match (stored, &template_field.default_value) {
        (Some(value), _) => field.value = value.to_string(),
        (None, Some(default)) => {
            field.value = default.clone();
            field.is_standard_value = true;
        }
        (None, None) => {}
    }
    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DbField;
    use fakedb_core::FieldScope;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Definitions {
        items: HashMap<Id, FakeItem>,
        templates: HashMap<Id, DbTemplate>,
    }

    impl DefinitionSource for Definitions {
        fn fake_item(&self, id: &Id) -> Option<&FakeItem> {
            self.items.get(id)
        }

        fn fake_template(&self, id: &Id) -> Option<&DbTemplate> {
            self.templates.get(id)
        }
    }

    fn en() -> Language {
        Language::default()
    }

    fn setup() -> (Definitions, FakeItem) {
        let base = DbTemplate::new("Base")
            .with_template_field(DbTemplateField::new("Text").with_default("standard text"));
        let template = DbTemplate::new("Page")
            .with_field("Title")
            .with_template_field(DbTemplateField::new("Shared").scope(FieldScope::Shared))
            .with_base(base.id);

        let root = FakeItem::new(Id::new_id(), "sitecore", template.id, None, &en());
        let mut home = FakeItem::new(Id::new_id(), "home", template.id, Some(root.id()), &en());
        home.fields.push(
            DbField::with_id(template.fields[0].id, "Title")
                .with_value("shared title")
                .with_version_value(en(), Version::FIRST, "v1 title"),
        );
        home.add_version(&en(), Version::new(2));

        let mut definitions = Definitions::default();
        definitions.templates.insert(base.id, base);
        definitions.templates.insert(template.id, template);
        definitions.items.insert(root.id(), root);
        definitions.items.insert(home.id(), home.clone());
        (definitions, home)
    }

    #[test]
    fn test_resolution_order_and_standard_values() {
        let (definitions, home) = setup();
        let builder = ItemBuilder::new("master", &definitions);

        let v1 = builder.create_instance(&home, &en(), Version::FIRST).unwrap().unwrap();
        assert_eq!(&v1["Title"], "v1 title");
        assert_eq!(&v1["Text"], "standard text");
        assert!(v1.fields.get("Text").unwrap().is_standard_value);
        assert_eq!(&v1["Shared"], "");

        let latest = builder.create_instance(&home, &en(), Version::LATEST).unwrap().unwrap();
        assert_eq!(latest.version, Version::new(2));
        assert_eq!(&latest["Title"], "shared title");
    }

    #[test]
    fn test_inherited_fields_follow_own_fields() {
        let (definitions, home) = setup();
        let item = ItemBuilder::new("master", &definitions)
            .create_instance(&home, &en(), Version::LATEST)
            .unwrap()
            .unwrap();

        let names: Vec<&str> = item.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Title", "Shared", "Text"]);
    }

    #[test]
    fn test_path_and_identity() {
        let (definitions, home) = setup();
        let builder = ItemBuilder::new("master", &definitions);

        let first = builder.create_instance(&home, &en(), Version::LATEST).unwrap().unwrap();
        let second = builder.create_instance(&home, &en(), Version::LATEST).unwrap().unwrap();
        assert_eq!(first.path, "/sitecore/home");
        assert_eq!(first, second);
        assert_eq!(first.database, "master");
    }

    #[test]
    fn test_missing_version_and_language() {
        let (definitions, home) = setup();
        let builder = ItemBuilder::new("master", &definitions);

        assert!(builder.create_instance(&home, &en(), Version::new(7)).unwrap().is_none());

        let da = Language::parse("da").unwrap();
        let item = builder.create_instance(&home, &da, Version::LATEST).unwrap().unwrap();
        assert!(!item.has_version());
        assert_eq!(&item["Title"], "shared title");
    }

    #[test]
    fn test_missing_template_fails() {
        let (definitions, _) = setup();
        let orphan = FakeItem::new(Id::new_id(), "orphan", Id::new_id(), None, &en());

        let err = ItemBuilder::new("master", &definitions)
            .create_instance(&orphan, &en(), Version::LATEST)
            .unwrap_err();
        assert_eq!(err, CoreError::TemplateNotFound(orphan.template_id));
    }
}
