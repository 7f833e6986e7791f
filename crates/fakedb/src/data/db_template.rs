use fakedb_core::{FieldScope, Id};

use super::db_field::DbField;

/// Field declared by a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbTemplateField {
    /// Field identifier shared by every item of the template
    pub id: Id,
    /// Field name
    pub name: String,
    /// How the value varies across languages and versions
    pub scope: FieldScope,
    /// Standard value used when an item holds none
    pub default_value: Option<String>,
}

impl DbTemplateField {
    /// Versioned field with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Id::new_id(), name)
    }

    /// Versioned field with a fixed id
    pub fn with_id(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            scope: FieldScope::Versioned,
            default_value: None,
        }
    }

    /// Change the scope
    pub fn scope(mut self, scope: FieldScope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the standard value
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Fake template: a field schema with optional base templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbTemplate {
    /// Template identifier
    pub id: Id,
    /// Template name
    pub name: String,
    /// Own fields in declaration order
    pub fields: Vec<DbTemplateField>,
    /// Base templates whose fields are inherited, in order
    pub base_ids: Vec<Id>,
}

impl DbTemplate {
    /// Empty template with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Id::new_id(), name)
    }

    /// Empty template with a fixed id
    pub fn with_id(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            fields: Vec::new(),
            base_ids: Vec::new(),
        }
    }

    /// Declare a versioned field by name
    pub fn with_field(self, name: impl Into<String>) -> Self {
        self.with_template_field(DbTemplateField::new(name))
    }

    /// Declare a field
    pub fn with_template_field(mut self, field: DbTemplateField) -> Self {
        self.fields.push(field);
        self
    }

    /// Inherit the fields of another template
    pub fn with_base(mut self, base_id: Id) -> Self {
        self.base_ids.push(base_id);
        self
    }

    /// Build a template describing the fields an item carries.
    ///
    /// The scope of each field follows the most specific kind of value the
    /// item holds for it.
    pub fn from_fields(id: Id, name: impl Into<String>, fields: &[DbField]) -> Self {
        let fields = fields
            .iter()
            .map(|field| {
                let scope = if !field.versioned.is_empty() {
                    FieldScope::Versioned
                } else if !field.unversioned.is_empty() {
                    FieldScope::Unversioned
                } else {
                    FieldScope::Shared
                };
                DbTemplateField::with_id(field.id, field.name.clone()).scope(scope)
            })
            .collect();

        Self {
            id,
            name: name.into(),
            fields,
            base_ids: Vec::new(),
        }
    }

    /// Own field by id
    pub fn field(&self, id: &Id) -> Option<&DbTemplateField> {
        self.fields.iter().find(|f| f.id == *id)
    }
}
