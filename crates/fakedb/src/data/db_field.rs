use std::collections::{BTreeMap, HashMap};

use fakedb_core::{Id, Language, Version};

/// Raw values of one field of a fake item.
///
/// A field may hold a shared value, one value per language and one value per
/// language and version at the same time. Reads prefer the most specific.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbField {
    /// Field identifier
    pub id: Id,
    /// Field name
    pub name: String,
    /// Value for every language and version
    pub shared: Option<String>,
    /// Values per language
    pub unversioned: HashMap<Language, String>,
    /// Values per language and version
    pub versioned: HashMap<Language, BTreeMap<Version, String>>,
}

impl DbField {
    /// Create an empty field with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Id::new_id(), name)
    }

    /// Create an empty field with a fixed id
    pub fn with_id(id: Id, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            shared: None,
            unversioned: HashMap::new(),
            versioned: HashMap::new(),
        }
    }

    /// Set the shared value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.shared = Some(value.into());
        self
    }

    /// Set the value of one language
    pub fn with_language_value(mut self, language: Language, value: impl Into<String>) -> Self {
        self.unversioned.insert(language, value.into());
        self
    }

    /// Set the value of one language version
    pub fn with_version_value(
        mut self,
        language: Language,
        version: Version,
        value: impl Into<String>,
    ) -> Self {
        self.set_versioned(&language, version, value);
        self
    }

    /// Most specific value for a language version
    pub fn value_for(&self, language: &Language, version: Version) -> Option<&str> {
        self.versioned
            .get(language)
            .and_then(|values| values.get(&version))
            .or_else(|| self.unversioned.get(language))
            .or(self.shared.as_ref())
            .map(String::as_str)
    }

    /// Overwrite the shared value
    pub fn set_shared(&mut self, value: impl Into<String>) {
        self.shared = Some(value.into());
    }

    /// Overwrite the value of one language
    pub fn set_unversioned(&mut self, language: &Language, value: impl Into<String>) {
        self.unversioned.insert(language.clone(), value.into());
    }

    /// Overwrite the value of one language version
    pub fn set_versioned(&mut self, language: &Language, version: Version, value: impl Into<String>) {
        self.versioned
            .entry(language.clone())
            .or_default()
            .insert(version, value.into());
    }

    /// Copy the versioned value of `from` to `to` within a language
    pub fn copy_version(&mut self, language: &Language, from: Version, to: Version) {
        if let Some(values) = self.versioned.get_mut(language) {
            if let Some(value) = values.get(&from).cloned() {
                values.insert(to, value);
            }
        }
    }

    /// Drop the value of one language version
    pub fn remove_version(&mut self, language: &Language, version: Version) {
        if let Some(values) = self.versioned.get_mut(language) {
            values.remove(&version);
            if values.is_empty() {
                self.versioned.remove(language);
            }
        }
    }

    /// Drop every per-language value of a language
    pub fn remove_language(&mut self, language: &Language) {
        self.unversioned.remove(language);
        self.versioned.remove(language);
    }

    /// Versions holding a value in `language`, ascending
    pub fn versions_in(&self, language: &Language) -> impl Iterator<Item = Version> + '_ {
        self.versioned
            .get(language)
            .into_iter()
            .flat_map(|values| values.keys().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en() -> Language {
        Language::default()
    }

    fn da() -> Language {
        Language::parse("da").unwrap()
    }

    #[test]
    fn test_most_specific_value_wins() {
        let field = DbField::new("Title")
            .with_value("shared")
            .with_language_value(da(), "dansk")
            .with_version_value(en(), Version::new(2), "english v2");

        assert_eq!(field.value_for(&en(), Version::new(2)), Some("english v2"));
        assert_eq!(field.value_for(&en(), Version::FIRST), Some("shared"));
        assert_eq!(field.value_for(&da(), Version::FIRST), Some("dansk"));
    }

    #[test]
    fn test_empty_field_has_no_value() {
        let field = DbField::new("Title");
        assert_eq!(field.value_for(&en(), Version::FIRST), None);
    }

    #[test]
    fn test_copy_and_remove_version() {
        let mut field = DbField::new("Title").with_version_value(en(), Version::FIRST, "v1");
        field.copy_version(&en(), Version::FIRST, Version::new(2));
        assert_eq!(field.versions_in(&en()).collect::<Vec<_>>(), vec![Version::FIRST, Version::new(2)]);

        field.remove_version(&en(), Version::FIRST);
        field.remove_version(&en(), Version::new(2));
        assert!(field.versioned.is_empty());
    }

    #[test]
    fn test_remove_language_keeps_shared_value() {
        let mut field = DbField::new("Title")
            .with_value("shared")
            .with_language_value(da(), "dansk")
            .with_version_value(da(), Version::FIRST, "dansk v1");

        field.remove_language(&da());
        assert_eq!(field.value_for(&da(), Version::FIRST), Some("shared"));
    }
}
