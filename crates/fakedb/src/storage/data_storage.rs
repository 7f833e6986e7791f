use std::collections::{HashMap, HashSet};

use fakedb_core::{CoreError, CoreResult, Id, Item, Language, Version};
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::item_builder::{DefinitionSource, ItemBuilder};
use super::DataStore;
use crate::data::{DbItem, DbTemplate, FakeItem};

#[derive(Debug, Default)]
struct StorageState {
    items: HashMap<Id, FakeItem>,
    templates: HashMap<Id, DbTemplate>,
    blobs: HashMap<(Id, Id), Vec<u8>>,
}

impl DefinitionSource for StorageState {
    fn fake_item(&self, id: &Id) -> Option<&FakeItem> {
        self.items.get(id)
    }

    fn fake_template(&self, id: &Id) -> Option<&DbTemplate> {
        self.templates.get(id)
    }
}

impl StorageState {
    fn link_to_parent(&mut self, item: &FakeItem) {
        if let Some(parent) = item.parent_id.and_then(|id| self.items.get_mut(&id)) {
            if !parent.children.contains(&item.id()) {
                parent.children.push(item.id());
            }
        }
    }
}

/// In-memory storage behind one fake database.
///
/// Owns every fake item, template and blob of the database. The lock only
/// keeps the shared handle sound; one test drives a storage at a time.
#[derive(Debug)]
pub struct DataStorage {
    database_name: String,
    default_language: Language,
    state: RwLock<StorageState>,
}

impl DataStorage {
    /// Create an empty storage for a database
    pub fn new(database_name: impl Into<String>, default_language: Language) -> Self {
        Self {
            database_name: database_name.into(),
            default_language,
            state: RwLock::new(StorageState::default()),
        }
    }

    /// Language authored items get their first version in
    pub fn default_language(&self) -> &Language {
        &self.default_language
    }

    /// Insert an authored item tree under `parent_id`.
    ///
    /// Every id of the tree is checked before anything is inserted. Items
    /// naming no template get one built from their fields when
    /// `auto_create_templates` is set.
    pub fn add_db_item(
        &self,
        item: DbItem,
        parent_id: Option<Id>,
        auto_create_templates: bool,
    ) -> CoreResult<()> {
        let mut state = self.state.write();

        let mut seen = HashSet::new();
        for id in item.ids() {
            if state.items.contains_key(&id) || !seen.insert(id) {
                return Err(CoreError::DuplicateKey(id.to_string()));
            }
        }

        if let Some(parent) = item.parent_id.or(parent_id) {
            if !state.items.contains_key(&parent) {
                warn!(item = %item.name, parent = %parent, "Parent item does not exist");
            }
        }

        let mut generated = Vec::new();
        let records = {
            let mut template_for = |definition: &DbItem| {
                if !auto_create_templates {
                    warn!(item = %definition.name, "Item has no template");
                    return Id::NULL;
                }
                let template =
                    DbTemplate::from_fields(Id::new_id(), definition.name.clone(), &definition.fields);
                let id = template.id;
                generated.push(template);
                id
            };
            item.flatten(parent_id, &self.default_language, &mut template_for)
        };

        for template in generated {
            debug!(template = %template.id, name = %template.name, "Created template from item fields");
            state.templates.insert(template.id, template);
        }

        for record in records {
            debug!(item = %record.id(), name = %record.name, "Adding fake item");
            state.link_to_parent(&record);
            state.items.insert(record.id(), record);
        }
        Ok(())
    }

    /// Number of stored items
    pub fn item_count(&self) -> usize {
        self.state.read().items.len()
    }

    /// Whether a template is registered
    pub fn contains_template(&self, id: &Id) -> bool {
        self.state.read().templates.contains_key(id)
    }

    /// Drop every item, template and blob
    pub fn clear(&self) {
        let mut state = self.state.write();
        state.items.clear();
        state.templates.clear();
        state.blobs.clear();
        debug!(database = %self.database_name, "Cleared data storage");
    }
}

impl DataStore for DataStorage {
    fn database_name(&self) -> String {
        self.database_name.clone()
    }

    fn get_fake_item(&self, id: &Id) -> Option<FakeItem> {
        self.state.read().items.get(id).cloned()
    }

    fn get_fake_template(&self, id: &Id) -> Option<DbTemplate> {
        self.state.read().templates.get(id).cloned()
    }

    fn add_fake_item(&self, item: FakeItem) -> CoreResult<()> {
        let mut state = self.state.write();
        if state.items.contains_key(&item.id()) {
            return Err(CoreError::DuplicateKey(item.id().to_string()));
        }

        debug!(item = %item.id(), name = %item.name, "Adding fake item");
        state.link_to_parent(&item);
        state.items.insert(item.id(), item);
        Ok(())
    }

    fn put_fake_item(&self, item: FakeItem) -> CoreResult<()> {
        let mut state = self.state.write();
        match state.items.get_mut(&item.id()) {
            Some(existing) => {
                debug!(item = %item.id(), "Replacing fake item");
                *existing = item;
                Ok(())
            }
            None => Err(CoreError::not_found("Item", item.id())),
        }
    }

    fn add_fake_template(&self, template: DbTemplate) -> CoreResult<()> {
        let mut state = self.state.write();
        if state.templates.contains_key(&template.id) {
            return Err(CoreError::DuplicateKey(template.id.to_string()));
        }

        debug!(template = %template.id, name = %template.name, "Adding fake template");
        state.templates.insert(template.id, template);
        Ok(())
    }

    fn remove_fake_item(&self, id: &Id) -> bool {
        let mut state = self.state.write();
        let Some(item) = state.items.remove(id) else {
            return false;
        };

        if let Some(parent) = item.parent_id.and_then(|pid| state.items.get_mut(&pid)) {
            parent.children.retain(|child| child != id);
        }
        debug!(item = %id, "Removed fake item");
        true
    }

    fn remove_fake_template(&self, id: &Id) -> bool {
        self.state.write().templates.remove(id).is_some()
    }

    fn get_item_instance(
        &self,
        id: &Id,
        language: &Language,
        version: Version,
    ) -> CoreResult<Option<Item>> {
        let state = self.state.read();
        match state.items.get(id) {
            Some(definition) => ItemBuilder::new(&self.database_name, &*state)
                .create_instance(definition, language, version),
            None => Ok(None),
        }
    }

    fn get_blob(&self, item_id: &Id, field_id: &Id) -> Option<Vec<u8>> {
        self.state.read().blobs.get(&(*item_id, *field_id)).cloned()
    }

    fn set_blob(&self, item_id: &Id, field_id: &Id, data: Vec<u8>) {
        self.state.write().blobs.insert((*item_id, *field_id), data);
    }

    fn blob_exists(&self, item_id: &Id, field_id: &Id) -> bool {
        self.state.read().blobs.contains_key(&(*item_id, *field_id))
    }

    fn blobs_of(&self, item_id: &Id) -> Vec<(Id, Vec<u8>)> {
        self.state
            .read()
            .blobs
            .iter()
            .filter(|((owner, _), _)| owner == item_id)
            .map(|((_, field), data)| (*field, data.clone()))
            .collect()
    }

    fn remove_blobs(&self, item_id: &Id) {
        self.state.write().blobs.retain(|(owner, _), _| owner != item_id);
    }
}
