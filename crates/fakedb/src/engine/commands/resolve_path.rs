use std::sync::Arc;

use fakedb_core::domain::command::ResolvePathPrototype;
use fakedb_core::{ensure_not_empty, CoreResult, DataCommand, Id, Item, ResolvePathArgs};
use tracing::trace;

use crate::constants::ROOT_ID;
use crate::storage::DataStore;

/// Resolves an item by path, or by an id written as a string.
///
/// Path segments match item names case-insensitively; when siblings share a
/// name the first in declaration order wins.
pub struct ResolvePathCommand {
    store: Arc<dyn DataStore>,
}

impl ResolvePathCommand {
    /// Bind the command to a storage
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    fn walk(&self, path: &str) -> Option<Id> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());

        let root = self.store.get_fake_item(&ROOT_ID)?;
        if !segments.next()?.eq_ignore_ascii_case(&root.name) {
            return None;
        }

        let mut current = root;
        for segment in segments {
            current = current.children.iter().find_map(|child_id| {
                self.store
                    .get_fake_item(child_id)
                    .filter(|child| child.name.eq_ignore_ascii_case(segment))
            })?;
        }
        Some(current.id())
    }
}

impl DataCommand for ResolvePathCommand {
    type Args = ResolvePathArgs;
    type Output = Option<Item>;

    fn create_instance(&self) -> ResolvePathPrototype {
        Box::new(ResolvePathCommand::new(self.store.clone()))
    }

    fn execute(&self, args: ResolvePathArgs) -> CoreResult<Option<Item>> {
        ensure_not_empty(&args.item_path, "path")?;

        let id = match Id::parse(&args.item_path) {
            Ok(id) => Some(id),
            Err(_) => self.walk(args.item_path.trim()),
        };
        trace!(path = %args.item_path, resolved = ?id, "Resolved path");

        match id {
            Some(id) => self.store.get_item_instance(&id, &args.language, args.version),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FakeItem;
    use crate::engine::commands::test_support::{fake, item};
    use crate::storage::MockDataStore;
    use fakedb_core::{CoreError, Language, Version};
    use std::collections::HashMap;

    fn fixture() -> (MockDataStore, Id, Id) {
        let (content_id, home_id, twin_id) = (Id::new_id(), Id::new_id(), Id::new_id());
        let mut root = fake(ROOT_ID, "sitecore", None);
        root.children = vec![content_id];
        let mut content = fake(content_id, "content", Some(ROOT_ID));
        content.children = vec![home_id, twin_id];

        let records: HashMap<Id, FakeItem> = vec![
            root,
            content,
            fake(home_id, "Home", Some(content_id)),
            fake(twin_id, "home", Some(content_id)),
        ]
        .into_iter()
        .map(|r| (r.id(), r))
        .collect();

        let mut store = MockDataStore::new();
        store
            .expect_get_fake_item()
            .returning(move |id| records.get(id).cloned());
        store
            .expect_get_item_instance()
            .returning(|id, _, _| Ok(Some(item(*id, "found"))));
        (store, home_id, content_id)
    }

    fn resolve(store: MockDataStore, path: &str) -> CoreResult<Option<Item>> {
        ResolvePathCommand::new(Arc::new(store)).execute(ResolvePathArgs {
            item_path: path.to_string(),
            language: Language::default(),
            version: Version::LATEST,
        })
    }

    #[test]
    fn test_walks_names_case_insensitively_first_match_wins() {
        let (store, home_id, _) = fixture();
        let found = resolve(store, "/sitecore/Content/HOME").unwrap().unwrap();
        assert_eq!(found.id, home_id);
    }

    #[test]
    fn test_resolves_id_strings() {
        let (store, _, content_id) = fixture();
        let found = resolve(store, &content_id.to_string()).unwrap().unwrap();
        assert_eq!(found.id, content_id);
    }

    #[test]
    fn test_missing_segment_is_not_found() {
        let (store, _, _) = fixture();
        assert!(resolve(store, "/sitecore/content/home/missing").unwrap().is_none());

        let (store, _, _) = fixture();
        assert!(resolve(store, "/other/content").unwrap().is_none());
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let store = MockDataStore::new();
        assert!(matches!(resolve(store, ""), Err(CoreError::InvalidArgument(_))));
    }
}
