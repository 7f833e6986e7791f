//! The `Db` facade: one fake content database for the lifetime of a test.

use std::sync::Arc;

use fakedb_core::{ensure_not_empty, CoreError, CoreResult, Database, Id, Item, Language, Version};
use parking_lot::Mutex;
use tracing::info;

use crate::config::{rollback, ConfigurationGuard, ConfigurationService, DbConfiguration};
use crate::constants::CONTENT_ROOT_ID;
use crate::context::DatabaseSwitcher;
use crate::data::{DbItem, DbTemplate};
use crate::engine::install_commands;
use crate::init::seed_default_tree;
use crate::storage::{DataStorage, DataStore};

/// An in-memory content database.
///
/// Construction installs the fake data commands into a fresh [`Database`],
/// seeds the default tree and makes the database the ambient one of the
/// current thread. Dropping (or disposing) undoes all of that.
///
/// `Db` is not `Send`: once [`Db::configuration`] was called it owns the
/// process-wide configuration lock, which must be released by the thread
/// that took it.
///
/// ```
/// use fakedb::{Db, DbItem};
///
/// let db = Db::new().unwrap();
/// db.add(DbItem::new("home").field_value("Title", "Welcome")).unwrap();
///
/// let home = db.get_item_by_path("/sitecore/content/home").unwrap().unwrap();
/// assert_eq!(&home["Title"], "Welcome");
/// ```
pub struct Db {
    database: Arc<Database>,
    storage: Arc<DataStorage>,
    configuration: Arc<ConfigurationService>,
    config_lock: Mutex<Option<ConfigurationGuard>>,
    journal: Mutex<Vec<(String, Option<String>)>>,
    switcher: Option<DatabaseSwitcher>,
    auto_create_templates: bool,
    disposed: bool,
}

impl Db {
    /// Open the default database (`master` unless configured otherwise)
    pub fn new() -> CoreResult<Self> {
        let configuration = ConfigurationService::global();
        let name = configuration.document()?.default_database.clone();
        Self::with_configuration(name, configuration)
    }

    /// Open a database by name
    pub fn with_name(name: &str) -> CoreResult<Self> {
        Self::with_configuration(name, ConfigurationService::global())
    }

    /// Open a database by name over an explicit configuration service
    pub fn with_configuration(
        name: impl Into<String>,
        configuration: Arc<ConfigurationService>,
    ) -> CoreResult<Self> {
        let name = name.into();
        ensure_not_empty(&name, "databaseName")?;

        let config = configuration.document()?;
        let language = config.language()?;
        let auto_create_templates = config.auto_create_templates;
        let seed = config.seed_default_tree;

        let storage = Arc::new(DataStorage::new(name.clone(), language.clone()));
        let store: Arc<dyn DataStore> = storage.clone();
        let database = Arc::new(
            Database::with_commands(name.clone(), |commands| install_commands(commands, store))?
                .with_default_language(language),
        );

        if seed {
            seed_default_tree(&storage)?;
        }

        let switcher = DatabaseSwitcher::enter(database.clone());
        info!(database = %name, "Created fake database");

        Ok(Self {
            database,
            storage,
            configuration,
            config_lock: Mutex::new(None),
            journal: Mutex::new(Vec::new()),
            switcher: Some(switcher),
            auto_create_templates,
            disposed: false,
        })
    }

    /// The host database backed by this instance
    pub fn database(&self) -> &Arc<Database> {
        &self.database
    }

    /// The storage behind the database
    pub fn data_storage(&self) -> &Arc<DataStorage> {
        &self.storage
    }

    /// Shared configuration, taking the process-wide lock on first use.
    ///
    /// The lock stays with this instance until it is disposed.
    pub fn configuration(&self) -> CoreResult<DbConfiguration<'_>> {
        {
            let mut held = self.config_lock.lock();
            if held.is_none() {
                *held = Some(self.configuration.lock());
            }
        }
        self.configuration.document()?;
        Ok(DbConfiguration::new(&self.configuration, &self.journal))
    }

    /// Add an item tree; without an explicit parent it goes under `/sitecore/content`
    pub fn add(&self, item: DbItem) -> CoreResult<()> {
        self.ensure_active()?;
        let parent = self
            .storage
            .get_fake_item(&CONTENT_ROOT_ID)
            .map(|content| content.id());
        self.storage
            .add_db_item(item, parent, self.auto_create_templates)
    }

    /// Register a template; a duplicate id fails
    pub fn add_template(&self, template: DbTemplate) -> CoreResult<()> {
        self.ensure_active()?;
        if self.storage.contains_template(&template.id) {
            return Err(CoreError::DuplicateKey(template.id.to_string()));
        }
        self.storage.add_fake_template(template)
    }

    /// Latest version of an item in the default language
    pub fn get_item(&self, id: Id) -> CoreResult<Option<Item>> {
        self.database.get_item(id)
    }

    /// Latest version of an item in a language
    pub fn get_item_in(&self, id: Id, language: &str) -> CoreResult<Option<Item>> {
        self.database.get_item_in(id, &Language::parse(language)?)
    }

    /// A specific version of an item
    pub fn get_item_version(&self, id: Id, language: &str, version: u32) -> CoreResult<Option<Item>> {
        self.database
            .get_item_version(id, &Language::parse(language)?, Version::new(version))
    }

    /// Item at a path, or by an id string
    pub fn get_item_by_path(&self, path: &str) -> CoreResult<Option<Item>> {
        self.database.get_item_by_path(path)
    }

    /// Item at a path in a language
    pub fn get_item_by_path_in(&self, path: &str, language: &str) -> CoreResult<Option<Item>> {
        self.database
            .get_item_by_path_in(path, &Language::parse(language)?)
    }

    /// A specific version of the item at a path
    pub fn get_item_by_path_version(
        &self,
        path: &str,
        language: &str,
        version: u32,
    ) -> CoreResult<Option<Item>> {
        self.database
            .get_item_by_path_version(path, &Language::parse(language)?, Version::new(version))
    }

    /// Whether `dispose` already ran
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Tear the database down; later calls do nothing
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        rollback(&self.configuration, &self.journal);
        self.storage.clear();
        self.database.uninstall_commands();
        self.switcher.take();
        self.config_lock.lock().take();
        self.disposed = true;

        info!(database = %self.database.name(), "Disposed fake database");
    }

    fn ensure_active(&self) -> CoreResult<()> {
        if self.disposed {
            return Err(CoreError::invalid_argument(format!(
                "database '{}' is disposed",
                self.database.name()
            )));
        }
        Ok(())
    }
}

impl Drop for Db {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("database", &self.database.name())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}
