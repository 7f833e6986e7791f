//! Configuration for FakeDb
//!
//! The configuration document is shared by every fake database of the
//! process. It is loaded on first use from an optional YAML file and the
//! environment, and guarded by one process-wide reentrant lock.

use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::sync::Arc;

use fakedb_core::{CoreError, CoreResult, Language};
use once_cell::sync::{Lazy, OnceCell};
use parking_lot::lock_api::ArcReentrantMutexGuard;
use parking_lot::{Mutex, RawMutex, RawThreadId, ReentrantMutex};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::constants::DEFAULT_DATABASE;

/// Names the YAML file to load the configuration from
pub const CONFIG_PATH_VAR: &str = "FAKEDB_CONFIG";
/// Overrides `default_language`
pub const DEFAULT_LANGUAGE_VAR: &str = "FAKEDB_DEFAULT_LANGUAGE";
/// Overrides `log_filter`
pub const LOG_FILTER_VAR: &str = "FAKEDB_LOG_FILTER";

/// Guard of the process-wide configuration lock
pub type ConfigurationGuard = ArcReentrantMutexGuard<RawMutex, RawThreadId, ()>;

/// FakeDb configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FakeDbConfig {
    /// Language of lookups that name none, and of authored items
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Database created by `Db::new`
    #[serde(default = "default_database")]
    pub default_database: String,

    /// Build a template from the fields of items added without one
    #[serde(default = "default_true")]
    pub auto_create_templates: bool,

    /// Seed `/sitecore` and its well-known children on construction
    #[serde(default = "default_true")]
    pub seed_default_tree: bool,

    /// `tracing` filter used by `init_tracing`
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Free-form settings read through `DbConfiguration::setting`
    #[serde(default)]
    pub settings: HashMap<String, String>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for FakeDbConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            default_database: default_database(),
            auto_create_templates: true,
            seed_default_tree: true,
            log_filter: default_log_filter(),
            settings: HashMap::new(),
        }
    }
}

impl FakeDbConfig {
    /// Load from the file named by `FAKEDB_CONFIG`, then apply environment overrides
    pub fn load() -> CoreResult<Self> {
        let mut config = match env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|name| env::var(name).ok());
        Ok(config)
    }

    /// Parse a YAML document
    pub fn from_yaml(text: &str) -> CoreResult<Self> {
        serde_yaml::from_str(text)
            .map_err(|e| CoreError::ConfigurationError(format!("invalid configuration: {}", e)))
    }

    /// Read and parse a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ConfigurationError(format!("cannot read {}: {}", path.display(), e))
        })?;
        info!(path = %path.display(), "Loading FakeDb configuration");
        Self::from_yaml(&text)
    }

    /// Apply overrides from `lookup`, normally the process environment
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(language) = lookup(DEFAULT_LANGUAGE_VAR) {
            if language.trim().is_empty() {
                warn!("Ignoring empty {}", DEFAULT_LANGUAGE_VAR);
            } else {
                self.default_language = language;
            }
        }

        if let Some(filter) = lookup(LOG_FILTER_VAR) {
            self.log_filter = filter;
        }
    }

    /// The default language as a language value
    pub fn language(&self) -> CoreResult<Language> {
        Language::parse(&self.default_language)
    }
}

static GLOBAL: Lazy<Arc<ConfigurationService>> = Lazy::new(|| Arc::new(ConfigurationService::new()));

/// Shared configuration state of all fake databases.
///
/// Holds the lazily loaded document, the setting overrides made by tests and
/// the lock a database takes before touching either.
pub struct ConfigurationService {
    document: OnceCell<FakeDbConfig>,
    lock: Arc<ReentrantMutex<()>>,
    overrides: Mutex<HashMap<String, String>>,
}

impl ConfigurationService {
    /// Service that loads its document from the environment on first use
    pub fn new() -> Self {
        Self {
            document: OnceCell::new(),
            lock: Arc::new(ReentrantMutex::new(())),
            overrides: Mutex::new(HashMap::new()),
        }
    }

    /// Service over an already built document
    pub fn with_config(config: FakeDbConfig) -> Self {
        let service = Self::new();
        let _ = service.document.set(config);
        service
    }

    /// The process-wide service
    pub fn global() -> Arc<ConfigurationService> {
        GLOBAL.clone()
    }

    /// The configuration document, loaded on first call
    pub fn document(&self) -> CoreResult<&FakeDbConfig> {
        self.document.get_or_try_init(FakeDbConfig::load)
    }

    /// Take the configuration lock; reentrant on the owning thread
    pub fn lock(&self) -> ConfigurationGuard {
        self.lock.lock_arc()
    }

    /// Whether any thread holds the configuration lock
    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Current value of a setting: override first, then the document
    pub fn setting(&self, name: &str) -> CoreResult<Option<String>> {
        if let Some(value) = self.overrides.lock().get(name) {
            return Ok(Some(value.clone()));
        }
        Ok(self.document()?.settings.get(name).cloned())
    }

    /// Override a setting; returns the previous override
    pub fn set_override(&self, name: &str, value: Option<String>) -> Option<String> {
        let mut overrides = self.overrides.lock();
        match value {
            Some(value) => overrides.insert(name.to_string(), value),
            None => overrides.remove(name),
        }
    }
}

impl Default for ConfigurationService {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConfigurationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigurationService")
            .field("loaded", &self.document.get().is_some())
            .field("locked", &self.lock.is_locked())
            .finish()
    }
}

/// Configuration handle of one fake database.
///
/// Setting changes made through the handle are journaled and undone when
/// the database is disposed.
pub struct DbConfiguration<'a> {
    service: &'a ConfigurationService,
    journal: &'a Mutex<Vec<(String, Option<String>)>>,
}

impl<'a> DbConfiguration<'a> {
    pub(crate) fn new(
        service: &'a ConfigurationService,
        journal: &'a Mutex<Vec<(String, Option<String>)>>,
    ) -> Self {
        Self { service, journal }
    }

    /// The configuration document
    pub fn config(&self) -> CoreResult<&'a FakeDbConfig> {
        self.service.document()
    }

    /// Current value of a setting
    pub fn setting(&self, name: &str) -> CoreResult<Option<String>> {
        self.service.setting(name)
    }

    /// Override a setting until the database is disposed
    pub fn set_setting(&self, name: &str, value: impl Into<String>) {
        let previous = self.service.set_override(name, Some(value.into()));
        self.journal.lock().push((name.to_string(), previous));
    }
}

/// Undo journaled setting changes, newest first
pub(crate) fn rollback(service: &ConfigurationService, journal: &Mutex<Vec<(String, Option<String>)>>) {
    let mut journal = journal.lock();
    while let Some((name, previous)) = journal.pop() {
        service.set_override(&name, previous);
    }
}
