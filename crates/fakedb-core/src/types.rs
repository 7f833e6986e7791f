//! Identifier, language and version value types of the host item model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// Identifier of an item, template or field.
///
/// Rendered in the braced upper-case form used by the content tree,
/// e.g. `{11111111-1111-1111-1111-111111111111}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id(pub Uuid);

impl Id {
    /// The all-zero identifier
    pub const NULL: Id = Id(Uuid::nil());

    /// Create a fresh random identifier
    pub fn new_id() -> Self {
        Id(Uuid::new_v4())
    }

    /// Build an identifier from a fixed 128-bit value
    pub const fn from_u128(value: u128) -> Self {
        Id(Uuid::from_u128(value))
    }

    /// Parse a braced or bare identifier
    pub fn parse(value: &str) -> CoreResult<Self> {
        let trimmed = value.trim();
        let bare = trimmed
            .strip_prefix('{')
            .and_then(|s| s.strip_suffix('}'))
            .unwrap_or(trimmed);

        Uuid::parse_str(bare)
            .map(Id)
            .map_err(|_| CoreError::invalid_argument(format!("'{}' is not a valid ID", value)))
    }

    /// Whether `value` looks like an identifier
    pub fn is_id(value: &str) -> bool {
        Self::parse(value).is_ok()
    }

    /// Whether this is the all-zero identifier
    pub fn is_null(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0.to_string().to_uppercase())
    }
}

impl FromStr for Id {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Content language, e.g. `en` or `da-DK`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Language(String);

impl Language {
    /// Parse a language name; empty names are rejected
    pub fn parse(name: &str) -> CoreResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::invalid_argument("language cannot be null or empty"));
        }
        Ok(Language(name.to_string()))
    }

    /// The language name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for Language {
    fn default() -> Self {
        Language("en".to_string())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Item version number within one language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version(u32);

impl Version {
    /// Requests the latest version; on an item it means "no versions"
    pub const LATEST: Version = Version(0);

    /// The first version of a language
    pub const FIRST: Version = Version(1);

    /// Create a version from its number
    pub const fn new(number: u32) -> Self {
        Version(number)
    }

    /// The version number
    pub const fn number(&self) -> u32 {
        self.0
    }

    /// Whether this is the latest-version marker
    pub const fn is_latest(&self) -> bool {
        self.0 == 0
    }

    /// The version that follows this one; `None` past the last number
    pub const fn next(&self) -> Option<Version> {
        match self.0.checked_add(1) {
            Some(number) => Some(Version(number)),
            None => None,
        }
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::LATEST
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a field's value varies across languages and versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FieldScope {
    /// One value for every language and version
    Shared,
    /// One value per language
    Unversioned,
    /// One value per language and version
    #[default]
    Versioned,
}
