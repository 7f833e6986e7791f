/// Item projection and field list
pub mod item;

/// Data command trait, argument types and slot aliases
pub mod command;

/// Command slot table and dispatcher
pub mod engine;

/// Database API
pub mod database;
