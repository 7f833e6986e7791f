//! Ambient database of the current thread.
//!
//! Host code that does not receive a database explicitly asks
//! [`database`] for the innermost one a [`DatabaseSwitcher`] made active.

use std::cell::RefCell;
use std::sync::Arc;

use fakedb_core::Database;
use tracing::trace;

thread_local! {
    static ACTIVE: RefCell<Vec<Arc<Database>>> = const { RefCell::new(Vec::new()) };
}

/// Makes a database the ambient one until dropped
#[must_use = "the database is only active while the switcher lives"]
#[derive(Debug)]
pub struct DatabaseSwitcher {
    database: Arc<Database>,
}

impl DatabaseSwitcher {
    /// Push `database` on the current thread's stack
    pub fn enter(database: Arc<Database>) -> Self {
        trace!(database = %database.name(), "Entering database context");
        ACTIVE.with(|stack| stack.borrow_mut().push(database.clone()));
        Self { database }
    }

    /// The database this switcher activated
    pub fn database(&self) -> &Arc<Database> {
        &self.database
    }
}

impl Drop for DatabaseSwitcher {
    fn drop(&mut self) {
        ACTIVE.with(|stack| {
            let mut stack = stack.borrow_mut();
            // Switchers may be dropped out of order; remove our own entry.
            if let Some(index) = stack.iter().rposition(|db| Arc::ptr_eq(db, &self.database)) {
                stack.remove(index);
            }
        });
        trace!(database = %self.database.name(), "Leaving database context");
    }
}

/// The innermost active database of the current thread
pub fn database() -> Option<Arc<Database>> {
    ACTIVE.with(|stack| stack.borrow().last().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switchers_nest() {
        assert!(database().is_none());

        let master = Arc::new(Database::new("master").unwrap());
        let web = Arc::new(Database::new("web").unwrap());

        let outer = DatabaseSwitcher::enter(master.clone());
        assert!(Arc::ptr_eq(outer.database(), &master));
        assert_eq!(database().unwrap().name(), "master");
        {
            let inner = DatabaseSwitcher::enter(web);
            assert_eq!(inner.database().name(), "web");
            assert!(Arc::ptr_eq(&database().unwrap(), inner.database()));
        }
        assert_eq!(database().unwrap().name(), "master");

        drop(outer);
        assert!(database().is_none());
    }

    #[test]
    fn test_context_is_per_thread() {
        let _switcher = DatabaseSwitcher::enter(Arc::new(Database::new("master").unwrap()));
        let seen = std::thread::spawn(|| database().is_some()).join().unwrap();
        assert!(!seen);
    }
}
