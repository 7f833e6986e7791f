//! Seeding of the well-known content tree.

use fakedb_core::{CoreResult, Id};
use tracing::debug;

use crate::constants::*;
use crate::data::{DbItem, DbTemplate};
use crate::storage::{DataStorage, DataStore};

/// Add `/sitecore` with its well-known children and the folder template
pub fn seed_default_tree(storage: &DataStorage) -> CoreResult<()> {
    if !storage.contains_template(&FOLDER_TEMPLATE_ID) {
        storage.add_fake_template(DbTemplate::with_id(FOLDER_TEMPLATE_ID, FOLDER_TEMPLATE_NAME))?;
    }

    let folder = |id: Id, name: &str| DbItem::with_id(id, name).template(FOLDER_TEMPLATE_ID);
    let root = folder(ROOT_ID, ROOT_NAME)
        .child(folder(CONTENT_ROOT_ID, "content"))
        .child(folder(LAYOUT_ROOT_ID, "layout"))
        .child(folder(MEDIA_LIBRARY_ROOT_ID, "media library"))
        .child(folder(SYSTEM_ROOT_ID, "system"))
        .child(folder(TEMPLATE_ROOT_ID, "templates"));

    storage.add_db_item(root, None, false)?;
    debug!("Seeded default content tree");
    Ok(())
}
