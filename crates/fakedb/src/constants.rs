//! Well-known identifiers of the default content tree.

use fakedb_core::Id;

/// Database created by `Db::new`
pub const DEFAULT_DATABASE: &str = "master";

/// `/sitecore`
pub const ROOT_ID: Id = Id::from_u128(0x11111111_1111_1111_1111_111111111111);
/// `/sitecore/content`
pub const CONTENT_ROOT_ID: Id = Id::from_u128(0x0DE95AE4_41AB_4D01_9EB0_67441B7C2450);
/// `/sitecore/layout`
pub const LAYOUT_ROOT_ID: Id = Id::from_u128(0xEB2E4FFD_2761_4653_B052_26A64D385227);
/// `/sitecore/media library`
pub const MEDIA_LIBRARY_ROOT_ID: Id = Id::from_u128(0x3D6658D8_A0BF_4E75_B3E2_D050FABCF4E1);
/// `/sitecore/system`
pub const SYSTEM_ROOT_ID: Id = Id::from_u128(0x13D6D6C6_C50B_4BBD_B331_2B04F1A58F21);
/// `/sitecore/templates`
pub const TEMPLATE_ROOT_ID: Id = Id::from_u128(0x3C1715FE_6A13_4FCF_845F_DE308BA9741D);

/// Template of the default tree folders
pub const FOLDER_TEMPLATE_ID: Id = Id::from_u128(0xA87A00B1_E6DB_45AB_8B54_636FEC3B5523);

/// Name of the root item
pub const ROOT_NAME: &str = "sitecore";
/// Name of the folder template
pub const FOLDER_TEMPLATE_NAME: &str = "Folder";
