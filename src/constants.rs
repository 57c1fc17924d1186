// -
// Service names

/// Distributed map service
pub const MAP_SERVICE_NAME: &str = "dgrid:impl:mapService";
/// Distributed list service
pub const LIST_SERVICE_NAME: &str = "dgrid:impl:listService";
/// Distributed set service
pub const SET_SERVICE_NAME: &str = "dgrid:impl:setService";

// -
// Portable factory / class ids

pub const MAP_PORTABLE_FACTORY_ID: i32 = -10;
pub const MAP_GET_ENTRY_VIEW_CLASS_ID: i32 = 27;

pub const COLLECTION_PORTABLE_FACTORY_ID: i32 = -20;
pub const COLLECTION_ADD_LISTENER_CLASS_ID: i32 = 7;
pub const COLLECTION_REMOVE_LISTENER_CLASS_ID: i32 = 8;

pub const SPI_PORTABLE_FACTORY_ID: i32 = -1;
pub const ITEM_EVENT_CLASS_ID: i32 = 3;

// -
// Portable field names

pub(crate) const FIELD_NAME: &str = "n";
pub(crate) const FIELD_INCLUDE_VALUE: &str = "i";
pub(crate) const FIELD_SERVICE_NAME: &str = "s";
pub(crate) const FIELD_LOCAL_ONLY: &str = "lo";
pub(crate) const FIELD_THREAD_ID: &str = "threadId";
pub(crate) const FIELD_REGISTRATION_ID: &str = "r";
pub(crate) const FIELD_EVENT_TYPE: &str = "e";
pub(crate) const FIELD_MEMBER_UUID: &str = "u";
pub(crate) const FIELD_HAS_ITEM: &str = "hi";

// -
// Record bookkeeping

/// Fixed per-record overhead added to key and value sizes when estimating cost
pub(crate) const RECORD_OVERHEAD_BYTES: u64 = 80;
