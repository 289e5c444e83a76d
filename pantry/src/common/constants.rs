// doc constants
pub const DOC_ID: &str = "id";
pub const DOC_CREATED_AT: &str = "createdAt";
pub const DOC_UPDATED_AT: &str = "updatedAt";

// collection constants
pub const MENU_ITEMS: &str = "menu_items";
pub const CART_ITEMS: &str = "cart_items";
pub const ORDERS: &str = "orders";
pub const CUSTOMERS: &str = "customers";
pub const DEFAULT_COLLECTIONS: [&str; 4] = [MENU_ITEMS, CART_ITEMS, ORDERS, CUSTOMERS];

// store constants
pub const DEFAULT_DATA_DIR: &str = "data";
pub const COLLECTION_FILE_EXTENSION: &str = "json";
pub const TEMP_FILE_EXTENSION: &str = "json.tmp";
pub const FIRST_ID: u64 = 1;
// the `id` field is an i64
pub const MAX_ID: u64 = i64::MAX as u64;

pub const PANTRY_VERSION: &str = env!("CARGO_PKG_VERSION");
