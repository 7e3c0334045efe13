// Reference table of location moves and the loader that builds it

pub mod error;
pub mod loader;
pub mod record;

pub use error::TableError;
pub use loader::{
    cached_table, load_table, parse_quantity, TableLoader, TableSource, DEFAULT_DELIMITER,
    DEFAULT_HEADER_MARKERS,
};
pub use record::{LocationRecord, LocationTable, TableOrigin};
