//! MAVLink message catalog.
//!
//! A [`Catalog`] maps message ids and names to their field layouts, CRC
//! extras and enums. Dialects are loaded at runtime from JSON documents,
//! so new messages need no code generation.

pub mod catalog;
pub mod config;
pub mod definition;
pub mod error;
pub mod types;

pub use catalog::Catalog;
pub use config::CatalogConfig;
pub use definition::{
    compute_crc_extra, EnumDefinition, EnumEntry, FieldDefinition, MessageDefinition,
};
pub use error::{CatalogError, Result};
pub use types::{field_size, parse_type_spec, type_width, FieldType};
