/// Errors that can occur while building or loading a message catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A catalog file or directory could not be loaded.
    #[error("failed to load catalog: {0}")]
    LoadFailed(String),

    /// The catalog document is not valid JSON or does not match the format.
    #[error("catalog is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A field uses a type name outside the scalar table.
    #[error("message {message}: field {field} has unsupported type {type_name:?}")]
    UnsupportedFieldType {
        message: String,
        field: String,
        type_name: String,
    },

    /// Two messages share an id or a name.
    #[error("duplicate message {name} (id {id})")]
    DuplicateMessage { id: u32, name: String },

    /// A definition violates a structural rule (id width, payload size, ...).
    #[error("invalid definition for {message}: {reason}")]
    InvalidDefinition { message: String, reason: String },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
