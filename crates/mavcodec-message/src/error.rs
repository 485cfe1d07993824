use mavcodec_frame::FrameError;
use mavcodec_schema::CatalogError;

/// Errors that can occur while encoding or decoding one message.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// The catalog has no definition for the requested name or id.
    #[error("unknown message {0}")]
    UnknownMessage(String),

    /// A field uses a type name outside the scalar table.
    #[error("message {message}: field {field} has unsupported type {type_name:?}")]
    UnsupportedFieldType {
        message: String,
        field: String,
        type_name: String,
    },

    /// The payload is shorter than the definition requires.
    #[error("message {message}: payload truncated (expected {expected} bytes, got {actual})")]
    TruncatedPayload {
        message: String,
        expected: usize,
        actual: usize,
    },

    /// The packed payload would not fit in one frame.
    #[error("message {message}: payload too large ({size} bytes, max {max})")]
    PayloadTooLarge {
        message: String,
        size: usize,
        max: usize,
    },

    /// A supplied value cannot be represented in its field.
    #[error("message {message}: invalid value for {field}: {reason}")]
    InvalidValue {
        message: String,
        field: String,
        reason: String,
    },

    /// Frame construction or transport failed.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// A definition could not be interpreted.
    #[error(transparent)]
    Catalog(CatalogError),
}

impl From<CatalogError> for MessageError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::UnsupportedFieldType {
                message,
                field,
                type_name,
            } => MessageError::UnsupportedFieldType {
                message,
                field,
                type_name,
            },
            other => MessageError::Catalog(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, MessageError>;
