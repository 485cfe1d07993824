use std::fmt;
use std::io;

use mavcodec_frame::FrameError;
use mavcodec_message::MessageError;
use mavcodec_schema::CatalogError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
/// A decoded frame failed its checksum or payload decode.
pub const INTEGRITY_FAILED: i32 = 2;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const CONFIG_INVALID: i32 = 78;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => USAGE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::ConnectionClosed => CliError::new(FAILURE, format!("{context}: {err}")),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn catalog_error(context: &str, err: CatalogError) -> CliError {
    CliError::new(CONFIG_INVALID, format!("{context}: {err}"))
}

pub fn message_error(context: &str, err: MessageError) -> CliError {
    match err {
        MessageError::Frame(err) => frame_error(context, err),
        MessageError::UnknownMessage(_) => CliError::new(USAGE, format!("{context}: {err}")),
        MessageError::Catalog(err) => catalog_error(context, err),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}
