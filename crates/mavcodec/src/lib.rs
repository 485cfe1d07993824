//! MAVLink v2 codec driven by runtime-loaded message catalogs.
//!
//! # Crate Structure
//!
//! - [`frame`]: CRC, frame building and stream resynchronization
//! - [`schema`]: message catalog, type table and CRC-extra computation
//! - [`message`]: payload codec, dispatch and message streams
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mavcodec::message::StreamDecoder;
//! use mavcodec::schema::Catalog;
//!
//! let catalog = Arc::new(Catalog::from_path("common.json".as_ref()).unwrap());
//! let mut decoder = StreamDecoder::new(catalog);
//! for msg in decoder.feed(&[0xFD, 0x09]) {
//!     println!("{:?} {:?}", msg.name, msg.status);
//! }
//! ```

/// Re-export frame types.
pub mod frame {
    pub use mavcodec_frame::*;
}

/// Re-export catalog types.
pub mod schema {
    pub use mavcodec_schema::*;
}

/// Re-export message types.
pub mod message {
    pub use mavcodec_message::*;
}
