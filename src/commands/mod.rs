//! Command catalogue, payload codecs, and shared value types.
//!
//! Provides:
//! - [`registry`] - the static command catalogue with by-id/by-name lookup
//! - [`types`] - decoded payload structs
//! - [`position`] - the shared position/velocity value codec

mod decode;
mod params;
mod table;

pub mod position;
pub mod registry;
pub mod types;

pub use position::{Position, Velocity};
pub use registry::{by_id, by_name, CommandDescriptor, Role};
pub use table::ERROR_NTF;
pub use types::CommandData;
