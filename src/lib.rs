//! # klf200
//!
//! Async client for the Velux KLF 200 gateway, which bridges an IP
//! network to the io-homecontrol® radio bus driving roller shutters,
//! window openers, awnings, and lights.
//!
//! ## Architecture
//!
//! - **Transport**: TLS on port 51200, certificate verification
//!   disabled, SHA-256 fingerprint exposed for out-of-band pinning
//! - **Framing**: SLIP (RFC 1055) around a checksummed transport frame
//! - **Engine**: one ordered byte stream demultiplexed into
//!   confirmations, per-session notifications, and broadcasts,
//!   correlated back to the requests that initiated them
//!
//! ## Example
//!
//! ```ignore
//! use klf200::{Config, Connection};
//!
//! #[tokio::main]
//! async fn main() -> klf200::Result<()> {
//!     let connection = Connection::connect(Config::new("192.168.1.20", "velux123")).await?;
//!
//!     let nodes = connection
//!         .request("GW_GET_ALL_NODES_INFORMATION_REQ", serde_json::Value::Null)
//!         .await?;
//!     println!("{}", serde_json::to_string_pretty(&nodes).unwrap());
//!
//!     connection.disconnect().await;
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod error;
pub mod events;
pub mod protocol;
pub mod session;
pub mod slip;
pub mod transport;

mod connection;

pub use commands::types::CommandData;
pub use commands::{Position, Velocity};
pub use connection::{Config, Connection, State, DEFAULT_PORT};
pub use error::{Error, GatewayError, Result};
pub use events::{Event, Notification, Peer};
pub use session::RequestInfo;
