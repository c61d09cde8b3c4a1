//! # irbis-client
//!
//! Async client for the IRBIS64 library automation server.
//!
//! This crate provides:
//! - Connection management with the one-socket-per-request dispatch the
//!   server expects
//! - Client registration with automatic re-registration while the drawn
//!   client id is taken
//! - High-level operations over records, the search dictionary, server
//!   files and server administration

pub mod client;
pub mod connection;
pub mod error;
pub mod params;

pub use client::{Client, DEFAULT_DATABASE_LIST};
pub use connection::{Connection, ConnectionConfig};
pub use error::ClientError;
pub use params::{PostingParameters, SearchParameters, TableDefinition, TermParameters};
