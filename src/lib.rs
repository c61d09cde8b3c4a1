//! # irbis
//!
//! Client for the IRBIS64 library automation system.
//!
//! This facade re-exports the member crates:
//! - [`protocol`] — the wire protocol: query encoding, response
//!   decoding, return codes, text encodings
//! - [`records`] — the structured-text codecs: bibliographic records,
//!   INI and menu files, server descriptors
//! - [`client`] — the async client with the high-level operations
//!
//! ```no_run
//! use irbis::client::{Client, ConnectionConfig};
//!
//! # async fn run() -> Result<(), irbis::client::ClientError> {
//! let config = ConnectionConfig::new()
//!     .with_host("irbis.example.org")
//!     .with_credentials("librarian", "secret")
//!     .with_database("IBIS");
//! let mut client = Client::new(config);
//! client.connect().await?;
//!
//! let record = client.read_record(123).await?;
//! println!("title: {:?}", record.fm_subfield(200, 'a'));
//!
//! client.disconnect().await?;
//! # Ok(())
//! # }
//! ```

pub use irbis_client as client;
pub use irbis_protocol as protocol;
pub use irbis_records as records;

pub use irbis_client::{Client, ClientError, ConnectionConfig};
pub use irbis_records::Record;
