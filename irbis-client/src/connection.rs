//! Connection management.
//!
//! The server speaks one request per TCP connection: the client opens a
//! socket, writes the whole packet, reads the whole response to EOF and
//! the socket is done. What persists between calls is the registration
//! on the server side, keyed by the client id negotiated at connect
//! time, and the query sequence number echoed back in every response.

use crate::error::ClientError;
use bytes::Bytes;
use irbis_protocol::{ClientIdentity, Query, Response, ServerError, DEFAULT_PORT};
use rand::Rng;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// The server answers connect with this code while the client id is
/// still registered; the client retries with a fresh id.
const CLIENT_ALREADY_REGISTERED: i32 = -3337;

/// Connection configuration.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Server host name or address.
    pub host: String,
    /// Server port.
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Database addressed by default.
    pub database: String,
    /// Workstation (ARM) code.
    pub workstation: String,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Request timeout.
    pub request_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            username: String::new(),
            password: String::new(),
            database: "IBIS".to_string(),
            workstation: "C".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ConnectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_workstation(mut self, workstation: impl Into<String>) -> Self {
        self.workstation = workstation.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Parses a `key=value;...` connection string. Key aliases follow the
    /// established client conventions; an unknown key is an error.
    pub fn from_connection_string(text: &str) -> Result<Self, ClientError> {
        let mut config = Self::default();

        for item in text.split(';') {
            if item.trim().is_empty() {
                continue;
            }

            let (name, value) = item
                .split_once('=')
                .ok_or_else(|| ClientError::ConnectionString(item.to_string()))?;
            let value = value.trim();

            match name.trim().to_ascii_lowercase().as_str() {
                "host" | "server" | "address" => config.host = value.to_string(),
                "port" => {
                    config.port = value
                        .parse()
                        .map_err(|_| ClientError::ConnectionString(item.to_string()))?;
                }
                "user" | "username" | "name" | "login" => config.username = value.to_string(),
                "pwd" | "password" => config.password = value.to_string(),
                "db" | "database" | "catalog" => config.database = value.to_string(),
                "arm" | "workstation" => config.workstation = value.to_string(),
                "debug" => {}
                _ => return Err(ClientError::ConnectionString(item.to_string())),
            }
        }

        Ok(config)
    }

    /// Renders the canonical connection string for this configuration.
    pub fn to_connection_string(&self) -> String {
        format!(
            "host={};port={};username={};password={};database={};arm={};",
            self.host, self.port, self.username, self.password, self.database, self.workstation
        )
    }
}

/// A registration on an IRBIS64 server.
///
/// One request in flight at a time; methods take `&mut self` and
/// concurrent use is the caller's responsibility.
pub struct Connection {
    config: ConnectionConfig,
    identity: ClientIdentity,
    connected: bool,
}

impl Connection {
    /// Creates a new connection (not yet registered on the server).
    pub fn new(config: ConnectionConfig) -> Self {
        let identity = ClientIdentity {
            workstation: config.workstation.clone(),
            client_id: 0,
            query_id: 0,
            username: config.username.clone(),
            password: config.password.clone(),
        };

        Self {
            config,
            identity,
            connected: false,
        }
    }

    /// The connection configuration.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// The database addressed by default.
    pub fn database(&self) -> &str {
        &self.config.database
    }

    /// Switches the database addressed by default.
    pub fn set_database(&mut self, database: impl Into<String>) {
        self.config.database = database.into();
    }

    /// Whether the client is registered on the server.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Starts a query for the given command under the current identity.
    pub fn new_query(&self, command: &str) -> Query {
        Query::new(&self.identity, command)
    }

    /// Fails unless the client is registered on the server.
    pub fn require_connected(&self) -> Result<(), ClientError> {
        if self.connected {
            Ok(())
        } else {
            Err(ClientError::NotConnected)
        }
    }

    /// Registers the client on the server.
    ///
    /// A fresh random client id is drawn and the query sequence reset.
    /// While the server reports the id as taken, a new one is drawn and
    /// the registration repeated.
    pub async fn connect(&mut self) -> Result<(), ClientError> {
        if self.connected {
            return Ok(());
        }

        loop {
            self.identity.client_id = rand::thread_rng().gen_range(100_000..900_000);
            self.identity.query_id = 1;
            tracing::debug!(client_id = self.identity.client_id, "registering client");

            let mut query = self.new_query("A");
            query.add_ansi(&self.identity.username).new_line();
            query.add_ansi(&self.identity.password);

            let mut response = self.execute(&query).await?;
            let code = response.read_return_code();
            if code == CLIENT_ALREADY_REGISTERED {
                tracing::debug!("client id taken, drawing a new one");
                continue;
            }
            if code < 0 {
                return Err(ServerError::new(code).into());
            }

            self.connected = true;
            tracing::debug!(client_id = self.identity.client_id, "client registered");
            return Ok(());
        }
    }

    /// Unregisters the client from the server.
    pub async fn disconnect(&mut self) -> Result<(), ClientError> {
        if !self.connected {
            return Ok(());
        }

        let mut query = self.new_query("B");
        query.add_ansi(&self.identity.username);
        self.execute(&query).await?;
        self.connected = false;
        tracing::debug!("client unregistered");

        Ok(())
    }

    /// Dispatches one query: opens a socket, writes the packet, reads
    /// the full response.
    ///
    /// The query sequence number advances exactly once per dispatched
    /// call, including calls the server answers with an error code.
    pub async fn execute(&mut self, query: &Query) -> Result<Response, ClientError> {
        let packet = query.encode();
        tracing::debug!(
            host = %self.config.host,
            port = self.config.port,
            bytes = packet.len(),
            "dispatching query"
        );

        let mut stream = tokio::time::timeout(
            self.config.connect_timeout,
            TcpStream::connect((self.config.host.as_str(), self.config.port)),
        )
        .await
        .map_err(|_| ClientError::Timeout)??;
        stream.set_nodelay(true).ok();

        stream.write_all(&packet).await?;

        let mut buffer = Vec::new();
        tokio::time::timeout(
            self.config.request_timeout,
            stream.read_to_end(&mut buffer),
        )
        .await
        .map_err(|_| ClientError::Timeout)??;

        self.identity.query_id += 1;

        if buffer.is_empty() {
            tracing::debug!("server closed the socket without a response");
            return Err(ClientError::ConnectionClosed);
        }

        tracing::debug!(bytes = buffer.len(), "response received");
        Ok(Response::decode(Bytes::from(buffer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ConnectionConfig::new();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.database, "IBIS");
        assert_eq!(config.workstation, "C");
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_connection_string_aliases() {
        let config = ConnectionConfig::from_connection_string(
            "server=irbis.local; port=5555; login=reader; pwd=s3cret; catalog=RDR; arm=R;",
        )
        .unwrap();
        assert_eq!(config.host, "irbis.local");
        assert_eq!(config.port, 5555);
        assert_eq!(config.username, "reader");
        assert_eq!(config.password, "s3cret");
        assert_eq!(config.database, "RDR");
        assert_eq!(config.workstation, "R");
    }

    #[test]
    fn test_connection_string_round_trip() {
        let text = "host=h;port=7777;username=u;password=p;database=DB;arm=C;";
        let config = ConnectionConfig::from_connection_string(text).unwrap();
        assert_eq!(config.to_connection_string(), text);
    }

    #[test]
    fn test_connection_string_unknown_key() {
        let err = ConnectionConfig::from_connection_string("host=h;bogus=1;").unwrap_err();
        assert!(matches!(err, ClientError::ConnectionString(_)));
    }

    #[test]
    fn test_connection_string_missing_equals() {
        let err = ConnectionConfig::from_connection_string("host").unwrap_err();
        assert!(matches!(err, ClientError::ConnectionString(_)));
    }

    #[test]
    fn test_connection_string_bad_port() {
        let err = ConnectionConfig::from_connection_string("port=lots;").unwrap_err();
        assert!(matches!(err, ClientError::ConnectionString(_)));
    }

    #[test]
    fn test_new_connection_is_disconnected() {
        let conn = Connection::new(ConnectionConfig::new());
        assert!(!conn.is_connected());
        assert!(matches!(
            conn.require_connected(),
            Err(ClientError::NotConnected)
        ));
    }
}
