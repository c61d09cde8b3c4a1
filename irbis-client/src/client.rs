//! High-level client API.

use crate::connection::{Connection, ConnectionConfig};
use crate::error::ClientError;
use crate::params::{PostingParameters, SearchParameters, TableDefinition, TermParameters};
use irbis_protocol::text::{irbis_to_dos, irbis_to_lines, prepare_format};
use irbis_protocol::{Encoding, READ_RECORD_CODES, READ_TERM_CODES};
use irbis_records::{
    DatabaseInfo, FoundLine, IniFile, MenuFile, ProcessInfo, RawRecord, Record, SearchScenario,
    ServerStat, TermInfo, TermPosting, UserInfo, VersionInfo, LOGICALLY_DELETED,
};

/// Menu file listing the databases visible to readers.
pub const DEFAULT_DATABASE_LIST: &str = "1..dbnam2.mnu";

/// High-level client for an IRBIS64 server.
pub struct Client {
    conn: Connection,
}

impl Client {
    /// Creates a new client with the given configuration.
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            conn: Connection::new(config),
        }
    }

    /// Creates a new client from a `key=value;...` connection string.
    pub fn from_connection_string(text: &str) -> Result<Self, ClientError> {
        Ok(Self::new(ConnectionConfig::from_connection_string(text)?))
    }

    /// Registers the client on the server.
    pub async fn connect(&mut self) -> Result<(), ClientError> {
        self.conn.connect().await
    }

    /// Unregisters the client from the server.
    pub async fn disconnect(&mut self) -> Result<(), ClientError> {
        self.conn.disconnect().await
    }

    /// Whether the client is registered on the server.
    pub fn is_connected(&self) -> bool {
        self.conn.is_connected()
    }

    /// The database addressed by default.
    pub fn database(&self) -> &str {
        self.conn.database()
    }

    /// Switches the database addressed by default.
    pub fn set_database(&mut self, database: impl Into<String>) {
        self.conn.set_database(database);
    }

    fn pick_database(&self, database: &str) -> String {
        if database.is_empty() {
            self.conn.database().to_string()
        } else {
            database.to_string()
        }
    }

    // =========================================================================
    // Session upkeep
    // =========================================================================

    /// Empty operation, confirming the registration to the server.
    pub async fn no_op(&mut self) -> Result<(), ClientError> {
        self.conn.require_connected()?;
        let query = self.conn.new_query("N");
        self.conn.execute(&query).await?;
        Ok(())
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Reads the record with the given MFN from the current database.
    pub async fn read_record(&mut self, mfn: u32) -> Result<Record, ClientError> {
        self.conn.require_connected()?;
        let database = self.conn.database().to_string();

        let mut query = self.conn.new_query("C");
        query.add_ansi(&database).new_line();
        query.add(mfn as i64).new_line();
        let mut response = self.conn.execute(&query).await?;
        response.check_return_code(&READ_RECORD_CODES)?;

        let lines = response.read_remaining_lines(Encoding::Utf);
        let mut record = Record::decode(&lines)?;
        record.database = database;

        Ok(record)
    }

    /// Reads the record with the given MFN, keeping the fields unparsed.
    pub async fn read_raw_record(&mut self, mfn: u32) -> Result<RawRecord, ClientError> {
        self.conn.require_connected()?;
        let database = self.conn.database().to_string();

        let mut query = self.conn.new_query("C");
        query.add_ansi(&database).new_line();
        query.add(mfn as i64).new_line();
        let mut response = self.conn.execute(&query).await?;
        response.check_return_code(&READ_RECORD_CODES)?;

        let lines = response.read_remaining_lines(Encoding::Utf);
        let mut record = RawRecord::decode(&lines)?;
        record.database = database;

        Ok(record)
    }

    /// Saves a record, new or previously read, returning the database's
    /// new maximum MFN.
    pub async fn write_record(
        &mut self,
        record: &Record,
        lock: bool,
        actualize: bool,
    ) -> Result<u32, ClientError> {
        self.conn.require_connected()?;
        let database = self.pick_database(&record.database);

        let mut query = self.conn.new_query("D");
        query.add_ansi(&database).new_line();
        query.add(lock as i64).new_line();
        query.add(actualize as i64).new_line();
        query.add_utf(&record.encode());
        let mut response = self.conn.execute(&query).await?;
        response.check_return_code(&[])?;

        Ok(response.return_code() as u32)
    }

    /// Marks the record with the given MFN as logically deleted.
    pub async fn delete_record(&mut self, mfn: u32) -> Result<(), ClientError> {
        let mut record = self.read_record(mfn).await?;
        record.status |= LOGICALLY_DELETED;
        self.write_record(&record, false, true).await?;
        Ok(())
    }

    /// Rebuilds the dictionary entries of one record.
    pub async fn actualize_record(
        &mut self,
        database: &str,
        mfn: u32,
    ) -> Result<(), ClientError> {
        self.conn.require_connected()?;
        let database = self.pick_database(database);

        let mut query = self.conn.new_query("F");
        query.add_ansi(&database).new_line();
        query.add(mfn as i64).new_line();
        let mut response = self.conn.execute(&query).await?;
        response.check_return_code(&[])?;

        Ok(())
    }

    /// Formats the record with the given MFN.
    pub async fn format_record(&mut self, format: &str, mfn: u32) -> Result<String, ClientError> {
        self.conn.require_connected()?;
        let database = self.conn.database().to_string();

        let mut query = self.conn.new_query("G");
        query.add_ansi(&database).new_line();
        query.add_ansi(&prepare_format(format)).new_line();
        query.add(1).new_line();
        query.add(mfn as i64).new_line();
        let mut response = self.conn.execute(&query).await?;
        response.check_return_code(&[])?;

        Ok(response.read_remaining_text(Encoding::Utf))
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Searches the current database's dictionary.
    pub async fn search(&mut self, expression: &str) -> Result<Vec<FoundLine>, ClientError> {
        let (_, found) = self
            .search_ex(&SearchParameters::expression(expression))
            .await?;
        Ok(found)
    }

    /// Searches with full parameters, returning the total number of
    /// matching records alongside the requested window of hits.
    pub async fn search_ex(
        &mut self,
        parameters: &SearchParameters,
    ) -> Result<(u32, Vec<FoundLine>), ClientError> {
        self.conn.require_connected()?;
        let database = self.pick_database(&parameters.database);

        let mut query = self.conn.new_query("K");
        query.add_ansi(&database).new_line();
        query.add_utf(&parameters.expression).new_line();
        query.add(parameters.number_of_records as i64).new_line();
        query.add(parameters.first_record as i64).new_line();
        query.add_ansi(&prepare_format(&parameters.format)).new_line();
        query.add(parameters.min_mfn as i64).new_line();
        query.add(parameters.max_mfn as i64).new_line();
        query.add_ansi(&parameters.sequential).new_line();
        let mut response = self.conn.execute(&query).await?;
        response.check_return_code(&[])?;

        let total = response.read_integer().max(0) as u32;
        let lines = response.read_remaining_lines(Encoding::Utf);
        Ok((total, FoundLine::parse(&lines)))
    }

    /// Lists dictionary terms starting at the given one.
    pub async fn read_terms(
        &mut self,
        start_term: &str,
        number_of_terms: u32,
    ) -> Result<Vec<TermInfo>, ClientError> {
        self.read_terms_ex(&TermParameters {
            start_term: start_term.to_string(),
            number_of_terms,
            ..TermParameters::default()
        })
        .await
    }

    /// Lists dictionary terms with full parameters.
    pub async fn read_terms_ex(
        &mut self,
        parameters: &TermParameters,
    ) -> Result<Vec<TermInfo>, ClientError> {
        self.conn.require_connected()?;
        let database = self.pick_database(&parameters.database);
        let command = if parameters.reverse_order { "P" } else { "H" };

        let mut query = self.conn.new_query(command);
        query.add_ansi(&database).new_line();
        query.add_utf(&parameters.start_term).new_line();
        query.add(parameters.number_of_terms as i64).new_line();
        query.add_ansi(&parameters.format).new_line();
        let mut response = self.conn.execute(&query).await?;
        response.check_return_code(&READ_TERM_CODES)?;

        let lines = response.read_remaining_lines(Encoding::Utf);
        Ok(TermInfo::parse(&lines))
    }

    /// Reads postings from the search index.
    pub async fn read_postings(
        &mut self,
        parameters: &PostingParameters,
    ) -> Result<Vec<TermPosting>, ClientError> {
        self.conn.require_connected()?;
        let database = self.pick_database(&parameters.database);

        let mut query = self.conn.new_query("I");
        query.add_ansi(&database).new_line();
        query.add(parameters.number_of_postings as i64).new_line();
        query.add(parameters.first_posting as i64).new_line();
        query.add_ansi(&parameters.format).new_line();
        if parameters.list_of_terms.is_empty() {
            query.add_utf(&parameters.term).new_line();
        } else {
            for term in &parameters.list_of_terms {
                query.add_utf(term).new_line();
            }
        }
        let mut response = self.conn.execute(&query).await?;
        response.check_return_code(&READ_TERM_CODES)?;

        let lines = response.read_remaining_lines(Encoding::Utf);
        Ok(TermPosting::parse(&lines))
    }

    // =========================================================================
    // Server files
    // =========================================================================

    /// Reads a text file from the server.
    ///
    /// The whole file arrives as a single line with the field delimiter
    /// standing in for line breaks; the result has real ones.
    pub async fn read_text_file(&mut self, specification: &str) -> Result<String, ClientError> {
        self.conn.require_connected()?;

        let mut query = self.conn.new_query("L");
        query.add_ansi(specification).new_line();
        let mut response = self.conn.execute(&query).await?;

        Ok(irbis_to_dos(&response.read_ansi()))
    }

    /// Reads and parses an INI file from the server.
    pub async fn read_ini_file(&mut self, specification: &str) -> Result<IniFile, ClientError> {
        let text = self.read_text_file(specification).await?;
        let lines: Vec<&str> = text.lines().collect();
        Ok(IniFile::parse(&lines))
    }

    /// Reads and parses a menu file from the server.
    pub async fn read_menu_file(&mut self, specification: &str) -> Result<MenuFile, ClientError> {
        let text = self.read_text_file(specification).await?;
        let lines: Vec<&str> = text.lines().collect();
        Ok(MenuFile::parse(&lines))
    }

    /// Reads the search scenarios from a workstation INI file.
    pub async fn read_search_scenario(
        &mut self,
        specification: &str,
    ) -> Result<Vec<SearchScenario>, ClientError> {
        let ini = self.read_ini_file(specification).await?;
        Ok(SearchScenario::parse(&ini))
    }

    /// Lists server files matching a specification.
    pub async fn list_files(&mut self, specification: &str) -> Result<Vec<String>, ClientError> {
        self.conn.require_connected()?;

        let mut query = self.conn.new_query("!");
        query.add_ansi(specification).new_line();
        let mut response = self.conn.execute(&query).await?;

        let mut result = Vec::new();
        for line in response.read_remaining_lines(Encoding::Ansi) {
            for file in irbis_to_lines(&line) {
                if !file.is_empty() {
                    result.push(file.to_string());
                }
            }
        }

        Ok(result)
    }

    /// Lists the databases named by a database menu file.
    pub async fn list_databases(
        &mut self,
        specification: &str,
    ) -> Result<Vec<DatabaseInfo>, ClientError> {
        let menu = self.read_menu_file(specification).await?;
        Ok(DatabaseInfo::parse_menu(&menu))
    }

    // =========================================================================
    // Server state
    // =========================================================================

    /// The maximum MFN of a database, the current one when empty.
    pub async fn get_max_mfn(&mut self, database: &str) -> Result<u32, ClientError> {
        self.conn.require_connected()?;
        let database = self.pick_database(database);

        let mut query = self.conn.new_query("O");
        query.add_ansi(&database);
        let mut response = self.conn.execute(&query).await?;
        response.check_return_code(&[])?;

        Ok(response.return_code() as u32)
    }

    /// The summary of a database, the current one when empty.
    pub async fn get_database_info(
        &mut self,
        database: &str,
    ) -> Result<DatabaseInfo, ClientError> {
        self.conn.require_connected()?;
        let database = self.pick_database(database);

        let mut query = self.conn.new_query("0");
        query.add_ansi(&database);
        let mut response = self.conn.execute(&query).await?;
        response.check_return_code(&[])?;

        let lines = response.read_remaining_lines(Encoding::Ansi);
        let mut info = DatabaseInfo::parse(&lines);
        info.name = database;

        Ok(info)
    }

    /// The server version and connection limits.
    pub async fn get_server_version(&mut self) -> Result<VersionInfo, ClientError> {
        self.conn.require_connected()?;

        let query = self.conn.new_query("1");
        let mut response = self.conn.execute(&query).await?;
        response.check_return_code(&[])?;

        let lines = response.read_remaining_lines(Encoding::Ansi);
        Ok(VersionInfo::parse(&lines))
    }

    /// The server work statistics.
    pub async fn get_server_stat(&mut self) -> Result<ServerStat, ClientError> {
        self.conn.require_connected()?;

        let query = self.conn.new_query("+1");
        let mut response = self.conn.execute(&query).await?;
        response.check_return_code(&[])?;

        let lines = response.read_remaining_lines(Encoding::Ansi);
        Ok(ServerStat::parse(&lines))
    }

    /// The processes running on the server.
    pub async fn list_processes(&mut self) -> Result<Vec<ProcessInfo>, ClientError> {
        self.conn.require_connected()?;

        let query = self.conn.new_query("+3");
        let mut response = self.conn.execute(&query).await?;
        response.check_return_code(&[])?;

        let lines = response.read_remaining_lines(Encoding::Ansi);
        Ok(ProcessInfo::parse(&lines))
    }

    /// The users registered on the server.
    pub async fn get_user_list(&mut self) -> Result<Vec<UserInfo>, ClientError> {
        self.conn.require_connected()?;

        let query = self.conn.new_query("+9");
        let mut response = self.conn.execute(&query).await?;
        response.check_return_code(&[])?;

        let lines = response.read_remaining_lines(Encoding::Ansi);
        Ok(UserInfo::parse(&lines))
    }

    /// Replaces the user list on the server.
    pub async fn update_user_list(&mut self, users: &[UserInfo]) -> Result<(), ClientError> {
        self.conn.require_connected()?;

        let mut query = self.conn.new_query("+7");
        for user in users {
            query.add_ansi(&user.encode()).new_line();
        }
        self.conn.execute(&query).await?;

        Ok(())
    }

    /// Pushes changed lines of the current user's server INI file.
    pub async fn update_ini_file(&mut self, lines: &[String]) -> Result<(), ClientError> {
        self.conn.require_connected()?;

        let mut query = self.conn.new_query("8");
        for line in lines {
            query.add_ansi(line).new_line();
        }
        self.conn.execute(&query).await?;

        Ok(())
    }

    /// Lays out a table over the selected records.
    pub async fn print_table(
        &mut self,
        definition: &TableDefinition,
    ) -> Result<String, ClientError> {
        self.conn.require_connected()?;
        let database = self.pick_database(&definition.database);

        let mut query = self.conn.new_query("7");
        query.add_ansi(&database).new_line();
        query.add_ansi(&definition.table).new_line();
        query.add_ansi("").new_line(); // in place of headers
        query.add_ansi(&definition.mode).new_line();
        query.add_ansi(&definition.search_query).new_line();
        query.add(definition.min_mfn as i64).new_line();
        query.add(definition.max_mfn as i64).new_line();
        query.add_utf(&definition.sequential_query).new_line();
        query.add_ansi(""); // in place of an MFN list
        let mut response = self.conn.execute(&query).await?;

        Ok(response.read_remaining_text(Encoding::Utf))
    }

    // =========================================================================
    // Database maintenance
    // =========================================================================

    /// Creates a database.
    pub async fn create_database(
        &mut self,
        database: &str,
        description: &str,
        reader_access: bool,
    ) -> Result<(), ClientError> {
        self.conn.require_connected()?;

        let mut query = self.conn.new_query("T");
        query.add_ansi(database).new_line();
        query.add_ansi(description).new_line();
        query.add(reader_access as i64).new_line();
        let mut response = self.conn.execute(&query).await?;
        response.check_return_code(&[])?;

        Ok(())
    }

    /// Creates the dictionary of a database.
    pub async fn create_dictionary(&mut self, database: &str) -> Result<(), ClientError> {
        self.conn.require_connected()?;

        let mut query = self.conn.new_query("Z");
        query.add_ansi(database).new_line();
        let mut response = self.conn.execute(&query).await?;
        response.check_return_code(&[])?;

        Ok(())
    }

    /// Deletes a database.
    pub async fn delete_database(&mut self, database: &str) -> Result<(), ClientError> {
        self.conn.require_connected()?;

        let mut query = self.conn.new_query("W");
        query.add_ansi(database).new_line();
        let mut response = self.conn.execute(&query).await?;
        response.check_return_code(&[])?;

        Ok(())
    }

    /// Rebuilds the dictionary of a database from scratch.
    pub async fn reload_dictionary(&mut self, database: &str) -> Result<(), ClientError> {
        self.fire_with_database("Y", database).await
    }

    /// Rebuilds the master file of a database from scratch.
    pub async fn reload_master_file(&mut self, database: &str) -> Result<(), ClientError> {
        self.fire_with_database("X", database).await
    }

    /// Restarts the server without losing registered clients.
    pub async fn restart_server(&mut self) -> Result<(), ClientError> {
        self.conn.require_connected()?;
        let query = self.conn.new_query("+8");
        self.conn.execute(&query).await?;
        Ok(())
    }

    /// Removes every record of a database.
    pub async fn truncate_database(&mut self, database: &str) -> Result<(), ClientError> {
        self.fire_with_database("S", database).await
    }

    /// Releases the exclusive lock on a database.
    pub async fn unlock_database(&mut self, database: &str) -> Result<(), ClientError> {
        self.fire_with_database("U", database).await
    }

    /// Releases the edit locks on the listed records.
    pub async fn unlock_records(
        &mut self,
        database: &str,
        mfn_list: &[u32],
    ) -> Result<(), ClientError> {
        self.conn.require_connected()?;
        let database = self.pick_database(database);

        let mut query = self.conn.new_query("Q");
        query.add_ansi(&database).new_line();
        for mfn in mfn_list {
            query.add(*mfn as i64).new_line();
        }
        self.conn.execute(&query).await?;

        Ok(())
    }

    /// Dispatches a database-scoped command whose outcome the server
    /// does not report.
    async fn fire_with_database(
        &mut self,
        command: &str,
        database: &str,
    ) -> Result<(), ClientError> {
        self.conn.require_connected()?;

        let mut query = self.conn.new_query(command);
        query.add_ansi(database).new_line();
        self.conn.execute(&query).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Assembles one raw response: header, then payload lines.
    fn response(payload: &[&str]) -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend_from_slice(b"A\r\n"); // command echo
        raw.extend_from_slice(b"123456\r\n"); // client id
        raw.extend_from_slice(b"1\r\n"); // query id
        for _ in 0..7 {
            raw.extend_from_slice(b"\r\n"); // reserved
        }
        for line in payload {
            raw.extend_from_slice(line.as_bytes());
            raw.extend_from_slice(b"\r\n");
        }
        raw
    }

    /// Serves one scripted response per accepted connection, in order.
    async fn mock_server(responses: Vec<Vec<u8>>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            for body in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = [0u8; 8192];
                let _ = socket.read(&mut buf).await;
                socket.write_all(&body).await.unwrap();
            }
        });
        addr
    }

    async fn client_for(addr: SocketAddr) -> Client {
        let config = ConnectionConfig::new()
            .with_host(addr.ip().to_string())
            .with_port(addr.port())
            .with_credentials("librarian", "secret");
        Client::new(config)
    }

    #[tokio::test]
    async fn test_connect_noop_disconnect() {
        let addr = mock_server(vec![
            response(&["0"]),
            response(&["0"]),
            response(&["0"]),
        ])
        .await;

        let mut client = client_for(addr).await;
        client.connect().await.unwrap();
        assert!(client.is_connected());
        client.no_op().await.unwrap();
        client.disconnect().await.unwrap();
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_connect_retries_taken_client_id() {
        let addr = mock_server(vec![response(&["-3337"]), response(&["0"])]).await;

        let mut client = client_for(addr).await;
        client.connect().await.unwrap();
        assert!(client.is_connected());
    }

    #[tokio::test]
    async fn test_connect_rejected() {
        let addr = mock_server(vec![response(&["-4444"])]).await;

        let mut client = client_for(addr).await;
        let err = client.connect().await.unwrap_err();
        assert_eq!(err.return_code(), Some(-4444));
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_operations_require_connection() {
        let mut client = client_for("127.0.0.1:1".parse().unwrap()).await;
        assert!(matches!(
            client.no_op().await,
            Err(ClientError::NotConnected)
        ));
        assert!(matches!(
            client.read_record(1).await,
            Err(ClientError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_read_record() {
        let addr = mock_server(vec![
            response(&["0"]),
            response(&["0", "123#32", "0#4", "700#^aПушкин^bА. С.", "300#Роман"]),
        ])
        .await;

        let mut client = client_for(addr).await;
        client.connect().await.unwrap();
        let record = client.read_record(123).await.unwrap();
        assert_eq!(record.mfn, 123);
        assert_eq!(record.database, "IBIS");
        assert_eq!(record.fm_subfield(700, 'a'), Some("Пушкин"));
        assert_eq!(record.fm(300), Some("Роман"));
    }

    #[tokio::test]
    async fn test_read_record_tolerates_deleted_status() {
        // logically deleted arrives with an acceptable negative code
        let addr = mock_server(vec![
            response(&["0"]),
            response(&["-600", "5#1", "0#2"]),
        ])
        .await;

        let mut client = client_for(addr).await;
        client.connect().await.unwrap();
        let record = client.read_record(5).await.unwrap();
        assert!(record.is_deleted());
    }

    #[tokio::test]
    async fn test_read_record_server_error() {
        let addr = mock_server(vec![response(&["0"]), response(&["-140"])]).await;

        let mut client = client_for(addr).await;
        client.connect().await.unwrap();
        let err = client.read_record(99).await.unwrap_err();
        assert_eq!(err.return_code(), Some(-140));
    }

    #[tokio::test]
    async fn test_get_max_mfn() {
        let addr = mock_server(vec![response(&["0"]), response(&["251"])]).await;

        let mut client = client_for(addr).await;
        client.connect().await.unwrap();
        assert_eq!(client.get_max_mfn("").await.unwrap(), 251);
    }

    #[tokio::test]
    async fn test_search() {
        let addr = mock_server(vec![
            response(&["0"]),
            response(&["0", "2", "12#First hit", "17#Second hit"]),
        ])
        .await;

        let mut client = client_for(addr).await;
        client.connect().await.unwrap();
        let (total, found) = client
            .search_ex(&SearchParameters::expression("K=BYTE"))
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(FoundLine::to_mfn(&found), vec![12, 17]);
        assert_eq!(found[0].description, "First hit");
    }

    #[tokio::test]
    async fn test_read_terms() {
        let addr = mock_server(vec![
            response(&["0"]),
            response(&["0", "3#K=BASE", "7#K=BYTE"]),
        ])
        .await;

        let mut client = client_for(addr).await;
        client.connect().await.unwrap();
        let terms = client.read_terms("K=B", 10).await.unwrap();
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[1].count, 7);
        assert_eq!(terms[1].text, "K=BYTE");
    }

    #[tokio::test]
    async fn test_read_terms_tolerates_end_of_list() {
        let addr = mock_server(vec![response(&["0"]), response(&["-202"])]).await;

        let mut client = client_for(addr).await;
        client.connect().await.unwrap();
        let terms = client.read_terms("Z=ZZZ", 10).await.unwrap();
        assert!(terms.is_empty());
    }

    #[tokio::test]
    async fn test_read_text_file_normalizes_delimiters() {
        let addr = mock_server(vec![
            response(&["0"]),
            response(&["first\x1F\x1Esecond\x1F\x1Ethird"]),
        ])
        .await;

        let mut client = client_for(addr).await;
        client.connect().await.unwrap();
        let text = client.read_text_file("3..test.txt").await.unwrap();
        assert_eq!(text, "first\nsecond\nthird");
    }

    #[tokio::test]
    async fn test_write_record_returns_new_max_mfn() {
        let addr = mock_server(vec![response(&["0"]), response(&["252"])]).await;

        let mut client = client_for(addr).await;
        client.connect().await.unwrap();
        let mut record = Record::default();
        record.add(200, "").add('a', "Заглавие");
        let max_mfn = client.write_record(&record, false, true).await.unwrap();
        assert_eq!(max_mfn, 252);
    }

    #[tokio::test]
    async fn test_get_server_version() {
        let addr = mock_server(vec![
            response(&["0"]),
            response(&["0", "64.2008.1", "3", "100"]),
        ])
        .await;

        let mut client = client_for(addr).await;
        client.connect().await.unwrap();
        let version = client.get_server_version().await.unwrap();
        assert_eq!(version.version, "64.2008.1");
        assert_eq!(version.max_clients, 100);
    }

    #[tokio::test]
    async fn test_list_files_flattens_delimited_lines() {
        let addr = mock_server(vec![
            response(&["0"]),
            response(&["a.pft\x1F\x1Eb.pft", "c.mnu"]),
        ])
        .await;

        let mut client = client_for(addr).await;
        client.connect().await.unwrap();
        let files = client.list_files("2.IBIS.*.pft").await.unwrap();
        assert_eq!(files, vec!["a.pft", "b.pft", "c.mnu"]);
    }

    #[tokio::test]
    async fn test_empty_response_is_connection_closed() {
        let addr = mock_server(vec![Vec::new()]).await;

        let mut client = client_for(addr).await;
        let err = client.connect().await.unwrap_err();
        assert!(matches!(err, ClientError::ConnectionClosed));
    }
}
