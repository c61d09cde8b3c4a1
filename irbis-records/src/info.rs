//! Positional descriptor decoders for server-side information.
//!
//! Each descriptor has a documented fixed field count; list-shaped
//! responses carry a leading "count of items" / "lines per item" header
//! that is consumed before iterating a fixed stride. Parsing is best
//! effort: a short response yields a truncated result list, stopping at
//! the first incomplete block.

use crate::menu::MenuFile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Delimiter inside a single descriptor line holding an integer list.
const LIST_DELIMITER: char = '\x1E';

/// Field count of a process or client block.
const CLIENT_FIELDS: usize = 10;

/// Field count of a user block.
const USER_FIELDS: usize = 9;

fn line(lines: &[String], index: usize) -> String {
    lines.get(index).cloned().unwrap_or_default()
}

fn integer(lines: &[String], index: usize) -> u32 {
    lines
        .get(index)
        .and_then(|text| text.trim().parse().ok())
        .unwrap_or(0)
}

/// Summary of one database: deleted/non-actualized/locked record lists,
/// the maximum MFN and the exclusive-lock flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub name: String,
    pub description: String,
    pub max_mfn: u32,
    pub logically_deleted_records: Vec<u32>,
    pub physically_deleted_records: Vec<u32>,
    pub non_actualized_records: Vec<u32>,
    pub locked_records: Vec<u32>,
    pub database_locked: bool,
    pub read_only: bool,
}

impl DatabaseInfo {
    fn parse_list(text: &str) -> Vec<u32> {
        text.split(LIST_DELIMITER)
            .filter(|item| !item.is_empty())
            .map(|item| item.trim().parse().unwrap_or(0))
            .collect()
    }

    /// Decodes the database summary response.
    pub fn parse(lines: &[String]) -> Self {
        Self {
            logically_deleted_records: Self::parse_list(&line(lines, 0)),
            physically_deleted_records: Self::parse_list(&line(lines, 1)),
            non_actualized_records: Self::parse_list(&line(lines, 2)),
            locked_records: Self::parse_list(&line(lines, 3)),
            max_mfn: integer(lines, 4),
            database_locked: integer(lines, 5) != 0,
            ..Self::default()
        }
    }

    /// Derives the database list from a menu file; a leading `-` on the
    /// code marks a read-only database.
    pub fn parse_menu(menu: &MenuFile) -> Vec<Self> {
        menu.entries
            .iter()
            .map(|entry| {
                let (name, read_only) = match entry.code.strip_prefix('-') {
                    Some(name) => (name, true),
                    None => (entry.code.as_str(), false),
                };
                Self {
                    name: name.to_string(),
                    description: entry.comment.clone(),
                    read_only,
                    ..Self::default()
                }
            })
            .collect()
    }
}

impl fmt::Display for DatabaseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Server version and connection limits. The server answers with either
/// three lines (no organization) or four.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub organization: String,
    pub version: String,
    pub connected_clients: u32,
    pub max_clients: u32,
}

impl VersionInfo {
    pub fn parse(lines: &[String]) -> Self {
        if lines.len() == 3 {
            Self {
                organization: String::new(),
                version: line(lines, 0),
                connected_clients: integer(lines, 1),
                max_clients: integer(lines, 2),
            }
        } else {
            Self {
                organization: line(lines, 0),
                version: line(lines, 1),
                connected_clients: integer(lines, 2),
                max_clients: integer(lines, 3),
            }
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}

/// One process running on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub number: String,
    pub ip_address: String,
    pub name: String,
    pub client_id: String,
    pub workstation: String,
    pub started: String,
    pub last_command: String,
    pub command_number: String,
    pub process_id: String,
    pub state: String,
}

impl ProcessInfo {
    /// Decodes the process list: count, lines per process, then blocks.
    pub fn parse(lines: &[String]) -> Vec<Self> {
        let mut result = Vec::new();
        let process_count = integer(lines, 0) as usize;
        let lines_per_process = integer(lines, 1) as usize;
        if process_count == 0 || lines_per_process == 0 {
            return result;
        }

        let mut rest = &lines[2.min(lines.len())..];
        for _ in 0..process_count {
            if rest.len() < CLIENT_FIELDS {
                break;
            }

            result.push(Self {
                number: rest[0].clone(),
                ip_address: rest[1].clone(),
                name: rest[2].clone(),
                client_id: rest[3].clone(),
                workstation: rest[4].clone(),
                started: rest[5].clone(),
                last_command: rest[6].clone(),
                command_number: rest[7].clone(),
                process_id: rest[8].clone(),
                state: rest[9].clone(),
            });

            rest = &rest[lines_per_process.min(rest.len())..];
        }

        result
    }
}

impl fmt::Display for ProcessInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.number, self.ip_address, self.name)
    }
}

/// One client connected to the server (not necessarily this one).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub number: String,
    pub ip_address: String,
    pub port: String,
    pub name: String,
    pub id: String,
    pub workstation: String,
    pub registered: String,
    pub acknowledged: String,
    pub last_command: String,
    pub command_number: String,
}

impl ClientInfo {
    /// Decodes one ten-field client block.
    pub fn parse(lines: &[String]) -> Self {
        Self {
            number: line(lines, 0),
            ip_address: line(lines, 1),
            port: line(lines, 2),
            name: line(lines, 3),
            id: line(lines, 4),
            workstation: line(lines, 5),
            registered: line(lines, 6),
            acknowledged: line(lines, 7),
            last_command: line(lines, 8),
            command_number: line(lines, 9),
        }
    }
}

impl fmt::Display for ClientInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ip_address)
    }
}

/// One registered user, per client_m.mnu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub number: String,
    pub name: String,
    pub password: String,
    pub cataloger: String,
    pub reader: String,
    pub circulation: String,
    pub acquisitions: String,
    pub provision: String,
    pub administrator: String,
}

impl UserInfo {
    fn format_pair(prefix: char, value: &str, default: &str) -> String {
        if value.eq_ignore_ascii_case(default) {
            return String::new();
        }
        format!("{prefix}={value};")
    }

    /// Produces the update payload for one user. Workstation INI names
    /// equal to the stock defaults are omitted.
    pub fn encode(&self) -> String {
        format!(
            "{}\r\n{}\r\n{}{}{}{}{}{}",
            self.name,
            self.password,
            Self::format_pair('C', &self.cataloger, "irbisc.ini"),
            Self::format_pair('R', &self.reader, "irbisr.ini"),
            Self::format_pair('B', &self.circulation, "irbisb.ini"),
            Self::format_pair('M', &self.acquisitions, "irbism.ini"),
            Self::format_pair('K', &self.provision, "irbisk.ini"),
            Self::format_pair('A', &self.administrator, "irbisa.ini"),
        )
    }

    /// Decodes the user list: count, lines per user, then blocks with a
    /// one-line gap between them.
    pub fn parse(lines: &[String]) -> Vec<Self> {
        let mut result = Vec::new();
        let user_count = integer(lines, 0) as usize;
        let lines_per_user = integer(lines, 1) as usize;
        if user_count == 0 || lines_per_user == 0 {
            return result;
        }

        let mut rest = &lines[2.min(lines.len())..];
        for _ in 0..user_count {
            if rest.len() < USER_FIELDS {
                break;
            }

            result.push(Self {
                number: rest[0].clone(),
                name: rest[1].clone(),
                password: rest[2].clone(),
                cataloger: rest[3].clone(),
                reader: rest[4].clone(),
                circulation: rest[5].clone(),
                acquisitions: rest[6].clone(),
                provision: rest[7].clone(),
                administrator: rest[8].clone(),
            });

            rest = &rest[(lines_per_user + 1).min(rest.len())..];
        }

        result
    }
}

impl fmt::Display for UserInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Server work statistics with the embedded client list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStat {
    pub running_clients: Vec<ClientInfo>,
    pub client_count: u32,
    pub total_command_count: u32,
}

impl ServerStat {
    pub fn parse(lines: &[String]) -> Self {
        let mut stat = Self {
            total_command_count: integer(lines, 0),
            client_count: integer(lines, 1),
            ..Self::default()
        };

        let lines_per_client = integer(lines, 2) as usize;
        if lines_per_client == 0 {
            return stat;
        }

        let mut rest = &lines[3.min(lines.len())..];
        for _ in 0..stat.client_count {
            if rest.len() < CLIENT_FIELDS {
                break;
            }

            stat.running_clients.push(ClientInfo::parse(rest));
            rest = &rest[(lines_per_client + 1).min(rest.len())..];
        }

        stat
    }
}
