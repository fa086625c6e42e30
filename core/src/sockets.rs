//! Listening-socket enumeration using the ss command.
//!
//! Only listening entries are produced: `LISTEN` for TCP and `UNCONN`
//! for bound UDP sockets (what ss reports under `-l`). This query is
//! foundational, so any failure of ss aborts report generation.

use std::process::Stdio;

use regex::Regex;
use tokio::process::Command;

use crate::error::{Error, Result};

/// Socket type as reported in the Netid column of the socket table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketKind {
    Stream,
    Datagram,
    Other(String),
}

/// One listening socket with its owning process, if the OS disclosed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketEntry {
    pub kind: SocketKind,
    pub status: String,
    pub ip: String,
    pub port: u16,
    pub pid: Option<u32>,
}

/// List all listening TCP and UDP sockets (IPv4 and IPv6).
///
/// Executes: `ss -H -t -u -l -n -p`
///
/// Flags explained:
/// -H, --no-header     Suppress header line
/// -t, --tcp           display TCP sockets
/// -u, --udp           display UDP sockets
/// -l, --listening     display listening sockets only
/// -n, --numeric       don't resolve service names
/// -p, --processes     show process using socket
pub async fn enumerate() -> Result<Vec<SocketEntry>> {
    let output = Command::new("ss")
        .args(["-H", "-t", "-u", "-l", "-n", "-p"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await
        .map_err(|e| Error::CommandFailed(format!("failed to run ss: {e}")))?;

    if !output.status.success() {
        return Err(Error::CommandFailed(format!(
            "ss exited with {}",
            output.status
        )));
    }

    let stdout = String::from_utf8(output.stdout)
        .map_err(|e| Error::Parse(format!("invalid UTF-8 in ss output: {e}")))?;

    Ok(parse_ss_output(&stdout))
}

/// Parse `ss -Htulnp` output into socket entries.
///
/// Expected line format:
/// ```text
/// tcp  LISTEN  0  4096  0.0.0.0:22      0.0.0.0:*  users:(("sshd",pid=812,fd=3))
/// udp  UNCONN  0  0     127.0.0.53:53   0.0.0.0:*
/// ```
///
/// Lines without a resolvable local ip:port are skipped. The process
/// column is optional; ss omits it when the caller lacks permission.
pub(crate) fn parse_ss_output(output: &str) -> Vec<SocketEntry> {
    let pid_regex = Regex::new(r#"pid=(\d+)"#).unwrap();
    let mut entries = Vec::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }

        // Columns: [Netid] [State] [Recv-Q] [Send-Q] [Local:Port] [Peer:Port] [Process]
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() < 6 {
            continue;
        }

        let kind = match cols[0] {
            "tcp" => SocketKind::Stream,
            "udp" => SocketKind::Datagram,
            other => SocketKind::Other(other.to_string()),
        };

        let status = cols[1].to_string();
        if status != "LISTEN" && status != "UNCONN" {
            continue;
        }

        let Some((ip, port)) = parse_local_address(cols[4]) else {
            continue;
        };

        let pid = cols
            .get(6)
            .and_then(|c| pid_regex.captures(c))
            .and_then(|caps| caps[1].parse().ok());

        entries.push(SocketEntry {
            kind,
            status,
            ip,
            port,
            pid,
        });
    }

    entries
}

/// Split a local address column into (ip, port).
///
/// IPv6 addresses come bracketed from ss ("[::]:443"); the brackets are
/// stripped so the ip matches the form used in the docker mapping keys.
fn parse_local_address(addr: &str) -> Option<(String, u16)> {
    let (ip, port_str) = addr.rsplit_once(':')?;
    let port: u16 = port_str.parse().ok()?;
    if ip.is_empty() {
        return None;
    }
    let ip = ip
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(ip);
    Some((ip.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ss_output() {
        let output = r#"tcp   LISTEN 0      4096         0.0.0.0:22        0.0.0.0:*    users:(("sshd",pid=812,fd=3))
tcp   LISTEN 0      511             [::]:443             [::]:*    users:(("nginx",pid=1201,fd=7))
udp   UNCONN 0      0         127.0.0.53:53        0.0.0.0:*
"#;

        let entries = parse_ss_output(output);
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].kind, SocketKind::Stream);
        assert_eq!(entries[0].status, "LISTEN");
        assert_eq!(entries[0].ip, "0.0.0.0");
        assert_eq!(entries[0].port, 22);
        assert_eq!(entries[0].pid, Some(812));

        // Brackets stripped from IPv6 addresses
        assert_eq!(entries[1].ip, "::");
        assert_eq!(entries[1].port, 443);

        // Process column missing: pid stays unknown
        assert_eq!(entries[2].kind, SocketKind::Datagram);
        assert_eq!(entries[2].status, "UNCONN");
        assert_eq!(entries[2].pid, None);
    }

    #[test]
    fn test_junk_lines_skipped() {
        let output = "garbage\n\ntcp LISTEN 0 128 not-an-address 0.0.0.0:*\n";
        assert!(parse_ss_output(output).is_empty());
    }

    #[test]
    fn test_unknown_netid_tagged_other() {
        let output = "sctp LISTEN 0 128 10.0.0.1:9999 0.0.0.0:*\n";
        let entries = parse_ss_output(output);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, SocketKind::Other("sctp".to_string()));
    }

    #[test]
    fn test_parse_local_address() {
        assert_eq!(
            parse_local_address("127.0.0.1:3000"),
            Some(("127.0.0.1".to_string(), 3000))
        );
        assert_eq!(
            parse_local_address("[::1]:8080"),
            Some(("::1".to_string(), 8080))
        );
        assert_eq!(parse_local_address("no-port"), None);
        assert_eq!(parse_local_address(":8080"), None);
        assert_eq!(parse_local_address("1.2.3.4:notaport"), None);
    }
}
