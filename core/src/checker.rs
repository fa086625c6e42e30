//! Runtime TCP port availability check.

use std::io::ErrorKind;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;

/// Default bound for the single connection attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

/// Outcome of a port check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortState {
    /// Nothing is listening: the connection attempt was refused.
    Free,
    /// Something accepted the connection, or the check was inconclusive.
    Occupied,
}

/// Probe `host:port` with exactly one bounded TCP connection attempt.
///
/// Free only when the attempt was actively refused. Timeouts and any
/// other OS-level error count as occupied (fail-closed), as does an
/// established connection.
pub async fn check_port(host: &str, port: u16, limit: Duration) -> PortState {
    match timeout(limit, TcpStream::connect((host, port))).await {
        Ok(Ok(_stream)) => PortState::Occupied,
        Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => PortState::Free,
        Ok(Err(_)) => PortState::Occupied,
        Err(_elapsed) => PortState::Occupied,
    }
}
