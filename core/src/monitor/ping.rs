//! Reachability probes for configured network hosts.

use std::process::Stdio;

use tokio::process::Command;

use crate::models::PingHostStatus;

/// Probe every configured host once. Failures are isolated per host; a
/// missing ping binary marks each host down with an error instead of
/// aborting the collection.
pub async fn ping_status(hosts: &[String]) -> Vec<PingHostStatus> {
    let mut statuses = Vec::with_capacity(hosts.len());
    for host in hosts {
        statuses.push(probe_host(host).await);
    }
    statuses
}

/// Ping a single host once with a one second reply timeout.
///
/// Executes: `ping -c 1 -W 1 <host>`
async fn probe_host(host: &str) -> PingHostStatus {
    let output = match Command::new("ping")
        .args(["-c", "1", "-W", "1", host])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await
    {
        Ok(output) => output,
        Err(e) => {
            return PingHostStatus {
                host: host.to_string(),
                is_up: false,
                latency_ms: None,
                error: Some(format!("ping binary not available: {e}")),
            }
        }
    };

    // Exit code 0 means at least one reply was received
    if !output.status.success() {
        return PingHostStatus {
            host: host.to_string(),
            is_up: false,
            latency_ms: None,
            error: Some(format!("ping failed with {}", output.status)),
        };
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    PingHostStatus {
        host: host.to_string(),
        is_up: true,
        latency_ms: parse_latency_ms(&stdout),
        error: None,
    }
}

/// Extract the roundtrip time from a reply line like
/// `64 bytes from 192.168.178.1: icmp_seq=1 ttl=64 time=2.34 ms`.
fn parse_latency_ms(stdout: &str) -> Option<f64> {
    let line = stdout
        .lines()
        .find(|l| l.contains("time=") && l.contains(" ms"))?;
    let value = line.split_once("time=")?.1.split_whitespace().next()?;
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_latency() {
        let stdout = "PING 192.168.178.1 (192.168.178.1) 56(84) bytes of data.\n\
                      64 bytes from 192.168.178.1: icmp_seq=1 ttl=64 time=2.34 ms\n\
                      \n--- 192.168.178.1 ping statistics ---\n";
        assert_eq!(parse_latency_ms(stdout), Some(2.34));
    }

    #[test]
    fn test_parse_latency_missing() {
        assert_eq!(parse_latency_ms("no reply lines here"), None);
        // A time= line without a parsable value yields None, not a panic
        assert_eq!(parse_latency_ms("reply time=abc ms"), None);
    }

    #[tokio::test]
    async fn test_empty_host_list() {
        assert!(ping_status(&[]).await.is_empty());
    }
}
