//! Docker container port-mapping collection.
//!
//! Parses `docker ps` tabular output into a mapping from
//! (protocol, host ip, host port) to the publishing container. A missing
//! docker binary or a failing listing is never fatal: the report then
//! carries an empty mapping plus metadata describing what went wrong.

use std::collections::HashSet;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::models::{ContainerInfo, ContainerPort, DockerMeta, PortMappings};

/// Program invoked for the container listing.
pub const DOCKER_PROGRAM: &str = "docker";

/// Go-template passed to `docker ps --format`.
pub const DOCKER_PS_FORMAT: &str = "{{.Names}}\t{{.ID}}\t{{.Image}}\t{{.Ports}}";

/// Human-readable form of the listing command, recorded in the report.
const DOCKER_PS_COMMAND: &str =
    r"docker ps --format '{{.Names}}\t{{.ID}}\t{{.Image}}\t{{.Ports}}'";

/// Collect published port mappings from all running containers.
///
/// Returns the mapping plus metadata about the collection run. The
/// `program` is injected so that failure paths stay testable.
pub async fn collect(program: &str) -> (PortMappings, DockerMeta) {
    let mut meta = DockerMeta {
        available: false,
        error: None,
        containers_total: 0,
        containers_with_published_ports: 0,
        command: DOCKER_PS_COMMAND.to_string(),
    };

    let output = match Command::new(program)
        .args(["ps", "--format", DOCKER_PS_FORMAT])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
    {
        Ok(output) => output,
        Err(e) => {
            meta.error = Some(format!("{program} binary not found: {e}"));
            return (PortMappings::new(), meta);
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        meta.error = Some(format!(
            "{program} ps failed ({}): {}",
            output.status,
            stderr.trim()
        ));
        return (PortMappings::new(), meta);
    }

    meta.available = true;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed = parse_docker_ps(&stdout);
    meta.containers_total = parsed.containers_total;
    meta.containers_with_published_ports = parsed.containers_with_published_ports;

    debug!(
        containers = parsed.containers_total,
        mappings = parsed.mapping.len(),
        "docker port mappings collected"
    );

    (parsed.mapping, meta)
}

/// Result of parsing one container listing.
pub(crate) struct ParsedListing {
    pub mapping: PortMappings,
    pub containers_total: usize,
    pub containers_with_published_ports: usize,
}

/// Parse the tab-separated `docker ps` listing.
///
/// Each line carries name, id, image and a ports field like
/// `"0.0.0.0:8080->80/tcp, [::]:8080->80/tcp"`. Entries without the
/// host->container arrow (unpublished exposed ports) are ignored, as are
/// entries whose host port does not parse. A duplicate
/// (proto, ip, port) key keeps the last entry seen.
pub(crate) fn parse_docker_ps(output: &str) -> ParsedListing {
    let mut mapping = PortMappings::new();
    let mut containers_total = 0;
    let mut publishing: HashSet<String> = HashSet::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }

        // Columns are tab separated: Names, ID, Image, Ports
        let parts: Vec<&str> = line.split('\t').map(str::trim).collect();
        if parts.len() < 4 {
            continue;
        }
        let (name, id, image, ports_str) = (parts[0], parts[1], parts[2], parts[3]);
        containers_total += 1;

        if ports_str.is_empty() {
            continue;
        }

        let mut has_published = false;

        for entry in ports_str.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            // Only host->container mappings like "IP:port->port/proto"
            let Some((left, right)) = entry.split_once("->") else {
                continue;
            };
            let (left, right) = (left.trim(), right.trim());

            // right: "<container_port>/<proto>", proto defaults to tcp
            let (container_port_str, proto) = match right.split_once('/') {
                Some((port, proto)) => (port, proto),
                None => (right, ""),
            };
            let proto = proto.trim().to_lowercase();
            let proto = if proto.is_empty() {
                "tcp".to_string()
            } else {
                proto
            };

            // left: "<host_ip>:<host_port>", e.g. "0.0.0.0:8080" or "[::]:8081"
            let Some((host_ip_raw, host_port_str)) = left.rsplit_once(':') else {
                continue;
            };
            let host_ip = host_ip_raw.trim();
            let host_ip = host_ip
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .unwrap_or(host_ip);

            let Ok(host_port) = host_port_str.parse::<u16>() else {
                continue;
            };

            let container_port = match container_port_str.parse::<u16>() {
                Ok(n) => ContainerPort::Number(n),
                Err(_) => ContainerPort::Raw(container_port_str.to_string()),
            };

            // Duplicate keys: last one wins, silently.
            mapping.insert(
                (proto, host_ip.to_string(), host_port),
                ContainerInfo {
                    container_name: name.to_string(),
                    container_id: id.to_string(),
                    image: image.to_string(),
                    port_spec: entry.to_string(),
                    container_port,
                },
            );
            has_published = true;
        }

        if has_published {
            publishing.insert(name.to_string());
        }
    }

    ParsedListing {
        mapping,
        containers_total,
        containers_with_published_ports: publishing.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containers_total_counts_every_valid_line() {
        let output = "nginx\tabc123\tnginx:1.27\t0.0.0.0:8080->80/tcp\n\
                      db\tdef456\tpostgres:16\t\n\
                      broker\t789abc\teclipse-mosquitto\t1883/tcp\n";

        let parsed = parse_docker_ps(output);
        assert_eq!(parsed.containers_total, 3);
        // Only nginx actually publishes a host port
        assert_eq!(parsed.containers_with_published_ports, 1);
        assert_eq!(parsed.mapping.len(), 1);
    }

    #[test]
    fn test_ipv4_and_ipv6_mappings_are_distinct() {
        let output =
            "web\tabc123\tnginx:1.27\t0.0.0.0:8080->80/tcp, [::]:8080->80/tcp\n";

        let parsed = parse_docker_ps(output);
        assert_eq!(parsed.mapping.len(), 2);

        let v4 = &parsed.mapping[&("tcp".to_string(), "0.0.0.0".to_string(), 8080)];
        assert_eq!(v4.container_name, "web");
        assert_eq!(v4.container_port, ContainerPort::Number(80));
        assert_eq!(v4.port_spec, "0.0.0.0:8080->80/tcp");

        let v6 = &parsed.mapping[&("tcp".to_string(), "::".to_string(), 8080)];
        assert_eq!(v6.port_spec, "[::]:8080->80/tcp");

        // The container is still counted once
        assert_eq!(parsed.containers_with_published_ports, 1);
    }

    #[test]
    fn test_entry_without_arrow_contributes_nothing() {
        let output = "broker\t789abc\teclipse-mosquitto\t1883/tcp, 9001/tcp\n";

        let parsed = parse_docker_ps(output);
        assert_eq!(parsed.containers_total, 1);
        assert_eq!(parsed.containers_with_published_ports, 0);
        assert!(parsed.mapping.is_empty());
    }

    #[test]
    fn test_proto_defaults_to_tcp_and_is_lowercased() {
        let output = "a\t1\timg\t0.0.0.0:5353->5353/UDP\n\
                      b\t2\timg\t0.0.0.0:9000->9000\n";

        let parsed = parse_docker_ps(output);
        assert!(parsed
            .mapping
            .contains_key(&("udp".to_string(), "0.0.0.0".to_string(), 5353)));
        assert!(parsed
            .mapping
            .contains_key(&("tcp".to_string(), "0.0.0.0".to_string(), 9000)));
    }

    #[test]
    fn test_non_numeric_container_port_kept_raw() {
        let output = "a\t1\timg\t0.0.0.0:8080->http/tcp\n";

        let parsed = parse_docker_ps(output);
        let info = &parsed.mapping[&("tcp".to_string(), "0.0.0.0".to_string(), 8080)];
        assert_eq!(info.container_port, ContainerPort::Raw("http".to_string()));
    }

    #[test]
    fn test_unparsable_host_port_skips_entry_not_line() {
        let output = "a\t1\timg\t0.0.0.0:bad->80/tcp, 0.0.0.0:8081->81/tcp\n";

        let parsed = parse_docker_ps(output);
        assert_eq!(parsed.mapping.len(), 1);
        assert!(parsed
            .mapping
            .contains_key(&("tcp".to_string(), "0.0.0.0".to_string(), 8081)));
        assert_eq!(parsed.containers_with_published_ports, 1);
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let output = "first\t1\timg1\t0.0.0.0:8080->80/tcp\n\
                      second\t2\timg2\t0.0.0.0:8080->8080/tcp\n";

        let parsed = parse_docker_ps(output);
        assert_eq!(parsed.mapping.len(), 1);
        let info = &parsed.mapping[&("tcp".to_string(), "0.0.0.0".to_string(), 8080)];
        assert_eq!(info.container_name, "second");
        assert_eq!(parsed.containers_with_published_ports, 2);
    }

    #[test]
    fn test_short_lines_skipped_entirely() {
        let output = "only\ttwo fields\n";
        let parsed = parse_docker_ps(output);
        assert_eq!(parsed.containers_total, 0);
        assert!(parsed.mapping.is_empty());
    }

    #[tokio::test]
    async fn test_missing_binary_is_not_fatal() {
        let (mapping, meta) = collect("labmon-no-such-binary").await;
        assert!(mapping.is_empty());
        assert!(!meta.available);
        assert!(meta.error.is_some());
        assert_eq!(meta.containers_total, 0);
        assert!(meta.command.starts_with("docker ps"));
    }
}
