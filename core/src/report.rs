//! Port-usage report assembly and JSON emission.

use std::path::Path;

use chrono::Utc;
use tracing::debug;

use crate::docker;
use crate::error::Result;
use crate::models::{PortMappings, PortRange, PortRecord, Report, SCHEMA_VERSION};
use crate::process::ProcessTable;
use crate::sockets::{self, SocketEntry, SocketKind};
use crate::util;

/// Join listening sockets with the container mapping and process table.
///
/// Records are sorted by (proto, port, ip) so that repeated runs on an
/// unchanged system produce byte-identical `ports` arrays regardless of
/// enumeration order.
pub fn correlate(
    entries: Vec<SocketEntry>,
    processes: &ProcessTable,
    docker_map: &PortMappings,
) -> Vec<PortRecord> {
    let mut records: Vec<PortRecord> = entries
        .into_iter()
        .map(|entry| {
            let proto = match &entry.kind {
                SocketKind::Stream => "tcp",
                SocketKind::Datagram => "udp",
                SocketKind::Other(_) => "other",
            }
            .to_string();

            let info = entry.pid.and_then(|pid| processes.lookup(pid));
            let container = docker_map.get(&(proto.clone(), entry.ip.clone(), entry.port));

            PortRecord {
                proto,
                ip: entry.ip,
                port: entry.port,
                status: entry.status,
                pid: entry.pid,
                user: info.map(|i| i.user.clone()),
                process: info.map(|i| i.name.clone()),
                cmdline: info.map(|i| i.cmdline.clone()),
                docker_container_name: container.map(|c| c.container_name.clone()),
                docker_container_id: container.map(|c| c.container_id.clone()),
                docker_image: container.map(|c| c.image.clone()),
                docker_port_spec: container.map(|c| c.port_spec.clone()),
                docker_container_port: container.map(|c| c.container_port.clone()),
            }
        })
        .collect();

    records.sort_by(|a, b| {
        (a.proto.as_str(), a.port, a.ip.as_str()).cmp(&(b.proto.as_str(), b.port, b.ip.as_str()))
    });
    records
}

/// Read the ephemeral port range the kernel uses for outbound
/// connections. None when unreadable or not applicable to this platform.
#[cfg(target_os = "linux")]
pub fn ip_local_port_range() -> Option<PortRange> {
    let content = std::fs::read_to_string("/proc/sys/net/ipv4/ip_local_port_range").ok()?;
    let mut parts = content.split_whitespace();
    let low = parts.next()?.parse().ok()?;
    let high = parts.next()?.parse().ok()?;
    Some(PortRange { low, high })
}

#[cfg(not(target_os = "linux"))]
pub fn ip_local_port_range() -> Option<PortRange> {
    None
}

/// Build the full report.
///
/// The container mapping is collected first so the socket join can see
/// it; socket enumeration failure aborts the whole report, every other
/// collector degrades to empty/None values.
pub async fn build_report() -> Result<Report> {
    let (docker_map, docker_meta) = docker::collect(docker::DOCKER_PROGRAM).await;
    let entries = sockets::enumerate().await?;
    let processes = ProcessTable::capture().await;
    let ports = correlate(entries, &processes, &docker_map);

    debug!(ports = ports.len(), "port-usage report assembled");

    Ok(Report {
        schema_version: SCHEMA_VERSION.to_string(),
        script_version: env!("CARGO_PKG_VERSION").to_string(),
        host: util::local_hostname(),
        generated_at: Utc::now(),
        ip_local_port_range: ip_local_port_range(),
        docker: docker_meta,
        ports,
    })
}

/// Serialize the report to pretty-printed JSON at `path`.
///
/// The document is rendered fully in memory and persisted with a single
/// write, so a killed run never leaves a half-written file behind.
/// Non-ASCII characters are kept as literal UTF-8.
pub async fn write_json(report: &Report, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}
