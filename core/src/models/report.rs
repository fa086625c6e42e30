//! Port-usage report data structures.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version of the report JSON schema.
pub const SCHEMA_VERSION: &str = "1.1.0";

/// Container-side port of a published mapping.
///
/// Docker normally reports a number here, but the raw string is kept
/// verbatim when it does not parse as one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContainerPort {
    Number(u16),
    Raw(String),
}

/// Identity of the container publishing a host port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfo {
    pub container_name: String,
    pub container_id: String,
    pub image: String,
    /// Raw host->container mapping string as printed by `docker ps`.
    pub port_spec: String,
    pub container_port: ContainerPort,
}

/// Key into the container port mapping: (protocol, host ip, host port).
pub type PortKey = (String, String, u16);

/// Published port mappings, keyed by [`PortKey`]. Built fresh per report.
pub type PortMappings = HashMap<PortKey, ContainerInfo>;

/// Metadata about one docker listing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerMeta {
    /// Whether `docker ps` ran successfully.
    pub available: bool,
    pub error: Option<String>,
    pub containers_total: usize,
    /// Containers with at least one published port, counted once each.
    pub containers_with_published_ports: usize,
    /// Exact command used, recorded for auditability.
    pub command: String,
}

/// Ephemeral port range of the host, if readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    pub low: u32,
    pub high: u32,
}

/// One listening socket, with process and container attribution.
///
/// The `docker_*` fields are serialized only when the socket matched a
/// container mapping; the process fields are always present and null
/// when attribution failed for that pid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRecord {
    pub proto: String,
    pub ip: String,
    pub port: u16,
    pub status: String,
    pub pid: Option<u32>,
    pub user: Option<String>,
    pub process: Option<String>,
    pub cmdline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_container_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_container_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_port_spec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_container_port: Option<ContainerPort>,
}

/// The full port-usage report. Built once per invocation, immutable
/// afterwards, serialized at most twice (JSON and HTML view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub schema_version: String,
    pub script_version: String,
    pub host: String,
    pub generated_at: DateTime<Utc>,
    pub ip_local_port_range: Option<PortRange>,
    pub docker: DockerMeta,
    pub ports: Vec<PortRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_port_serializes_untagged() {
        let n = serde_json::to_value(ContainerPort::Number(80)).unwrap();
        assert_eq!(n, serde_json::json!(80));

        let raw = serde_json::to_value(ContainerPort::Raw("http".into())).unwrap();
        assert_eq!(raw, serde_json::json!("http"));
    }

    #[test]
    fn docker_fields_omitted_when_absent() {
        let record = PortRecord {
            proto: "tcp".into(),
            ip: "0.0.0.0".into(),
            port: 22,
            status: "LISTEN".into(),
            pid: Some(812),
            user: Some("root".into()),
            process: Some("sshd".into()),
            cmdline: Some("/usr/sbin/sshd -D".into()),
            docker_container_name: None,
            docker_container_id: None,
            docker_image: None,
            docker_port_spec: None,
            docker_container_port: None,
        };

        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("docker_container_name"));
        assert!(!obj.contains_key("docker_container_port"));
        // Process fields stay present even when null elsewhere
        assert!(obj.contains_key("user"));
        assert_eq!(obj["pid"], serde_json::json!(812));
    }
}
