//! Runtime settings resolved from the environment.
//!
//! Settings are built once at startup and passed explicitly to the
//! collaborators that need them; there is no cached process-wide state.

/// Default listen address for the HTTP status server.
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

/// Immutable runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Hosts probed by the ping monitor (LABMON_PING_HOSTS, comma separated).
    pub ping_hosts: Vec<String>,
    /// NVMe device paths checked by the storage monitor (LABMON_NVME_DEVICES).
    pub nvme_devices: Vec<String>,
    /// Listen address of the HTTP status server (LABMON_HTTP_ADDR).
    pub http_addr: String,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            ping_hosts: split_list(get("LABMON_PING_HOSTS").as_deref().unwrap_or("")),
            nvme_devices: split_list(get("LABMON_NVME_DEVICES").as_deref().unwrap_or("")),
            http_addr: get("LABMON_HTTP_ADDR")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string()),
        }
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
