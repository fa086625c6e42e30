//! Status models served by the HTTP endpoints.

use serde::{Deserialize, Serialize};

/// Current metrics of the local host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostStatus {
    pub hostname: String,
    /// Seconds since the system was booted.
    pub uptime_seconds: u64,
    /// CPU utilisation in percent over a short sampling interval.
    pub cpu_load_percent: f64,
    pub memory_used_percent: f64,
    /// Root filesystem usage in percent.
    pub disk_used_percent: f64,
}

/// Reachability and latency of one monitored network host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingHostStatus {
    pub host: String,
    /// True if the host answered a ping probe.
    pub is_up: bool,
    /// Roundtrip time in milliseconds, if measurable.
    pub latency_ms: Option<f64>,
    pub error: Option<String>,
}

/// Temperature status of one NVMe device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NvmeDeviceStatus {
    /// Device path, e.g. /dev/nvme0n1.
    pub device: String,
    pub temperature_celsius: f64,
    /// True if the temperature is at or above the warning threshold.
    pub is_critical: bool,
}
