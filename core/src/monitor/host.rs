//! Local host metrics: uptime, cpu, memory and root disk usage.

use sysinfo::{Disks, System, MINIMUM_CPU_UPDATE_INTERVAL};

use crate::models::HostStatus;
use crate::util;

/// Collect current host metrics.
///
/// CPU load is sampled over the minimum interval sysinfo needs between
/// two refreshes to compute a usage delta.
pub async fn host_status() -> HostStatus {
    let mut sys = System::new();
    sys.refresh_cpu_usage();
    tokio::time::sleep(MINIMUM_CPU_UPDATE_INTERVAL).await;
    sys.refresh_cpu_usage();
    sys.refresh_memory();

    let memory_used_percent = if sys.total_memory() > 0 {
        sys.used_memory() as f64 / sys.total_memory() as f64 * 100.0
    } else {
        0.0
    };

    let disks = Disks::new_with_refreshed_list();
    let disk_used_percent = disks
        .list()
        .iter()
        .find(|d| d.mount_point() == std::path::Path::new("/"))
        .map(|d| {
            let total = d.total_space();
            if total > 0 {
                (total - d.available_space()) as f64 / total as f64 * 100.0
            } else {
                0.0
            }
        })
        .unwrap_or(0.0);

    HostStatus {
        hostname: util::local_hostname(),
        uptime_seconds: System::uptime(),
        cpu_load_percent: sys.global_cpu_usage() as f64,
        memory_used_percent,
        disk_used_percent,
    }
}
