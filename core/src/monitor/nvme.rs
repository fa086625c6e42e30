//! NVMe device temperature via nvme-cli.

use std::process::Stdio;

use regex::Regex;
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::models::NvmeDeviceStatus;

/// Temperature at which a device is flagged critical.
const WARNING_TEMP_C: f64 = 70.0;

/// Collect the status of every configured NVMe device.
///
/// Unlike the docker collector this is all-or-nothing: a missing
/// nvme-cli or unparsable smart-log is surfaced as
/// [`Error::MonitorUnavailable`] so the HTTP layer can answer 503.
pub async fn nvme_status(devices: &[String]) -> Result<Vec<NvmeDeviceStatus>> {
    let mut statuses = Vec::with_capacity(devices.len());
    for device in devices {
        let temp = read_temperature(device).await?;
        statuses.push(NvmeDeviceStatus {
            device: device.clone(),
            temperature_celsius: temp,
            is_critical: temp >= WARNING_TEMP_C,
        });
    }
    Ok(statuses)
}

/// Read the current temperature of one device.
///
/// Executes: `nvme smart-log <device>` and parses the temperature line.
async fn read_temperature(device: &str) -> Result<f64> {
    let output = Command::new("nvme")
        .args(["smart-log", device])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| {
            Error::MonitorUnavailable(format!("nvme-cli binary not found: {e}"))
        })?;

    if !output.status.success() {
        return Err(Error::MonitorUnavailable(format!(
            "nvme smart-log failed for {device}: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_temperature(&stdout).ok_or_else(|| {
        Error::MonitorUnavailable(format!(
            "could not parse temperature for {device} from smart-log output"
        ))
    })
}

/// Extract the temperature from a smart-log line like `temperature : 42 C`.
fn parse_temperature(stdout: &str) -> Option<f64> {
    let re = Regex::new(r"(?i)temperature\s*:\s*(\d+)\s*C").unwrap();
    re.captures(stdout).and_then(|caps| caps[1].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_temperature() {
        let stdout = "Smart Log for NVME device:nvme0n1 namespace-id:ffffffff\n\
                      critical_warning\t\t\t: 0\n\
                      temperature\t\t\t\t: 42 C (315 Kelvin)\n\
                      available_spare\t\t\t\t: 100%\n";
        assert_eq!(parse_temperature(stdout), Some(42.0));
    }

    #[test]
    fn test_parse_temperature_case_insensitive() {
        assert_eq!(parse_temperature("Temperature : 71 C"), Some(71.0));
        assert_eq!(parse_temperature("no temperature line"), None);
    }

    #[tokio::test]
    async fn test_empty_device_list() {
        let statuses = nvme_status(&[]).await.unwrap();
        assert!(statuses.is_empty());
    }
}
