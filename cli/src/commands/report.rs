//! Report command - build and emit the port-usage report.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use labmon_core::checker::{self, PortState};
use labmon_core::{html, report};
use tracing::info;

const REPORT_STEM: &str = "port_usage_report";

/// Build the report, write the output file(s) and optionally run the
/// port check. Returns the process exit code.
pub async fn run(
    host: &str,
    check_port: Option<u16>,
    json_path: Option<PathBuf>,
    with_html: bool,
) -> Result<i32> {
    let (json_path, html_path) = output_paths(json_path);

    let report = report::build_report()
        .await
        .context("building port-usage report")?;

    report::write_json(&report, &json_path)
        .await
        .with_context(|| format!("writing {}", json_path.display()))?;
    info!(path = %json_path.display(), ports = report.ports.len(), "JSON report written");
    println!("[INFO] JSON report written to: {}", json_path.display());

    if with_html {
        html::write_html(&report, &html_path)
            .await
            .with_context(|| format!("writing {}", html_path.display()))?;
        println!("[INFO] HTML report written to: {}", html_path.display());
    }

    if let Some(port) = check_port {
        let code = match checker::check_port(host, port, checker::DEFAULT_TIMEOUT).await {
            PortState::Free => {
                println!("[OK] Port {port} on {host} is free.");
                0
            }
            PortState::Occupied => {
                eprintln!("[ERROR] Port {port} on {host} is occupied or could not be checked.");
                1
            }
        };
        return Ok(code);
    }

    Ok(0)
}

/// Resolve the output paths. The HTML view always lands next to the
/// binary, even when the JSON path is overridden.
fn output_paths(json_path: Option<PathBuf>) -> (PathBuf, PathBuf) {
    let dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    let json = json_path.unwrap_or_else(|| dir.join(format!("{REPORT_STEM}.json")));
    let html = dir.join(format!("{REPORT_STEM}.html"));
    (json, html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_json_path_is_kept() {
        let (json, html) = output_paths(Some(PathBuf::from("/tmp/custom.json")));
        assert_eq!(json, PathBuf::from("/tmp/custom.json"));
        assert!(html.ends_with("port_usage_report.html"));
    }
}
