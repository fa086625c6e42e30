//! Static HTML view of the port-usage report.
//!
//! The page embeds the report JSON verbatim and renders the table
//! client-side; no field is recomputed here.

use std::path::Path;

use crate::error::Result;
use crate::models::Report;

const TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Port Usage Report</title>
    <style>
        body {
            font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
            margin: 1.5rem;
            background: #f5f5f5;
        }
        h1, h2 { margin-bottom: 0.25rem; }
        .meta { margin-bottom: 1rem; font-size: 0.9rem; color: #555; }
        table { border-collapse: collapse; width: 100%; background: #fff; }
        th, td { border: 1px solid #ddd; padding: 0.35rem 0.5rem; font-size: 0.8rem; }
        th { background: #eee; position: sticky; top: 0; }
        tr:nth-child(even) td { background: #fafafa; }
        code { font-family: ui-monospace, Menlo, Consolas, monospace; }
        .status { text-transform: lowercase; }
    </style>
</head>
<body>
    <h1>Port Usage Report</h1>
    <div class="meta">
        <div><strong>Host:</strong> <code id="meta-host"></code></div>
        <div><strong>Generated at:</strong> <span id="meta-generated"></span></div>
        <div><strong>Tool version:</strong> <span id="meta-version"></span></div>
        <div><strong>Listening ports:</strong> <span id="meta-count"></span></div>
        <div><strong>Ephemeral range:</strong> <span id="meta-range"></span></div>
        <div><strong>Docker:</strong> <span id="meta-docker"></span></div>
    </div>

    <h2>Ports</h2>
    <table id="ports-table">
        <thead>
            <tr>
                <th>Proto</th>
                <th>IP</th>
                <th>Port</th>
                <th>Status</th>
                <th>PID</th>
                <th>User</th>
                <th>Process</th>
                <th>Cmdline</th>
                <th>Docker Name</th>
                <th>Docker ID</th>
                <th>Docker Image</th>
                <th>Docker Mapping</th>
            </tr>
        </thead>
        <tbody></tbody>
    </table>

    <script>
        const report = __REPORT_JSON__;

        function renderReport() {
            const ports = Array.isArray(report.ports) ? report.ports : [];

            const range = report.ip_local_port_range;
            const rangeText = range ? range.low + " - " + range.high : "unknown";

            const docker = report.docker || {};
            const dockerText = docker.available === true
                ? "active (containers: " + (docker.containers_total || 0) +
                  ", publishing: " + (docker.containers_with_published_ports || 0) + ")"
                : (docker.error ? "inactive - " + docker.error : "inactive");

            document.getElementById("meta-host").textContent = report.host || "";
            document.getElementById("meta-generated").textContent = report.generated_at || "";
            document.getElementById("meta-version").textContent = report.script_version || "";
            document.getElementById("meta-count").textContent = String(ports.length);
            document.getElementById("meta-range").textContent = rangeText;
            document.getElementById("meta-docker").textContent = dockerText;

            const tbody = document.querySelector("#ports-table tbody");
            tbody.innerHTML = "";

            for (const p of ports) {
                const tr = document.createElement("tr");
                const cells = [
                    p.proto || "",
                    p.ip || "",
                    p.port != null ? String(p.port) : "",
                    p.status || "",
                    p.pid != null ? String(p.pid) : "",
                    p.user || "",
                    p.process || "",
                    p.cmdline || "",
                    p.docker_container_name || "",
                    p.docker_container_id || "",
                    p.docker_image || "",
                    p.docker_port_spec || "",
                ];
                cells.forEach((value, idx) => {
                    const td = document.createElement("td");
                    if (idx === 3) {
                        td.className = "status";
                    }
                    td.textContent = value;
                    tr.appendChild(td);
                });
                tbody.appendChild(tr);
            }
        }

        document.addEventListener("DOMContentLoaded", renderReport);
    </script>
</body>
</html>
"##;

/// Render the report into a standalone HTML page.
pub fn render_html(report: &Report) -> Result<String> {
    let json = serde_json::to_string(report)?;
    Ok(TEMPLATE.replace("__REPORT_JSON__", &json))
}

/// Write the HTML view next to the JSON report.
pub async fn write_html(report: &Report, path: &Path) -> Result<()> {
    let html = render_html(report)?;
    tokio::fs::write(path, html).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DockerMeta, SCHEMA_VERSION};
    use chrono::Utc;

    fn sample_report() -> Report {
        Report {
            schema_version: SCHEMA_VERSION.to_string(),
            script_version: "1.1.0".to_string(),
            host: "lab-host".to_string(),
            generated_at: Utc::now(),
            ip_local_port_range: None,
            docker: DockerMeta {
                available: false,
                error: Some("docker binary not found".to_string()),
                containers_total: 0,
                containers_with_published_ports: 0,
                command: "docker ps".to_string(),
            },
            ports: vec![],
        }
    }

    #[test]
    fn test_render_embeds_report_verbatim() {
        let report = sample_report();
        let html = render_html(&report).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        let expected = serde_json::to_string(&report).unwrap();
        assert!(html.contains(&expected));
        assert!(!html.contains("__REPORT_JSON__"));
    }
}
