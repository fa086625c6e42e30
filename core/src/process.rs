//! Best-effort process attribution via the ps command.

use std::collections::HashMap;
use std::process::Stdio;

use tokio::process::Command;
use tracing::warn;

/// Name, owning user and full command line of one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub name: String,
    pub user: String,
    pub cmdline: String,
}

/// Snapshot of the process table, keyed by pid.
///
/// A pid that is missing here (process exited, access denied, zombie)
/// simply resolves to nothing; attribution never aborts enumeration.
#[derive(Debug, Default)]
pub struct ProcessTable {
    infos: HashMap<u32, ProcessInfo>,
}

impl ProcessTable {
    /// Capture the current process table.
    ///
    /// Executes: `ps -axo pid,user,comm,args --no-headers`
    ///
    /// If ps itself fails the table is empty and every later lookup
    /// resolves to unknown.
    pub async fn capture() -> Self {
        let output = match Command::new("ps")
            .args(["-axo", "pid,user,comm,args", "--no-headers"])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "ps unavailable, process attribution disabled");
                return Self::default();
            }
        };

        let stdout = match String::from_utf8(output.stdout) {
            Ok(s) => s,
            Err(_) => return Self::default(),
        };

        Self {
            infos: parse_ps_output(&stdout),
        }
    }

    pub fn from_infos(infos: HashMap<u32, ProcessInfo>) -> Self {
        Self { infos }
    }

    /// Resolve a pid; None means the process could not be attributed.
    pub fn lookup(&self, pid: u32) -> Option<&ProcessInfo> {
        self.infos.get(&pid)
    }
}

fn parse_ps_output(stdout: &str) -> HashMap<u32, ProcessInfo> {
    let mut infos = HashMap::new();

    for line in stdout.lines() {
        // pid, user and comm carry no spaces; args is the remaining tail.
        let mut parts = line.split_whitespace();
        let (Some(pid), Some(user), Some(name)) = (parts.next(), parts.next(), parts.next())
        else {
            continue;
        };
        let Ok(pid) = pid.parse::<u32>() else {
            continue;
        };
        let cmdline = parts.collect::<Vec<_>>().join(" ");

        infos.insert(
            pid,
            ProcessInfo {
                name: name.to_string(),
                user: user.to_string(),
                cmdline,
            },
        );
    }

    infos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ps_output() {
        let output = "  812 root     sshd            /usr/sbin/sshd -D\n\
                      1201 www-data nginx           nginx: worker process\n\
                      bad line without pid\n";

        let infos = parse_ps_output(output);
        assert_eq!(infos.len(), 2);

        let sshd = &infos[&812];
        assert_eq!(sshd.name, "sshd");
        assert_eq!(sshd.user, "root");
        assert_eq!(sshd.cmdline, "/usr/sbin/sshd -D");

        // Arguments with spaces are preserved in the command line
        assert_eq!(infos[&1201].cmdline, "nginx: worker process");
    }

    #[test]
    fn test_lookup_unknown_pid() {
        let table = ProcessTable::default();
        assert!(table.lookup(4242).is_none());
    }
}
