use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::paths;
use crate::ssh_config::model::Host;

/// Persisted per-alias connection counts, used to float common hosts to
/// the top of the list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct State {
    /// Connection count per host alias.
    #[serde(default)]
    pub connections: HashMap<String, u32>,
    #[serde(default)]
    pub first_run: bool,
}

impl State {
    /// Load the state file. Never fails: a missing file is a first run and
    /// a corrupt one a fresh table.
    pub fn load(path: &Path) -> State {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return State {
                    first_run: true,
                    ..State::default()
                };
            }
            Err(_) => return State::default(),
        };
        serde_json::from_slice(&data).unwrap_or_default()
    }

    /// Save atomically: private temp file next to the target, then rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let data = serde_json::to_string_pretty(self).context("failed to serialize state")?;

        let mut tmp_name = path.as_os_str().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        write_private(&tmp_path, data.as_bytes())
            .with_context(|| format!("failed to write {}", tmp_path.display()))?;
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e).with_context(|| format!("failed to replace {}", path.display()));
        }
        Ok(())
    }

    /// Bump the connection count for an alias.
    pub fn record(&mut self, alias: &str) {
        *self.connections.entry(alias.to_string()).or_insert(0) += 1;
    }

    /// The top `n` most-connected hosts from `candidates`, count descending.
    /// Ties keep their relative order from `candidates`. Hosts never
    /// connected to are excluded; `n == 0` means no limit.
    pub fn frequent_hosts(&self, candidates: &[Host], n: usize) -> Vec<Host> {
        let mut frequent: Vec<Host> = candidates
            .iter()
            .filter(|h| self.count(&h.alias) > 0)
            .cloned()
            .collect();
        frequent.sort_by(|a, b| self.count(&b.alias).cmp(&self.count(&a.alias)));
        if n > 0 && n < frequent.len() {
            frequent.truncate(n);
        }
        frequent
    }

    fn count(&self, alias: &str) -> u32 {
        self.connections.get(alias).copied().unwrap_or(0)
    }
}

#[cfg(unix)]
fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(bytes)
}

#[cfg(not(unix))]
fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
    fs::write(path, bytes)
}
