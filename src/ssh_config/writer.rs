use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::model::Host;

/// True if any host in the list already has the given hostname.
pub fn is_known(hosts: &[Host], hostname: &str) -> bool {
    hosts.iter().any(|h| h.hostname == hostname)
}

/// Serialize a host to its config-file block text.
/// A magic group comment is prepended when the host has groups; the
/// default port is elided; the identity file is written quoted.
pub fn serialize_host(host: &Host) -> String {
    let mut block = String::new();
    if !host.groups.is_empty() {
        block.push_str(&format!("# @group {}\n", host.groups.join(", ")));
    }
    block.push_str(&format!("Host {}\n", host.alias));
    block.push_str(&format!("    Hostname {}\n", host.hostname));
    if !host.user.is_empty() {
        block.push_str(&format!("    User {}\n", host.user));
    }
    if !host.port.is_empty() && host.port != "22" {
        block.push_str(&format!("    Port {}\n", host.port));
    }
    if !host.identity_file.is_empty() {
        block.push_str(&format!("    IdentityFile \"{}\"\n", host.identity_file));
    }
    block
}

/// Append a new host block to the config file.
///
/// The file's pre-call bytes are copied to `backup_path` first. An absent
/// config is treated as empty and created with private permissions; the
/// new block lands at offset zero with no leading blank line in that case.
pub fn append_host(config_path: &Path, backup_path: &Path, host: &Host) -> Result<()> {
    let original = match fs::read(config_path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", config_path.display()));
        }
    };

    write_private(backup_path, &original)
        .with_context(|| format!("failed to write backup {}", backup_path.display()))?;

    let mut file = open_append(config_path)
        .with_context(|| format!("failed to open {} for appending", config_path.display()))?;
    if !original.is_empty() {
        file.write_all(b"\n")
            .with_context(|| format!("failed to write to {}", config_path.display()))?;
    }
    file.write_all(serialize_host(host).as_bytes())
        .with_context(|| format!("failed to write host block to {}", config_path.display()))?;

    Ok(())
}

/// Replace the block identified by `host.source_file` and `host.line_start`
/// with a freshly serialized block built from `host`.
///
/// Returns the new 1-based line of the `Host` directive and the signed
/// change in line count. Callers must add the delta to the tracked
/// `line_start` of every other host in the same file whose original
/// position was below the edited block; that keeps tracked positions in
/// step with the file without a re-parse.
pub fn replace_host_block(host: &Host) -> Result<(usize, isize)> {
    if host.line_start == 0 {
        bail!("stale line reference: host has no tracked line position");
    }

    let raw = fs::read(&host.source_file)
        .with_context(|| format!("failed to read {}", host.source_file.display()))?;
    let text = String::from_utf8_lossy(&raw);
    let lines: Vec<&str> = text.lines().collect();

    let backup_path = sibling(&host.source_file, ".bak");
    write_private(&backup_path, &raw)
        .with_context(|| format!("failed to write backup {}", backup_path.display()))?;

    let mut block_start = host.line_start - 1;
    if block_start >= lines.len() {
        bail!(
            "stale line reference {}: file has only {} lines",
            host.line_start,
            lines.len()
        );
    }

    // Tolerate line_start pointing at the block's magic comment instead of
    // the Host directive (drift left over from an earlier save).
    if !line_starts_block(lines[block_start]) {
        if lines[block_start].contains("@group")
            && block_start + 1 < lines.len()
            && line_starts_block(lines[block_start + 1])
        {
            block_start += 1;
        } else {
            bail!(
                "stale line reference {}: expected a 'Host' directive, found {:?}",
                host.line_start,
                lines[block_start]
            );
        }
    }

    // A magic comment directly above the Host line is part of this block.
    let magic_start = if block_start > 0 && lines[block_start - 1].contains("@group") {
        block_start - 1
    } else {
        block_start
    };

    let block_end = find_block_end(&lines, block_start);

    let new_block = serialize_host(host);
    let new_block_lines: Vec<&str> = new_block.lines().collect();

    let mut result: Vec<&str> =
        Vec::with_capacity(magic_start + new_block_lines.len() + lines.len() - block_end);
    result.extend_from_slice(&lines[..magic_start]);
    result.extend_from_slice(&new_block_lines);
    result.extend_from_slice(&lines[block_end..]);

    let mut output = result.join("\n");
    if raw.last() == Some(&b'\n') && !output.ends_with('\n') {
        output.push('\n');
    }

    let tmp_path = sibling(&host.source_file, ".tmp");
    write_private(&tmp_path, output.as_bytes())
        .with_context(|| format!("failed to write {}", tmp_path.display()))?;
    if let Err(e) = fs::rename(&tmp_path, &host.source_file) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e).with_context(|| format!("failed to replace {}", host.source_file.display()));
    }

    let mut new_line_start = magic_start + 1;
    if !host.groups.is_empty() {
        new_line_start += 1;
    }
    let line_delta = new_block_lines.len() as isize - (block_end - magic_start) as isize;

    Ok((new_line_start, line_delta))
}

/// Index of the first line belonging to the next block (or `lines.len()`).
/// A magic comment attached to the next block, and any run of blank lines
/// before it, stay in the "after" region so they survive the rewrite.
fn find_block_end(lines: &[&str], block_start: usize) -> usize {
    for i in block_start + 1..lines.len() {
        if line_starts_block(lines[i]) {
            let mut end = i;
            if end > block_start + 1 && lines[end - 1].contains("@group") {
                end -= 1;
            }
            while end > block_start + 1 && lines[end - 1].trim().is_empty() {
                end -= 1;
            }
            return end;
        }
    }
    lines.len()
}

/// True when the line's first keyword is `Host` (not a blank or comment).
fn line_starts_block(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return false;
    }
    trimmed
        .split_whitespace()
        .next()
        .is_some_and(|keyword| keyword.eq_ignore_ascii_case("host"))
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(unix)]
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
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
fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    fs::write(path, bytes)
}

#[cfg(unix)]
fn open_append(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .append(true)
        .create(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_append(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new().append(true).create(true).open(path)
}
