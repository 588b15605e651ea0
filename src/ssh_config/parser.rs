use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::model::{Host, ParsedConfig};

/// Parse the SSH config file at `path`.
///
/// Hosts appear in file order, with hosts from included files spliced in at
/// their point of inclusion. Only an unreadable root file is an error;
/// broken includes emit a warning on stderr and are skipped.
pub fn parse(path: &Path) -> Result<ParsedConfig> {
    let mut visited = HashSet::new();
    let hosts = parse_file(path, &mut visited)?;
    Ok(ParsedConfig {
        hosts,
        source: path.to_path_buf(),
    })
}

fn parse_file(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Vec<Host>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read SSH config at {}", path.display()))?;

    // Include chains can loop; canonical paths break the cycle.
    let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical) {
        return Ok(Vec::new());
    }

    let config_dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();

    let mut hosts: Vec<Host> = Vec::new();
    let mut current: Option<Host> = None;
    let mut prev_line = "";

    for (idx, line) in content.lines().enumerate() {
        let line_num = idx + 1;
        let trimmed = line.trim();

        // Blank and comment lines are not directives but still feed the
        // previous-line buffer: a magic comment only attaches to a Host
        // directive on the line directly below it.
        if trimmed.is_empty() || trimmed.starts_with('#') {
            prev_line = line;
            continue;
        }

        let Some((keyword, value)) = split_directive(trimmed) else {
            prev_line = line;
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "host" => {
                finalize(current.take(), &mut hosts);
                current = Some(Host {
                    alias: value.to_string(),
                    groups: parse_magic_comment(prev_line),
                    source_file: path.to_path_buf(),
                    line_start: line_num,
                    ..Host::default()
                });
            }
            "hostname" => {
                if let Some(host) = current.as_mut() {
                    host.hostname = value.to_string();
                }
            }
            "user" => {
                if let Some(host) = current.as_mut() {
                    host.user = value.to_string();
                }
            }
            "port" => {
                if let Some(host) = current.as_mut() {
                    host.port = value.to_string();
                }
            }
            "identityfile" => {
                if let Some(host) = current.as_mut() {
                    host.identity_file = strip_quotes(value).to_string();
                }
            }
            "include" => {
                finalize(current.take(), &mut hosts);
                resolve_include(value, &config_dir, visited, &mut hosts);
            }
            _ => {}
        }

        prev_line = line;
    }

    finalize(current.take(), &mut hosts);
    Ok(hosts)
}

/// Close an open block: default the port, drop the global-defaults block.
fn finalize(current: Option<Host>, hosts: &mut Vec<Host>) {
    if let Some(mut host) = current {
        if host.alias == "*" {
            return;
        }
        if host.port.is_empty() {
            host.port = "22".to_string();
        }
        hosts.push(host);
    }
}

/// Expand an Include value and recurse into every matched file.
/// Failures here never abort the parse.
fn resolve_include(
    pattern: &str,
    config_dir: &Path,
    visited: &mut HashSet<PathBuf>,
    hosts: &mut Vec<Host>,
) {
    let expanded = expand_tilde(pattern);
    let full = if expanded.is_absolute() {
        expanded
    } else {
        // Relative includes resolve against the directory of the file
        // currently being parsed, not the root config.
        config_dir.join(expanded)
    };

    let matches: Vec<PathBuf> = match glob::glob(&full.to_string_lossy()) {
        Ok(paths) => paths.filter_map(|p| p.ok()).collect(),
        Err(e) => {
            eprintln!("skiff: warning: include {pattern:?}: {e}");
            return;
        }
    };

    if matches.is_empty() {
        eprintln!("skiff: warning: include {:?}: no files matched", full.display());
        return;
    }

    for matched in matches {
        let canonical = fs::canonicalize(&matched).unwrap_or_else(|_| matched.clone());
        if visited.contains(&canonical) {
            continue;
        }
        match parse_file(&matched, visited) {
            Ok(included) => hosts.extend(included),
            Err(e) => eprintln!("skiff: warning: include {:?}: {e:#}", matched.display()),
        }
    }
}

/// Split a trimmed line into keyword and value at the first whitespace run.
/// Lines with a keyword and no value are not directives.
fn split_directive(trimmed: &str) -> Option<(&str, &str)> {
    let idx = trimmed.find(char::is_whitespace)?;
    Some((&trimmed[..idx], trimmed[idx..].trim()))
}

/// Extract group tags from a magic comment line: `# @group Work, Personal`.
/// Returns an empty list for anything else.
pub(crate) fn parse_magic_comment(line: &str) -> Vec<String> {
    let Some(rest) = line.trim().strip_prefix('#') else {
        return Vec::new();
    };
    let Some(tags) = rest.trim_start().strip_prefix("@group") else {
        return Vec::new();
    };
    tags.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip exactly one pair of surrounding double quotes.
fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn expand_tilde(pattern: &str) -> PathBuf {
    if let Some(rest) = pattern.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if pattern == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(pattern)
}
