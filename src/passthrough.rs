use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

use crate::paths;
use crate::ssh_config::model::Host;
use crate::ssh_config::{parser, writer};

/// SSH options that consume the following argument as their value.
const OPTS_WITH_VALUE: &[&str] = &[
    "-b", "-c", "-D", "-E", "-e", "-F", "-I", "-i", "-J", "-L", "-l", "-m", "-o", "-p", "-Q",
    "-R", "-S", "-w", "-W",
];

/// Boolean SSH options that take no value.
const OPTS_BOOLEAN: &[&str] = &[
    "-4", "-6", "-A", "-a", "-C", "-f", "-G", "-g", "-K", "-k", "-M", "-N", "-n", "-q", "-s",
    "-T", "-t", "-V", "-X", "-x", "-Y", "-y",
];

/// True when argv looks like an invocation of the real SSH client: any
/// argument containing `@`, or any recognized SSH short option.
pub fn looks_like_ssh_args(args: &[String]) -> bool {
    args.iter().any(|arg| {
        arg.contains('@')
            || OPTS_WITH_VALUE.contains(&arg.as_str())
            || OPTS_BOOLEAN.contains(&arg.as_str())
    })
}

/// Pre-scan argv for a config override, before any flag parsing happens.
/// Accepts `--config PATH`, `--config=PATH` and the single-dash variants.
pub fn extract_config_flag(args: &[String]) -> Option<String> {
    for (i, arg) in args.iter().enumerate() {
        if (arg == "--config" || arg == "-config") && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(path.to_string());
        }
        if let Some(path) = arg.strip_prefix("-config=") {
            return Some(path.to_string());
        }
    }
    None
}

#[derive(Debug, Default, PartialEq)]
struct SshTarget {
    dest: String,
    port: String,
    user: String,
    identity: String,
}

/// Walk SSH-style argv and pull out the destination plus the `-p`, `-l`
/// and `-i` values, skipping the value of every other option known to take
/// one. The destination is the first positional argument.
fn parse_ssh_target(args: &[String]) -> SshTarget {
    let mut target = SshTarget::default();
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "-p" if i + 1 < args.len() => {
                target.port = args[i + 1].clone();
                i += 2;
            }
            "-l" if i + 1 < args.len() => {
                target.user = args[i + 1].clone();
                i += 2;
            }
            "-i" if i + 1 < args.len() => {
                target.identity = args[i + 1].clone();
                i += 2;
            }
            _ if OPTS_WITH_VALUE.contains(&arg) && i + 1 < args.len() => {
                i += 2;
            }
            _ => {
                if !arg.starts_with('-') && target.dest.is_empty() {
                    target.dest = arg.to_string();
                }
                i += 1;
            }
        }
    }
    target
}

/// Auto-register an unknown destination, then hand argv to the system ssh
/// client unchanged. Returns the child's exit code.
pub fn run(args: &[String], config_override: Option<&str>) -> Result<i32> {
    let target = parse_ssh_target(args);
    if target.dest.is_empty() {
        bail!("no destination found in arguments");
    }

    let config_path = match config_override {
        Some(path) => PathBuf::from(path),
        None => paths::ssh_config_path(),
    };

    match auto_register(&target, &config_path) {
        Ok(Some(alias)) => eprintln!("skiff: saved '{alias}' to SSH config"),
        Ok(None) => {}
        Err(e) => eprintln!("skiff: warning: could not save host to config: {e:#}"),
    }

    // Hand off with the original argv unchanged; the child owns the tty.
    let status = Command::new("ssh")
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .context("failed to launch ssh")?;
    Ok(status.code().unwrap_or(1))
}

/// Append the destination to the config when its hostname is not already
/// there. Returns the alias it was saved under, if it was.
fn auto_register(target: &SshTarget, config_path: &Path) -> Result<Option<String>> {
    let (user, hostname) = match target.dest.split_once('@') {
        Some((dest_user, host)) => {
            let user = if target.user.is_empty() {
                dest_user.to_string()
            } else {
                target.user.clone()
            };
            (user, host.to_string())
        }
        None => (target.user.clone(), target.dest.clone()),
    };

    let port = if target.port.is_empty() {
        "22".to_string()
    } else {
        target.port.clone()
    };

    // A config that cannot be parsed just means no hosts are known yet.
    let hosts = parser::parse(config_path)
        .map(|parsed| parsed.hosts)
        .unwrap_or_default();
    if writer::is_known(&hosts, &hostname) {
        return Ok(None);
    }

    let alias = if user.is_empty() {
        hostname.clone()
    } else {
        format!("{user}-{hostname}")
    };
    let identity = if target.identity.is_empty() {
        String::new()
    } else {
        std::path::absolute(&target.identity)
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|_| target.identity.clone())
    };

    let backup_path = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("config.bak");
    let host = Host {
        alias: alias.clone(),
        hostname,
        user,
        port,
        identity_file: identity,
        ..Host::default()
    };
    writer::append_host(config_path, &backup_path, &host)?;
    Ok(Some(alias))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn at_sign_triggers_the_heuristic() {
        assert!(looks_like_ssh_args(&args(&["deploy@example.com"])));
    }

    #[test]
    fn ssh_short_options_trigger_the_heuristic() {
        assert!(looks_like_ssh_args(&args(&["-p", "2222", "example.com"])));
        assert!(looks_like_ssh_args(&args(&["-i", "/tmp/key", "host"])));
        assert!(looks_like_ssh_args(&args(&["-4", "host"])));
    }

    #[test]
    fn skiff_flags_do_not_trigger_the_heuristic() {
        assert!(!looks_like_ssh_args(&args(&["--version"])));
        assert!(!looks_like_ssh_args(&args(&["--config", "/tmp/config"])));
        assert!(!looks_like_ssh_args(&args(&["--no-frequent"])));
        assert!(!looks_like_ssh_args(&args(&[])));
    }

    #[test]
    fn extract_config_flag_handles_all_forms() {
        assert_eq!(
            extract_config_flag(&args(&["--config", "/a/b"])),
            Some("/a/b".to_string())
        );
        assert_eq!(
            extract_config_flag(&args(&["--config=/a/b"])),
            Some("/a/b".to_string())
        );
        assert_eq!(
            extract_config_flag(&args(&["-config", "/a/b"])),
            Some("/a/b".to_string())
        );
        assert_eq!(
            extract_config_flag(&args(&["-config=/a/b"])),
            Some("/a/b".to_string())
        );
        assert_eq!(extract_config_flag(&args(&["--config"])), None);
        assert_eq!(extract_config_flag(&args(&["host"])), None);
    }

    #[test]
    fn parse_target_extracts_destination_and_values() {
        let target = parse_ssh_target(&args(&["deploy@new.example.com", "-p", "2222", "-i", "/tmp/k"]));
        assert_eq!(target.dest, "deploy@new.example.com");
        assert_eq!(target.port, "2222");
        assert_eq!(target.identity, "/tmp/k");
        assert_eq!(target.user, "");
    }

    #[test]
    fn parse_target_skips_option_value_pairs() {
        // "ProxyCommand ..." must not be mistaken for the destination.
        let target = parse_ssh_target(&args(&["-o", "ProxyCommand=nc %h %p", "-L", "8080:localhost:80", "host"]));
        assert_eq!(target.dest, "host");
    }

    #[test]
    fn parse_target_takes_first_positional_only() {
        let target = parse_ssh_target(&args(&["first", "second"]));
        assert_eq!(target.dest, "first");
    }

    #[test]
    fn parse_target_explicit_user_flag() {
        let target = parse_ssh_target(&args(&["-l", "root", "host.example.com"]));
        assert_eq!(target.user, "root");
        assert_eq!(target.dest, "host.example.com");
    }

    #[test]
    fn auto_register_appends_unknown_destination() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config");
        fs::write(&config_path, "Host existing\nHostname old.com\n").unwrap();

        let target = parse_ssh_target(&args(&["deploy@new.example.com", "-p", "2222", "-i", "/tmp/k"]));
        let saved = auto_register(&target, &config_path).unwrap();
        assert_eq!(saved.as_deref(), Some("deploy-new.example.com"));

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("Host deploy-new.example.com\n"));
        assert!(content.contains("    Hostname new.example.com\n"));
        assert!(content.contains("    User deploy\n"));
        assert!(content.contains("    Port 2222\n"));
        assert!(content.contains("IdentityFile \"/tmp/k\"\n"));

        // The backup holds only the original two lines.
        let backup = fs::read_to_string(dir.path().join("config.bak")).unwrap();
        assert_eq!(backup, "Host existing\nHostname old.com\n");
    }

    #[test]
    fn auto_register_skips_known_hostname() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config");
        fs::write(&config_path, "Host existing\nHostname known.example.com\n").unwrap();

        let target = parse_ssh_target(&args(&["root@known.example.com"]));
        let saved = auto_register(&target, &config_path).unwrap();
        assert_eq!(saved, None);

        let content = fs::read_to_string(&config_path).unwrap();
        assert_eq!(content.matches("Host ").count(), 1);
    }

    #[test]
    fn auto_register_without_user_uses_bare_hostname_alias() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config");

        let target = parse_ssh_target(&args(&["-p", "8022", "plain.example.com"]));
        let saved = auto_register(&target, &config_path).unwrap();
        assert_eq!(saved.as_deref(), Some("plain.example.com"));

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.starts_with("Host plain.example.com\n"));
        assert!(!content.contains("User"));
    }

    #[test]
    fn auto_register_defaults_port_to_22() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config");

        let target = parse_ssh_target(&args(&["root@fresh.example.com"]));
        auto_register(&target, &config_path).unwrap();

        // Default port is elided from the block.
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(!content.contains("Port"));
    }

    #[test]
    fn auto_register_prefers_explicit_l_user() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config");

        let target = parse_ssh_target(&args(&["-l", "admin", "embedded@host.example.com"]));
        let saved = auto_register(&target, &config_path).unwrap();
        assert_eq!(saved.as_deref(), Some("admin-host.example.com"));

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("    User admin\n"));
    }

    #[test]
    fn auto_register_resolves_identity_to_absolute() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config");

        let target = parse_ssh_target(&args(&["-i", "relative_key", "root@id.example.com"]));
        auto_register(&target, &config_path).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        let line = content
            .lines()
            .find(|l| l.contains("IdentityFile"))
            .unwrap();
        let quoted = line.trim().strip_prefix("IdentityFile ").unwrap();
        let path = quoted.trim_matches('"');
        assert!(Path::new(path).is_absolute(), "got: {path}");
        assert!(path.ends_with("relative_key"));
    }
}
