use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};

use crate::ssh_config::model::Host;

/// Build the argument list for the system `ssh` binary:
/// `[-i identity] [-p port] [-l user] alias`, defaults elided.
pub fn build_ssh_args(host: &Host, identity: &str) -> Vec<String> {
    let mut args = Vec::new();

    if !identity.is_empty() {
        args.push("-i".to_string());
        args.push(identity.to_string());
    }
    if !host.port.is_empty() && host.port != "22" {
        args.push("-p".to_string());
        args.push(host.port.clone());
    }
    if !host.user.is_empty() {
        args.push("-l".to_string());
        args.push(host.user.clone());
    }
    args.push(host.alias.clone());

    args
}

/// Launch `ssh` for the given host with inherited stdio and block until it
/// exits. The child owns the terminal for its whole lifetime.
pub fn connect(host: &Host, identity: &str) -> Result<ExitStatus> {
    Command::new("ssh")
        .args(build_ssh_args(host, identity))
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("failed to launch ssh for '{}'", host.alias))
}
