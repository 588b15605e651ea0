use std::io;
use std::path::{Path, PathBuf};

/// The user's SSH config file.
pub fn ssh_config_path() -> PathBuf {
    home().join(".ssh").join("config")
}

/// Sibling backup written before any config mutation.
pub fn ssh_config_backup_path() -> PathBuf {
    home().join(".ssh").join("config.bak")
}

/// The persisted frequency table.
/// Unix: `$XDG_CONFIG_HOME` (or `~/.config`)`/skiff/state.json`;
/// Windows: `%LOCALAPPDATA%\skiff\state.json`.
pub fn state_file_path() -> PathBuf {
    dirs::config_local_dir()
        .unwrap_or_else(|| home().join(".config"))
        .join("skiff")
        .join("state.json")
}

/// Directory scanned for identity files.
pub fn ssh_key_dir() -> PathBuf {
    home().join(".ssh")
}

/// Create a directory and any missing parents.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    std::fs::create_dir_all(path)
}

fn home() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}
