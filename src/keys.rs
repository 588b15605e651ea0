use std::path::{Path, PathBuf};

/// Discover usable identity files: every `*.pub` in `dir` whose private
/// counterpart exists next to it. Returns the private-key paths.
pub fn scan_identity_files(dir: &Path) -> Vec<PathBuf> {
    let pattern = dir.join("*.pub");
    let mut keys = Vec::new();
    if let Ok(matches) = glob::glob(&pattern.to_string_lossy()) {
        for pub_file in matches.filter_map(|m| m.ok()) {
            let private = pub_file.with_extension("");
            if private.is_file() {
                keys.push(private);
            }
        }
    }
    keys
}

/// Display label for an identity file.
pub fn key_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn only_keys_with_both_halves_are_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("id_ed25519"), "private").unwrap();
        fs::write(dir.path().join("id_ed25519.pub"), "public").unwrap();
        fs::write(dir.path().join("orphan.pub"), "public only").unwrap();
        fs::write(dir.path().join("known_hosts"), "").unwrap();

        let keys = scan_identity_files(dir.path());
        assert_eq!(keys.len(), 1);
        assert!(keys[0].ends_with("id_ed25519"));
    }

    #[test]
    fn empty_dir_yields_no_keys() {
        let dir = TempDir::new().unwrap();
        assert!(scan_identity_files(dir.path()).is_empty());
    }

    #[test]
    fn label_is_the_file_name() {
        assert_eq!(key_label(Path::new("/home/u/.ssh/id_rsa")), "id_rsa");
        assert_eq!(key_label(Path::new("id_ed25519")), "id_ed25519");
    }
}
