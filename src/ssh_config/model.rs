use std::path::PathBuf;

/// A single host entry drawn from the SSH config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Host {
    /// The alias after the `Host` keyword, used for display and as the ssh target.
    pub alias: String,
    pub hostname: String,
    pub user: String,
    /// Port as written in the file; `"22"` when the directive is absent.
    pub port: String,
    /// IdentityFile value with one pair of surrounding double quotes stripped.
    pub identity_file: String,
    /// Group tags from a `# @group ...` comment directly above the block.
    pub groups: Vec<String>,
    /// The file this host was parsed from (root config or an include).
    pub source_file: PathBuf,
    /// 1-based line of the `Host` directive. 0 means untracked; the writer
    /// refuses to edit such a host.
    pub line_start: usize,
}

impl Host {
    /// Text the fuzzy filter matches against: alias, hostname and groups.
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.alias, self.hostname, self.groups.join(" "))
    }
}

/// A fully parsed configuration: hosts in file order, with included files
/// spliced in at their point of inclusion.
#[derive(Debug, Clone, Default)]
pub struct ParsedConfig {
    pub hosts: Vec<Host>,
    /// The root config file the parse started from.
    pub source: PathBuf,
}
