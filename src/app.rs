use std::path::PathBuf;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::keys;
use crate::ssh_config::model::Host;
use crate::ssh_config::writer;
use crate::state::State;

/// Which edit-form field is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Alias,
    Hostname,
    User,
    Port,
    IdentityFile,
    Groups,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Alias,
        Field::Hostname,
        Field::User,
        Field::Port,
        Field::IdentityFile,
        Field::Groups,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Alias => "Alias",
            Field::Hostname => "Host / IP",
            Field::User => "User",
            Field::Port => "Port",
            Field::IdentityFile => "Identity File",
            Field::Groups => "Groups",
        }
    }
}

/// Edit-form state: six parallel field buffers plus the host being edited.
/// Groups are edited as one comma-separated string.
#[derive(Debug, Clone)]
pub struct EditForm {
    pub original: Host,
    pub fields: [String; Field::ALL.len()],
    pub active: Field,
    pub status: Option<String>,
}

impl EditForm {
    pub fn from_host(host: &Host) -> Self {
        let mut fields: [String; Field::ALL.len()] = Default::default();
        fields[Field::Alias as usize] = host.alias.clone();
        fields[Field::Hostname as usize] = host.hostname.clone();
        fields[Field::User as usize] = host.user.clone();
        fields[Field::Port as usize] = host.port.clone();
        fields[Field::IdentityFile as usize] = host.identity_file.clone();
        fields[Field::Groups as usize] = host.groups.join(", ");
        Self {
            original: host.clone(),
            fields,
            active: Field::Alias,
            status: None,
        }
    }

    pub fn value(&self, field: Field) -> &str {
        &self.fields[field as usize]
    }

    pub fn active_value_mut(&mut self) -> &mut String {
        &mut self.fields[self.active as usize]
    }
}

/// Interaction mode. The Edit variant owns the form, so form state cannot
/// exist outside Edit mode.
#[derive(Debug, Clone)]
pub enum Mode {
    Normal,
    Search,
    Edit(EditForm),
    IdentityPicker { keys: Vec<PathBuf>, cursor: usize },
}

/// Status message shown in the bottom bar until its timer runs out.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub tick_count: u32,
}

/// A connection the main loop should run once the current update finishes.
#[derive(Debug, Clone)]
pub struct PendingConnect {
    pub host: Host,
    pub identity: String,
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub mode: Mode,

    /// Presentation-ordered host list: frequent first, rest alphabetical.
    pub all_hosts: Vec<Host>,
    /// Subsequence currently shown, ranked by the active query.
    pub filtered: Vec<Host>,
    pub cursor: usize,
    pub viewport: usize,
    pub view_height: usize,

    pub search_query: String,

    pub state: State,
    pub state_path: PathBuf,
    pub config_path: PathBuf,
    pub backup_path: PathBuf,

    pub status: Option<StatusMessage>,
    pub pending_connect: Option<PendingConnect>,
}

impl App {
    /// Build the model. Frequent hosts come first in connection-count
    /// order; everything else follows alphabetically by alias.
    pub fn new(
        hosts: Vec<Host>,
        state: State,
        state_path: PathBuf,
        config_path: PathBuf,
        backup_path: PathBuf,
        no_frequent: bool,
    ) -> Self {
        let frequent = if no_frequent {
            Vec::new()
        } else {
            state.frequent_hosts(&hosts, hosts.len())
        };

        let mut remaining: Vec<Host> = hosts
            .iter()
            .filter(|h| {
                !frequent
                    .iter()
                    .any(|f| f.alias == h.alias && f.source_file == h.source_file)
            })
            .cloned()
            .collect();
        remaining.sort_by(|a, b| {
            a.alias
                .to_lowercase()
                .cmp(&b.alias.to_lowercase())
        });

        let mut all_hosts = frequent;
        all_hosts.extend(remaining);
        let filtered = all_hosts.clone();

        Self {
            running: true,
            mode: Mode::Normal,
            all_hosts,
            filtered,
            cursor: 0,
            viewport: 0,
            view_height: 20,
            search_query: String::new(),
            state,
            state_path,
            config_path,
            backup_path,
            status: None,
            pending_connect: None,
        }
    }

    /// Selected host, if the filtered list is non-empty.
    pub fn selected_host(&self) -> Option<&Host> {
        self.filtered.get(self.cursor)
    }

    // --- Cursor and viewport ---

    /// Move down one row, wrapping to the top. The viewport follows so the
    /// cursor stays on screen.
    pub fn move_cursor_down(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.filtered.len();
        if self.cursor == 0 {
            self.viewport = 0;
        } else if self.cursor >= self.viewport + self.view_height {
            self.viewport = self.cursor + 1 - self.view_height;
        }
    }

    /// Move up one row, wrapping to the bottom.
    pub fn move_cursor_up(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        self.cursor = (self.cursor + self.filtered.len() - 1) % self.filtered.len();
        if self.cursor == self.filtered.len() - 1 {
            self.viewport = self.filtered.len().saturating_sub(self.view_height);
        } else if self.cursor < self.viewport {
            self.viewport = self.cursor;
        }
    }

    /// Re-establish the scroll invariant after the view height changes.
    pub fn clamp_viewport(&mut self) {
        if self.view_height == 0 {
            return;
        }
        if self.cursor < self.viewport {
            self.viewport = self.cursor;
        } else if self.cursor >= self.viewport + self.view_height {
            self.viewport = self.cursor + 1 - self.view_height;
        }
    }

    // --- Search ---

    /// Rank hosts against the current query and reset the scroll. An empty
    /// query shows the full presentation order.
    pub fn apply_search(&mut self) {
        if self.search_query.is_empty() {
            self.filtered = self.all_hosts.clone();
        } else {
            let matcher = SkimMatcherV2::default();
            let mut scored: Vec<(i64, &Host)> = self
                .all_hosts
                .iter()
                .filter_map(|h| {
                    matcher
                        .fuzzy_match(&h.search_text(), &self.search_query)
                        .map(|score| (score, h))
                })
                .collect();
            scored.sort_by(|a, b| b.0.cmp(&a.0));
            self.filtered = scored.into_iter().map(|(_, h)| h.clone()).collect();
        }
        self.cursor = 0;
        self.viewport = 0;
    }

    // --- Edit form ---

    /// Open the edit form for the selected host.
    pub fn open_edit_form(&mut self) {
        let Some(host) = self.selected_host().cloned() else {
            self.set_status("No host selected.", true);
            return;
        };
        if host.line_start == 0 {
            self.set_status("Cannot edit: host has no tracked line position.", true);
            return;
        }
        self.mode = Mode::Edit(EditForm::from_host(&host));
    }

    /// Validate and save the edit form.
    ///
    /// On success the rewritten block's new position comes back from the
    /// writer; every other host in the same file below the edited block is
    /// shifted by the returned delta, so tracked positions stay correct
    /// without a re-parse. On any failure the form stays open with a
    /// message.
    pub fn save_edit(&mut self) {
        let Mode::Edit(form) = &mut self.mode else {
            return;
        };

        let alias = form.value(Field::Alias).trim().to_string();
        let hostname = form.value(Field::Hostname).trim().to_string();
        if alias.is_empty() {
            form.status = Some("Alias cannot be empty.".to_string());
            return;
        }
        if hostname.is_empty() {
            form.status = Some("Hostname cannot be empty.".to_string());
            return;
        }

        let mut port = form.value(Field::Port).trim().to_string();
        if port.is_empty() {
            port = "22".to_string();
        }

        let groups: Vec<String> = form
            .value(Field::Groups)
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect();

        let mut updated = form.original.clone();
        updated.alias = alias;
        updated.hostname = hostname;
        updated.user = form.value(Field::User).trim().to_string();
        updated.port = port;
        updated.identity_file = form.value(Field::IdentityFile).trim().to_string();
        updated.groups = groups;

        let original_line_start = form.original.line_start;
        let source_file = form.original.source_file.clone();

        let (new_line_start, line_delta) = match writer::replace_host_block(&updated) {
            Ok(result) => result,
            Err(e) => {
                form.status = Some(format!("Save failed: {e:#}"));
                return;
            }
        };
        updated.line_start = new_line_start;

        let edited_idx = self
            .all_hosts
            .iter()
            .position(|h| h.source_file == source_file && h.line_start == original_line_start);

        // Shift by original positions first, then swap in the edited host.
        for (i, h) in self.all_hosts.iter_mut().enumerate() {
            if Some(i) == edited_idx {
                continue;
            }
            if h.source_file == source_file && h.line_start > original_line_start {
                h.line_start = h.line_start.saturating_add_signed(line_delta);
            }
        }
        let saved_alias = updated.alias.clone();
        if let Some(idx) = edited_idx {
            self.all_hosts[idx] = updated;
        }

        self.apply_search();
        self.mode = Mode::Normal;
        self.set_status(format!("Saved '{saved_alias}'."), false);
    }

    // --- Connect ---

    /// Queue a connection to the selected host. Records the connection and
    /// persists the table first; a brand-new hostname is appended to the
    /// config. Neither failure blocks the connection itself.
    pub fn connect_selected(&mut self, identity: String) {
        let Some(host) = self.selected_host().cloned() else {
            return;
        };

        self.state.record(&host.alias);
        if let Err(e) = self.state.save(&self.state_path) {
            self.set_status(format!("Could not save history: {e:#}"), true);
        }

        if !writer::is_known(&self.all_hosts, &host.hostname) {
            if let Err(e) = writer::append_host(&self.config_path, &self.backup_path, &host) {
                self.set_status(format!("Could not save host to config: {e:#}"), true);
            }
        }

        self.pending_connect = Some(PendingConnect { host, identity });
    }

    // --- Identity picker ---

    /// Open the identity picker for the selected host.
    pub fn open_identity_picker(&mut self) {
        if self.selected_host().is_none() {
            return;
        }
        let keys = keys::scan_identity_files(&crate::paths::ssh_key_dir());
        if keys.is_empty() {
            self.set_status("No identity files found in ~/.ssh.", true);
            return;
        }
        self.mode = Mode::IdentityPicker { keys, cursor: 0 };
    }

    // --- Status bar ---

    pub fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error,
            tick_count: 0,
        });
    }

    /// Age out the status message. Errors linger longer than confirmations.
    pub fn tick_status(&mut self) {
        if let Some(status) = self.status.as_mut() {
            status.tick_count += 1;
            let timeout = if status.is_error { 20 } else { 12 };
            if status.tick_count > timeout {
                self.status = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssh_config::parser;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn make_hosts(aliases: &[&str]) -> Vec<Host> {
        aliases
            .iter()
            .enumerate()
            .map(|(i, alias)| Host {
                alias: alias.to_string(),
                hostname: format!("{alias}.example.com"),
                user: "user".to_string(),
                port: "22".to_string(),
                source_file: PathBuf::from("/home/user/.ssh/config"),
                line_start: i * 3 + 1,
                ..Host::default()
            })
            .collect()
    }

    fn make_state(counts: &[(&str, u32)]) -> State {
        State {
            connections: counts
                .iter()
                .map(|(alias, n)| (alias.to_string(), *n))
                .collect::<HashMap<_, _>>(),
            first_run: false,
        }
    }

    fn make_app(hosts: Vec<Host>, state: State) -> App {
        App::new(
            hosts,
            state,
            PathBuf::from("/tmp/state.json"),
            PathBuf::from("/tmp/config"),
            PathBuf::from("/tmp/config.bak"),
            false,
        )
    }

    fn make_file_app(dir: &TempDir, config_path: &std::path::Path, hosts: Vec<Host>) -> App {
        App::new(
            hosts,
            State::default(),
            dir.path().join("state.json"),
            config_path.to_path_buf(),
            dir.path().join("config.bak"),
            true,
        )
    }

    #[test]
    fn new_puts_frequent_hosts_first_then_alphabetical() {
        let app = make_app(make_hosts(&["beta", "alpha", "gamma"]), make_state(&[("gamma", 5)]));
        let aliases: Vec<&str> = app.all_hosts.iter().map(|h| h.alias.as_str()).collect();
        assert_eq!(aliases, vec!["gamma", "alpha", "beta"]);
        assert_eq!(app.filtered.len(), 3);
    }

    #[test]
    fn no_frequent_flag_gives_flat_alphabetical_order() {
        let app = App::new(
            make_hosts(&["beta", "alpha", "gamma"]),
            make_state(&[("gamma", 5)]),
            PathBuf::from("/tmp/state.json"),
            PathBuf::from("/tmp/config"),
            PathBuf::from("/tmp/config.bak"),
            true,
        );
        let aliases: Vec<&str> = app.all_hosts.iter().map(|h| h.alias.as_str()).collect();
        assert_eq!(aliases, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn alphabetical_sort_is_case_insensitive() {
        let app = make_app(make_hosts(&["Zulu", "alpha", "Mike"]), State::default());
        let aliases: Vec<&str> = app.all_hosts.iter().map(|h| h.alias.as_str()).collect();
        assert_eq!(aliases, vec!["alpha", "Mike", "Zulu"]);
    }

    #[test]
    fn cursor_wraps_both_ways() {
        let mut app = make_app(make_hosts(&["a", "b", "c"]), State::default());
        app.view_height = 10;

        app.move_cursor_down();
        assert_eq!(app.cursor, 1);
        app.move_cursor_down();
        assert_eq!(app.cursor, 2);
        app.move_cursor_down();
        assert_eq!(app.cursor, 0);
        assert_eq!(app.viewport, 0);

        app.move_cursor_up();
        assert_eq!(app.cursor, 2);
    }

    #[test]
    fn viewport_advances_with_the_cursor() {
        let mut app = make_app(make_hosts(&["a", "b", "c", "d", "e"]), State::default());
        app.view_height = 3;

        app.move_cursor_down();
        app.move_cursor_down();
        app.move_cursor_down();
        assert_eq!(app.cursor, 3);
        assert_eq!(app.viewport, 1);
    }

    #[test]
    fn viewport_retreats_with_the_cursor() {
        let mut app = make_app(make_hosts(&["a", "b", "c", "d", "e"]), State::default());
        app.view_height = 3;
        app.cursor = 3;
        app.viewport = 1;

        app.move_cursor_up();
        app.move_cursor_up();
        app.move_cursor_up();
        assert_eq!(app.cursor, 0);
        assert_eq!(app.viewport, 0);
    }

    #[test]
    fn wrap_to_bottom_shows_the_last_page() {
        let mut app = make_app(make_hosts(&["a", "b", "c", "d", "e"]), State::default());
        app.view_height = 3;

        app.move_cursor_up();
        assert_eq!(app.cursor, 4);
        assert_eq!(app.viewport, 2);
    }

    #[test]
    fn viewport_contains_cursor_through_arbitrary_moves() {
        let mut app = make_app(make_hosts(&["a", "b", "c", "d", "e", "f", "g"]), State::default());
        app.view_height = 3;

        for step in 0..40 {
            if step % 3 == 0 {
                app.move_cursor_up();
            } else {
                app.move_cursor_down();
            }
            assert!(app.viewport <= app.cursor);
            assert!(app.cursor < app.viewport + app.view_height);
        }
    }

    #[test]
    fn search_resets_cursor_and_viewport() {
        let mut app = make_app(
            make_hosts(&["alpha", "beta", "gamma", "delta", "epsilon"]),
            State::default(),
        );
        app.view_height = 3;
        app.cursor = 4;
        app.viewport = 2;

        app.mode = Mode::Search;
        app.search_query = "alpha".to_string();
        app.apply_search();

        assert_eq!(app.filtered[0].alias, "alpha");
        assert_eq!(app.cursor, 0);
        assert_eq!(app.viewport, 0);
    }

    #[test]
    fn empty_query_restores_full_list() {
        let mut app = make_app(make_hosts(&["alpha", "beta"]), State::default());
        app.search_query = "alpha".to_string();
        app.apply_search();
        assert_eq!(app.filtered.len(), 1);

        app.search_query.clear();
        app.apply_search();
        assert_eq!(app.filtered.len(), 2);
    }

    #[test]
    fn search_matches_hostname_and_groups() {
        let mut hosts = make_hosts(&["web", "db"]);
        hosts[1].groups = vec!["Production".to_string()];
        let mut app = make_app(hosts, State::default());

        app.search_query = "example".to_string();
        app.apply_search();
        assert_eq!(app.filtered.len(), 2);

        app.search_query = "Production".to_string();
        app.apply_search();
        assert_eq!(app.filtered.len(), 1);
        assert_eq!(app.filtered[0].alias, "db");
    }

    #[test]
    fn search_with_no_matches_empties_the_list() {
        let mut app = make_app(make_hosts(&["alpha"]), State::default());
        app.search_query = "zzzzzz".to_string();
        app.apply_search();
        assert!(app.filtered.is_empty());
        assert!(app.selected_host().is_none());
    }

    #[test]
    fn edit_form_populates_from_host() {
        let mut host = make_hosts(&["dev"]).remove(0);
        host.port = "2222".to_string();
        host.groups = vec!["Work".to_string(), "Staging".to_string()];
        let form = EditForm::from_host(&host);

        assert_eq!(form.value(Field::Alias), "dev");
        assert_eq!(form.value(Field::Hostname), "dev.example.com");
        assert_eq!(form.value(Field::Port), "2222");
        assert_eq!(form.value(Field::Groups), "Work, Staging");
        assert_eq!(form.active, Field::Alias);
    }

    #[test]
    fn field_cycling_wraps() {
        assert_eq!(Field::Alias.next(), Field::Hostname);
        assert_eq!(Field::Groups.next(), Field::Alias);
        assert_eq!(Field::Alias.prev(), Field::Groups);
    }

    #[test]
    fn open_edit_form_refuses_untracked_host() {
        let mut hosts = make_hosts(&["dev"]);
        hosts[0].line_start = 0;
        let mut app = make_app(hosts, State::default());

        app.open_edit_form();
        assert!(matches!(app.mode, Mode::Normal));
        assert!(app.status.as_ref().unwrap().is_error);
    }

    #[test]
    fn save_edit_rejects_empty_alias_and_hostname() {
        let mut app = make_app(make_hosts(&["dev"]), State::default());
        app.open_edit_form();

        if let Mode::Edit(form) = &mut app.mode {
            form.fields[Field::Alias as usize].clear();
        }
        app.save_edit();
        match &app.mode {
            Mode::Edit(form) => {
                assert_eq!(form.status.as_deref(), Some("Alias cannot be empty."));
            }
            _ => panic!("expected to stay in edit mode"),
        }

        if let Mode::Edit(form) = &mut app.mode {
            form.fields[Field::Alias as usize] = "dev".to_string();
            form.fields[Field::Hostname as usize] = "   ".to_string();
        }
        app.save_edit();
        match &app.mode {
            Mode::Edit(form) => {
                assert_eq!(form.status.as_deref(), Some("Hostname cannot be empty."));
            }
            _ => panic!("expected to stay in edit mode"),
        }
    }

    #[test]
    fn save_edit_surfaces_writer_failure_and_stays_open() {
        // The host points at a file that does not exist.
        let mut app = make_app(make_hosts(&["dev"]), State::default());
        app.open_edit_form();
        app.save_edit();

        match &app.mode {
            Mode::Edit(form) => {
                let msg = form.status.as_deref().unwrap();
                assert!(msg.starts_with("Save failed:"), "got: {msg}");
            }
            _ => panic!("expected to stay in edit mode"),
        }
    }

    #[test]
    fn save_edit_rewrites_block_and_shifts_followers() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config");
        fs::write(
            &config_path,
            "Host alpha\n    Hostname a.example.com\n\nHost beta\n    Hostname b.example.com\n",
        )
        .unwrap();

        let parsed = parser::parse(&config_path).unwrap().hosts;
        let mut app = make_file_app(&dir, &config_path, parsed);

        // alpha sorts first; give it a group through the form.
        assert_eq!(app.filtered[0].alias, "alpha");
        app.open_edit_form();
        if let Mode::Edit(form) = &mut app.mode {
            form.fields[Field::Groups as usize] = "Work".to_string();
        }
        app.save_edit();

        assert!(matches!(app.mode, Mode::Normal));
        let content = fs::read_to_string(&config_path).unwrap();
        assert_eq!(
            content,
            "# @group Work\nHost alpha\n    Hostname a.example.com\n\nHost beta\n    Hostname b.example.com\n"
        );

        let alpha = app.all_hosts.iter().find(|h| h.alias == "alpha").unwrap();
        let beta = app.all_hosts.iter().find(|h| h.alias == "beta").unwrap();
        assert_eq!(alpha.line_start, 2);
        assert_eq!(alpha.groups, vec!["Work"]);
        assert_eq!(beta.line_start, 5);

        // The in-memory positions match a fresh parse.
        let reparsed = parser::parse(&config_path).unwrap().hosts;
        for host in &reparsed {
            let tracked = app
                .all_hosts
                .iter()
                .find(|h| h.alias == host.alias)
                .unwrap();
            assert_eq!(tracked.line_start, host.line_start, "for {}", host.alias);
        }
    }

    #[test]
    fn save_edit_keeps_tracked_positions_across_consecutive_edits() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config");
        fs::write(
            &config_path,
            "Host aa\n    Hostname 1.example.com\n\nHost bb\n    Hostname 2.example.com\n\nHost cc\n    Hostname 3.example.com\n",
        )
        .unwrap();

        let parsed = parser::parse(&config_path).unwrap().hosts;
        let mut app = make_file_app(&dir, &config_path, parsed);

        // First edit: grow the first block.
        app.open_edit_form();
        if let Mode::Edit(form) = &mut app.mode {
            form.fields[Field::User as usize] = "root".to_string();
        }
        app.save_edit();
        assert!(matches!(app.mode, Mode::Normal));

        // Second edit: grow the middle block, found at its shifted position.
        app.cursor = app
            .filtered
            .iter()
            .position(|h| h.alias == "bb")
            .unwrap();
        app.open_edit_form();
        if let Mode::Edit(form) = &mut app.mode {
            form.fields[Field::Groups as usize] = "Infra".to_string();
        }
        app.save_edit();
        assert!(matches!(app.mode, Mode::Normal));

        let reparsed = parser::parse(&config_path).unwrap().hosts;
        assert_eq!(reparsed.len(), 3);
        for host in &reparsed {
            let tracked = app
                .all_hosts
                .iter()
                .find(|h| h.alias == host.alias)
                .unwrap();
            assert_eq!(tracked.line_start, host.line_start, "for {}", host.alias);
        }
    }

    #[test]
    fn save_edit_reapplies_active_search() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config");
        fs::write(
            &config_path,
            "Host alpha\n    Hostname a.example.com\n\nHost beta\n    Hostname b.example.com\n",
        )
        .unwrap();

        let parsed = parser::parse(&config_path).unwrap().hosts;
        let mut app = make_file_app(&dir, &config_path, parsed);

        app.mode = Mode::Search;
        app.search_query = "beta".to_string();
        app.apply_search();
        assert_eq!(app.filtered.len(), 1);

        app.open_edit_form();
        if let Mode::Edit(form) = &mut app.mode {
            form.fields[Field::User as usize] = "deploy".to_string();
        }
        app.save_edit();

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.filtered.len(), 1);
        assert_eq!(app.filtered[0].alias, "beta");
        assert_eq!(app.filtered[0].user, "deploy");
    }

    #[test]
    fn connect_records_and_queues() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config");
        fs::write(&config_path, "Host dev\n    Hostname dev.example.com\n").unwrap();

        let parsed = parser::parse(&config_path).unwrap().hosts;
        let mut app = make_file_app(&dir, &config_path, parsed);

        app.connect_selected(String::new());

        assert_eq!(app.state.connections.get("dev"), Some(&1));
        let pending = app.pending_connect.as_ref().unwrap();
        assert_eq!(pending.host.alias, "dev");
        // The hostname was already known, so nothing was appended.
        let content = fs::read_to_string(&config_path).unwrap();
        assert_eq!(content.matches("Host ").count(), 1);
        // The table made it to disk before the connection.
        let saved = State::load(&dir.path().join("state.json"));
        assert_eq!(saved.connections.get("dev"), Some(&1));
    }

    #[test]
    fn connect_with_empty_list_is_a_no_op() {
        let mut app = make_app(Vec::new(), State::default());
        app.connect_selected(String::new());
        assert!(app.pending_connect.is_none());
        assert!(app.state.connections.is_empty());
    }

    #[test]
    fn status_messages_decay_on_ticks() {
        let mut app = make_app(make_hosts(&["a"]), State::default());
        app.set_status("done", false);
        for _ in 0..12 {
            app.tick_status();
        }
        assert!(app.status.is_some());
        app.tick_status();
        assert!(app.status.is_none());
    }
}
