mod app;
mod connection;
mod event;
mod handler;
mod keys;
mod passthrough;
mod paths;
mod ssh_config;
mod state;
mod tui;
mod ui;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use app::App;
use event::{AppEvent, EventSource};
use state::State;

#[derive(Parser)]
#[command(
    name = "skiff",
    about = "Your SSH hosts, one keystroke away.",
    long_about = "Skiff lists the hosts from your SSH config, fuzzy-searchable,\n\
                  most-used first. Enter connects; Ctrl+E edits the block in\n\
                  place without touching the rest of the file.\n\n\
                  Called with ssh-style arguments it stays out of the way:\n\
                  unknown destinations are saved to the config, then the real\n\
                  ssh takes over."
)]
struct Cli {
    /// Path to SSH config file
    #[arg(long)]
    config: Option<String>,

    /// Flat alphabetical order (skip frequency sort)
    #[arg(long)]
    no_frequent: bool,
}

fn main() -> Result<()> {
    let raw_args: Vec<String> = std::env::args().skip(1).collect();

    // Passthrough detection runs on raw argv before clap sees it, so SSH
    // flags like -i or -p never reach the flag parser.
    if passthrough::looks_like_ssh_args(&raw_args) {
        let config_override = passthrough::extract_config_flag(&raw_args);
        let code = match passthrough::run(&raw_args, config_override.as_deref()) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("skiff: {e:#}");
                1
            }
        };
        process::exit(code);
    }

    // -v is answered by hand because ssh claims it for verbosity; argv that
    // looked like ssh was already handed off above.
    if raw_args.iter().any(|arg| arg == "--version" || arg == "-v") {
        println!("skiff {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let cli = Cli::parse();
    ui::theme::init();

    let (config_path, backup_path) = match &cli.config {
        Some(path) => {
            let config = resolve_config_path(path)?;
            let backup = config
                .parent()
                .unwrap_or_else(|| std::path::Path::new("."))
                .join("config.bak");
            (config, backup)
        }
        None => (paths::ssh_config_path(), paths::ssh_config_backup_path()),
    };

    let parsed = match ssh_config::parser::parse(&config_path) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("skiff: could not parse SSH config: {e:#}");
            process::exit(1);
        }
    };

    if parsed.hosts.is_empty() {
        println!(
            "No hosts found in {}. Add entries to your SSH config.",
            parsed.source.display()
        );
        return Ok(());
    }

    let state_path = paths::state_file_path();
    let state = State::load(&state_path);

    let mut app = App::new(
        parsed.hosts,
        state,
        state_path,
        config_path,
        backup_path,
        cli.no_frequent,
    );
    let mut terminal = tui::Tui::new()?;
    terminal.enter()?;
    let mut events = EventSource::new(250);

    while app.running {
        terminal.draw(&mut app)?;

        match events.next()? {
            AppEvent::Key(key) => handler::handle_key_event(&mut app, key)?,
            AppEvent::Tick => app.tick_status(),
        }

        // A queued connection suspends the TUI; the ssh child owns the
        // terminal until it exits, then the list comes back as it was.
        if let Some(pending) = app.pending_connect.take() {
            terminal.exit()?;
            println!("Connecting to {}...\n", pending.host.alias);
            if let Err(e) = connection::connect(&pending.host, &pending.identity) {
                eprintln!("skiff: {e:#}");
            }
            println!();
            terminal.enter()?;
            events.drain()?;
        }
    }

    terminal.exit()?;
    Ok(())
}

fn resolve_config_path(path: &str) -> Result<PathBuf> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().context("could not determine home directory")?;
        Ok(home.join(rest))
    } else {
        Ok(PathBuf::from(path))
    }
}
