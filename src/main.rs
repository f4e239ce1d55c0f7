//! ProjectPad - project and session manager for a lightweight text editor,
//! driven from the console.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use project_pad::app::domain::messages::Message;
use project_pad::app::domain::settings::AppSettings;
use project_pad::app::infrastructure::platform;
use project_pad::app::services::session::SessionStore;
use project_pad::app::state::{AppState, LaunchOptions};
use project_pad::ui::console::ConsoleUi;
use project_pad::ui::dialogs::ProjectUi;

const HELP: &str = "Commands: new, new-folder, open, recent <n>, close, properties, build, \
save, edit <path>, list, quit";

/// ProjectPad - editor projects and sessions
#[derive(Parser, Debug)]
#[command(name = "projectpad")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// A project file (*.ppad) followed by files to open
    files: Vec<PathBuf>,

    /// Don't load or save the session files
    #[arg(short = 's', long)]
    no_session: bool,

    /// Don't restore the last session; for running beside another instance
    #[arg(short = 'i', long)]
    new_instance: bool,

    /// Alternate configuration directory
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn config_dir(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(platform::config_dir)
    }

    fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            no_session: self.no_session,
            new_instance: self.new_instance,
        }
    }
}

fn main() {
    let args = Args::parse();

    // Logs go to stderr, stdout belongs to the console
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("project_pad={}", log_level)),
        ))
        .init();

    tracing::info!("Starting ProjectPad v{}", env!("CARGO_PKG_VERSION"));

    let config_dir = args.config_dir();
    let settings_path = config_dir.join("settings.json");
    let settings = AppSettings::load_from(&settings_path);
    let session = SessionStore::new(config_dir.join("session.conf"));
    tracing::debug!("configuration directory {}", config_dir.display());

    let mut state = AppState::new(settings, settings_path, session, args.launch_options());
    let mut ui = ConsoleUi::stdio();
    state.startup(args.files, &mut ui);
    ui.set_status(HELP);

    loop {
        let Some(line) = ui.read_line("> ") else {
            if !state.quit(&mut ui) {
                tracing::warn!("end of input: exiting with documents still open");
            }
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        match Message::parse(&line) {
            Some(message) => {
                if !state.dispatch(message, &mut ui) {
                    break;
                }
            }
            None => ui.set_status(HELP),
        }
    }
}
