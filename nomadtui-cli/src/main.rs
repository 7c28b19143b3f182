#![allow(clippy::collapsible_if)]

mod client;
mod keys;
mod logging;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    cursor::Show,
    event::{self, Event as CEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::{debug, info};

use nomadtui_core::config::{ConfigError, ViewerConfig};
use nomadtui_core::controller::{Effect, NavigationController};
use nomadtui_core::loader::Loader;
use nomadtui_core::message::Message;

use client::NomadClient;

#[derive(Parser)]
#[command(name = "nomadtui")]
#[command(about = "Browse Nomad jobs, allocations and task logs", long_about = None)]
struct Cli {
    /// Nomad HTTP API address
    #[arg(long, env = "NOMAD_ADDR")]
    address: Option<String>,

    /// ACL token sent with every request
    #[arg(long, env = "NOMAD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Config file (default: search for nomadtui.yaml upwards from the current directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write diagnostic logs
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

/// File config (explicit or discovered) with flags and env layered on top.
fn resolve_config(cli: &Cli) -> Result<(Option<PathBuf>, ViewerConfig), ConfigError> {
    let (source, mut config) = match &cli.config {
        Some(path) => (Some(path.clone()), ViewerConfig::load(path)?),
        None => match ViewerConfig::discover(&std::env::current_dir()?) {
            Ok((path, config)) => (Some(path), config),
            Err(ConfigError::NotFound { .. }) => (None, ViewerConfig::default()),
            Err(e) => return Err(e),
        },
    };

    if let Some(address) = &cli.address {
        config.address = address.clone();
    }
    if let Some(token) = &cli.token {
        config.token = Some(token.clone());
    }
    if let Some(log_file) = &cli.log_file {
        config.log_file = Some(log_file.clone());
    }
    config.validate()?;
    Ok((source, config))
}

// --- Terminal setup/teardown ---
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Puts the terminal back before the default hook prints the panic message.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        default_hook(info);
    }));
}

/// Spawns every requested load; results come back through `tx`.
/// Returns true when the controller asked to exit.
fn dispatch(effects: Vec<Effect>, loader: &Loader, tx: &mpsc::UnboundedSender<Message>) -> bool {
    let mut exit = false;
    for effect in effects {
        match effect {
            Effect::Load(command) => {
                debug!(page = %command.page, request_id = command.request_id, "spawning load");
                let loader = loader.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    // The receiver only goes away once the UI has exited.
                    let _ = tx.send(loader.run(command).await);
                });
            }
            Effect::Exit => exit = true,
        }
    }
    exit
}

async fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    address: &str,
    loader: &Loader,
) -> io::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    let (width, height) = size()?;
    let mut nav = NavigationController::new(width as usize, height as usize);
    if dispatch(nav.init(), loader, &tx) {
        return Ok(());
    }

    loop {
        while let Ok(msg) = rx.try_recv() {
            if dispatch(nav.update(msg), loader, &tx) {
                return Ok(());
            }
        }

        terminal.draw(|f| ui::render::draw(f, &nav, address))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }

        let msg = match event::read()? {
            CEvent::Key(key) if key.kind == KeyEventKind::Press => match keys::translate(key) {
                Some(key) => Message::Key(key),
                None => continue,
            },
            CEvent::Resize(width, height) => Message::Resize {
                width: width as usize,
                height: height as usize,
            },
            _ => continue,
        };

        if dispatch(nav.update(msg), loader, &tx) {
            return Ok(());
        }
    }
}

async fn run_tui(config: ViewerConfig) -> io::Result<()> {
    let client = NomadClient::new(config.address.clone(), config.token().map(str::to_string));
    let loader = Loader::new(Arc::new(client)).with_log_tail_bytes(config.log_tail_bytes);

    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let result = tui_loop(&mut terminal, &config.address, &loader).await;
    restore_terminal(terminal)?;
    result
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let (source, config) = match resolve_config(&cli) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut _log_guard = None;
    if let Some(path) = config.log_file.clone().or_else(logging::default_log_file) {
        match logging::init_logging(&path, cli.verbose) {
            Ok(guard) => _log_guard = Some(guard),
            Err(e) => eprintln!("Warning: could not open log file {}: {}", path.display(), e),
        }
    }
    info!(address = %config.address, config = ?source, "starting nomadtui");

    run_tui(config).await
}
