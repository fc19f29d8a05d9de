use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use todo_core::DisplayZone;
use todo_service::BlockingHttpService;
use tracing::info;

use todo_tui::app::App;

#[derive(Debug, Parser)]
#[command(name = "todo", about = "Terminal client for the TODO API")]
struct Cli {
    /// Base URL of the TODO API server
    #[arg(long, env = "TODO_SERVER_URL", default_value = "http://127.0.0.1:8000")]
    server_url: String,

    /// UTC offset in hours used to show and enter dates
    #[arg(long, env = "TODO_UTC_OFFSET", default_value_t = 9, allow_hyphen_values = true)]
    utc_offset: i32,

    /// Write logs here; nothing is logged otherwise
    #[arg(long, env = "TODO_LOG_FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal is taken by the UI, so logs only go to a file.
    if let Some(ref path) = cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    let zone = DisplayZone::from_hours(cli.utc_offset)
        .with_context(|| format!("invalid --utc-offset {}", cli.utc_offset))?;
    let service = BlockingHttpService::new(&cli.server_url)?;
    info!(server = %cli.server_url, "starting todo client");

    run_tui(service, zone)
}

fn run_tui(service: BlockingHttpService, zone: DisplayZone) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, service, zone);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e}");
    }

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    service: BlockingHttpService,
    zone: DisplayZone,
) -> Result<()> {
    let mut app = App::new(service, zone);

    loop {
        terminal.draw(|frame| app.render(frame))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            // Ctrl+C always quits
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            // q quits unless we're typing into the form
            if key.code == KeyCode::Char('q') && !app.is_input_mode() {
                break;
            }
            app.handle_key(key);
        }
    }

    Ok(())
}
