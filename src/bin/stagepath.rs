use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use stagepath::client::DemoClient;
use stagepath::config::PathConfig;
use stagepath::error::{Result, StagePathError};
use stagepath::event::{Event, EventHandler};
use stagepath::path::{ui, PathAction, PathApp};
use std::io::stdout;
use std::panic;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stagepath")]
#[command(author, version, about = "Terminal path assistant for record stage progression")]
struct Args {
    /// Path to config file (default: the user config dir)
    #[arg(long)]
    config: Option<String>,

    /// Record to show (overrides record_id from the config file)
    #[arg(long)]
    record: Option<String>,

    /// Log file path (logging disabled if not specified)
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging only if log file is specified
    if let Some(ref log_path) = args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .ok();

        if let Some(file) = file {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init();

            info!("Starting stagepath");
        }
    }

    let mut config = match args.config {
        Some(ref path) => PathConfig::load_from(path)?,
        None => PathConfig::load()?,
    };
    if let Some(record) = args.record {
        config.record_id = record;
    }
    // Without a record the built-in demo record is shown
    if config.record_id.is_empty() {
        config.record_id = DemoClient::demo_record_id().to_string();
    }
    config.validate()?;

    // Set up panic handler to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;

    let result = run(&mut terminal, config).await;

    restore_terminal()?;

    if let Err(ref e) = result {
        error!("stagepath error: {}", e);
    }

    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().map_err(|e| StagePathError::Terminal(e.to_string()))?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| StagePathError::Terminal(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).map_err(|e| StagePathError::Terminal(e.to_string()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().map_err(|e| StagePathError::Terminal(e.to_string()))?;
    execute!(stdout(), LeaveAlternateScreen)
        .map_err(|e| StagePathError::Terminal(e.to_string()))?;
    Ok(())
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    config: PathConfig,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut events = EventHandler::new(tick_rate);

    let client = DemoClient::seeded();
    let (mut app, mut data_rx) = PathApp::new(config, client);
    app.reload();

    loop {
        terminal
            .draw(|frame| ui::draw(frame, &app))
            .map_err(|e| StagePathError::Terminal(e.to_string()))?;

        tokio::select! {
            event = events.next() => {
                match event {
                    Some(Event::Key(key)) => {
                        if let Some(action) = app.handle_key(key) {
                            match action {
                                PathAction::Confirm => app.dispatch_update(),
                                PathAction::Reload => app.reload(),
                                PathAction::Quit => break,
                            }
                        }
                    }
                    Some(Event::Resize) => {}
                    Some(Event::Tick) => app.tick(),
                    None => break,
                }
            }
            data = data_rx.recv() => {
                match data {
                    Some(event) => app.apply_event(event),
                    None => break,
                }
            }
        }
    }

    Ok(())
}
