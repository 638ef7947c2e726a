//! quake-report entry point: parse args, set up logging and the terminal,
//! and run the event loop.

use std::fs::File;
use std::io;
use std::sync::{mpsc, Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use quake_report::app::App;
use quake_report::config::Config;
use quake_report::feed::HttpFetcher;
use quake_report::input::{self, Command};
use quake_report::loader::{Foreground, Loader};
use quake_report::ui;

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the default panic message is printed.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Send `tracing` output to `--log-file`, if given.  The terminal belongs
/// to the UI, so without a file nothing is logged.
fn init_tracing(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quake_report=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let config = Config::parse();
    init_tracing(&config)?;
    install_panic_hook();

    tracing::info!(url = %config.url(), timeout = ?config.timeout(), "starting");

    // -- loader --------------------------------------------------------------
    let foreground = Foreground::new();
    let fetcher = HttpFetcher::new(config.timeout()).context("building HTTP client")?;
    let loader = Loader::new(config.url(), Arc::new(fetcher), foreground.handle());

    // The observer runs on this thread while `foreground` is drained; it
    // forwards outcomes to the loop below, which owns `App`.
    let (outcome_tx, outcomes) = mpsc::channel();
    loader.on_result(move |outcome| {
        let _ = outcome_tx.send(outcome);
    });

    // -- terminal setup (Drop restores it on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new();

    if loader.start().is_current() {
        app.begin_loading();
    }

    // -- main event loop -----------------------------------------------------
    //   1. Run deliveries posted by the loader.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = config.tick_rate();

    loop {
        foreground.run_pending();
        while let Ok(outcome) = outcomes.try_recv() {
            app.apply_outcome(outcome);
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                match input::handle_key_event(&mut app, key) {
                    Some(Command::Reload) => {
                        if loader.start().is_current() {
                            app.begin_loading();
                        }
                    }
                    Some(Command::Cancel) => {
                        if loader.cancel() {
                            app.load_cancelled();
                        }
                    }
                    None => {}
                }
            }
        }

        if app.quit {
            break;
        }
    }

    tracing::info!("shutting down");
    // `loader` is dropped before `guard`, cancelling any in-flight cycle.
    drop(loader);
    Ok(())
}
