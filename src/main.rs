mod app;
mod cli;
mod ui;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use dockside::config::Config;
use dockside::docker::{Supervisor, SupervisorOptions, SystemRunner};
use dockside::logging::{self, LogTarget};

use app::worker::{self, Action, Poller, WorkerEvent};
use app::{ActivityKind, App, Panel};
use cli::{Cli, Command};

fn main() -> ExitCode {
    match real_main() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn real_main() -> Result<bool> {
    let cli = Cli::parse();
    let cfg = cli.resolve_config()?;
    let command = cli.command.as_ref().unwrap_or(&Command::Status);

    let target = if matches!(command, Command::Watch) {
        LogTarget::File
    } else {
        LogTarget::Stderr
    };
    let _log_guard = logging::init(target, &cfg.log_level, &cfg.work_dir)
        .context("failed to initialise logging")?;
    tracing::debug!(?cfg, "configuration resolved");

    let sup = Supervisor::new(SupervisorOptions::from_config(&cfg));

    if matches!(command, Command::Watch) {
        run_watch(Arc::new(sup), &cfg)?;
        return Ok(true);
    }
    cli::run_command(&sup, &cfg, command, cli.json)
}

fn run_watch(sup: Arc<Supervisor<SystemRunner>>, cfg: &Config) -> Result<()> {
    // Ensure terminal is restored on panic.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, sup, cfg);
    restore_terminal()?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    terminal::disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    sup: Arc<Supervisor<SystemRunner>>,
    cfg: &Config,
) -> Result<()> {
    let mut app = App::new(&cfg.container_name);
    let (tx, rx) = mpsc::channel();
    let poller = worker::spawn_poller(
        sup.clone(),
        Duration::from_millis(cfg.poll_interval_ms),
        tx.clone(),
    );
    app.log(
        ActivityKind::Info,
        format!("watching {} in {}", cfg.container_name, cfg.work_dir.display()),
    );

    while app.running {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Short poll while an action runs so its result shows promptly.
        let poll_timeout = if app.busy.is_some() {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(200)
        };
        if event::poll(poll_timeout)?
            && let Event::Key(key) = event::read()?
            && let Some(action) = handle_key(&mut app, key, &poller)
        {
            worker::spawn_action(sup.clone(), action, tx.clone());
        }

        let mut finished_action = false;
        for ev in worker::drain(&rx) {
            finished_action |= matches!(ev, WorkerEvent::ActionFinished { .. });
            app.apply(ev);
        }
        if finished_action {
            poller.refresh();
        }
    }

    Ok(())
}

/// Apply a key press. Returns a lifecycle action to launch, if any.
fn handle_key(app: &mut App, key: KeyEvent, poller: &Poller) -> Option<Action> {
    if app.show_help {
        app.show_help = false;
        return None;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), _) => {
            app.running = false;
            return None;
        }
        (KeyCode::Char('?'), _) => {
            app.show_help = true;
            return None;
        }
        (KeyCode::Char('r'), _) => {
            poller.refresh();
            return None;
        }
        _ => {}
    }

    let action = match key.code {
        KeyCode::Char('s') => Some(Action::Start),
        KeyCode::Char('x') => Some(Action::Stop),
        KeyCode::Char('R') => Some(Action::Restart),
        KeyCode::Char('p') => Some(Action::Pull),
        KeyCode::Char('b') => Some(Action::Build),
        _ => None,
    };
    if let Some(action) = action {
        return app.begin_action(action).then_some(action);
    }

    match key.code {
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
            app.focused_panel = app.focused_panel.next();
        }
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
            app.focused_panel = app.focused_panel.prev();
        }
        KeyCode::Char(c @ '1'..='3') => {
            if let Some(panel) = Panel::from_index((c as usize) - ('1' as usize)) {
                app.focused_panel = panel;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => app.scroll_activity(true),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_activity(false),
        _ => {}
    }
    None
}
