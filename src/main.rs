//! lux-widget - chart recommendations in the terminal
//!
//! Shows the host's current chart and its recommendation groups as tabbed
//! galleries. Selected charts are written back to the host document under
//! `selectedVisLst` when the user exports.
//!
//! Usage: `lux-widget [DOCUMENT]` where DOCUMENT is a JSON or YAML file with
//! `current_view` and `recommendations` keys.

use anyhow::{Context, Result};
use crossterm::event::Event;
use lux_widget::action::Action;
use lux_widget::app::App;
use lux_widget::binding::FileBinding;
use lux_widget::component::Component;
use lux_widget::config::Config;
use lux_widget::logging;
use lux_widget::tui::Tui;
use std::path::PathBuf;

fn main() -> Result<()> {
    let config = Config::load().unwrap_or_default();

    if let Some(log_path) = config.log_path() {
        logging::init_file_tracing(&log_path);
    }

    let document = document_path(&config)?;
    let binding = FileBinding::open(&document)
        .with_context(|| format!("cannot open host document {}", document.display()))?;
    tracing::info!(document = %binding.path().display(), "starting");

    let mut app = App::new(Box::new(binding), &config);
    app.init()?;

    // Setup terminal
    let mut tui = Tui::new(config.tick_rate())?;
    tui.enter()?;

    let result = run_app(&mut tui, &mut app);

    app.teardown();
    tui.exit()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "main loop failed");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// First command-line argument, else the configured default document
fn document_path(config: &Config) -> Result<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.default_document.as_ref().map(PathBuf::from))
        .context("usage: lux-widget <DOCUMENT>  (or set default_document in ~/.lux-widget/config.json)")
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(err) = app.draw(frame, frame.area()) {
                tracing::error!(error = %err, "draw failed");
            }
        })?;

        // Poll for events
        let action = match tui.next_event()? {
            Some(Event::Key(key)) => app.handle_key_event(key)?,
            Some(Event::Mouse(mouse)) => app.handle_mouse_event(mouse)?,
            Some(Event::Resize(w, h)) => Some(Action::Resize(w, h)),
            _ => None,
        };
        dispatch(app, action)?;

        // Ticks run on schedule even while input keeps arriving
        if tui.take_tick() {
            dispatch(app, Some(Action::Tick))?;
        }
    }

    Ok(())
}

/// Apply an action and any follow-up actions it produces
fn dispatch(app: &mut App, action: Option<Action>) -> Result<()> {
    let mut current_action = action;
    while let Some(a) = current_action {
        current_action = app.update(a)?;
    }
    Ok(())
}
