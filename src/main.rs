use std::fs::OpenOptions;
use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use depthdesk::DeskError;
use depthdesk::config::fetch_config;
use depthdesk::feed::{ConnectionManager, Poller};
use depthdesk::settings::SettingsStore;
use depthdesk::tui::event::{spawn_event_reader, spawn_tick_timer};
use depthdesk::tui::theme::ThemeVars;
use depthdesk::tui::{Action, App, Message, render, restore_terminal, setup_terminal, update};

/// UI tick interval for housekeeping (toast expiry, heartbeat age).
const TICK_MS: u64 = 250;

/// Sends tracing output to `DEPTHDESK_LOG_FILE`, or discards it.
///
/// The terminal owns stdout while the UI runs, so logs never go there.
fn init_tracing() -> Result<(), DeskError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match std::env::var("DEPTHDESK_LOG_FILE") {
        Ok(path) if !path.is_empty() => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| DeskError::Io(format!("{path}: {e}")))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), DeskError> {
    init_tracing()?;

    // The feed and REST clients share one process-wide TLS provider.
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("TLS crypto provider was already installed");
    }

    let config = fetch_config()?;
    let settings = SettingsStore::load(&config.settings_path)?;
    let theme_vars = match config.theme_path.as_deref() {
        Some(path) => ThemeVars::load(path)?,
        None => ThemeVars::default(),
    };

    let mut app = App::new(
        settings,
        theme_vars,
        config.data.address.clone(),
        config.feed.book_depth,
    );

    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let (feed_tx, feed_rx) = mpsc::unbounded_channel();
    let (poll_tx, poll_rx) = mpsc::unbounded_channel();

    // The feed symbol is resolved once the market list arrives.
    let connection = ConnectionManager::new(
        config.feed.websocket_url.clone(),
        config.feed.book_depth,
        None,
        tx.clone(),
        feed_rx,
    );
    tokio::spawn(connection.run());
    tokio::spawn(Poller::new(config.data.clone(), tx.clone(), poll_rx).run());

    let mut terminal = setup_terminal()?;
    spawn_event_reader(tx.clone());
    spawn_tick_timer(tx, TICK_MS);
    info!("depthdesk started");

    while !app.should_quit {
        if let Err(e) = terminal.draw(|frame| render(frame, &app)) {
            error!("Draw failed: {e}");
            break;
        }

        let Some(message) = rx.recv().await else {
            break;
        };
        let mut pending = vec![message];
        // Drain whatever else is queued so bursts of feed ticks cost one draw.
        while let Ok(next) = rx.try_recv() {
            pending.push(next);
        }

        for message in pending {
            match update(&mut app, message) {
                Some(Action::Feed(command)) => {
                    if feed_tx.send(command).is_err() {
                        warn!("Feed task has stopped");
                    }
                }
                Some(Action::Poll(command)) => {
                    if poll_tx.send(command).is_err() {
                        warn!("Poller has stopped");
                    }
                }
                None => {}
            }
        }
    }

    restore_terminal(&mut terminal)?;
    info!("depthdesk stopped");
    Ok(())
}
