//! Event handling for the TUI.
//!
//! Every input and background result arrives as a [`Message`] on one
//! channel; [`update`] folds it into [`App`] and returns any side effect
//! the loop must forward.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;
use tracing::debug;

use crate::models::MarketSnapshot;
use crate::models::StatusUpdateResponse;
use crate::models::account::UserData;
use crate::models::book::BookUpdateResponse;
use crate::models::ticker::TickerUpdateResponse;
use crate::models::trade::TradeUpdateResponse;

use super::app::{Action, App, ConnectionStatus, Focus, Mode, OrderFlag, Tab};

/// Events that can occur in the terminal.
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Periodic tick for UI housekeeping.
    Tick,
}

/// Messages that update application state.
#[derive(Debug)]
pub enum Message {
    Input(Event),

    // Market feed
    Book(BookUpdateResponse),
    Trade(TradeUpdateResponse),
    Ticker(TickerUpdateResponse),
    Status(StatusUpdateResponse),
    Heartbeat,

    // Poller
    Markets(Result<MarketSnapshot, String>),
    UserData {
        address: String,
        result: Result<UserData, String>,
    },

    // Connection lifecycle
    Connected,
    Disconnected,
    Reconnecting,

    Quit,
}

/// Spawns a task that polls for terminal events and sends them to a channel.
pub fn spawn_event_reader(tx: mpsc::UnboundedSender<Message>) {
    tokio::spawn(async move {
        loop {
            match tokio::task::spawn_blocking(|| {
                if event::poll(Duration::from_millis(50)).unwrap_or(false) {
                    event::read().ok()
                } else {
                    None
                }
            })
            .await
            {
                Ok(Some(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    if tx.send(Message::Input(Event::Key(key))).is_err() {
                        break;
                    }
                }
                Ok(Some(CrosstermEvent::Resize(w, h))) => {
                    if tx.send(Message::Input(Event::Resize(w, h))).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

/// Spawns a task that sends periodic tick events.
pub fn spawn_tick_timer(tx: mpsc::UnboundedSender<Message>, interval_ms: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
        loop {
            interval.tick().await;
            if tx.send(Message::Input(Event::Tick)).is_err() {
                break;
            }
        }
    });
}

/// Updates application state based on a message.
pub fn update(app: &mut App, message: Message) -> Option<Action> {
    match message {
        Message::Input(event) => handle_input(app, event),
        Message::Book(response) => {
            app.apply_book(response);
            None
        }
        Message::Trade(response) => {
            app.apply_trades(response);
            None
        }
        Message::Ticker(response) => {
            app.apply_ticker(response.data);
            None
        }
        Message::Status(status) => {
            if let Some(data) = status.data.first() {
                debug!(system = %data.system, version = %data.version, "Feed status");
            }
            app.connection_status = ConnectionStatus::Connected;
            None
        }
        Message::Heartbeat => {
            app.last_heartbeat = Some(Instant::now());
            None
        }
        Message::Markets(result) => app.apply_markets(result),
        Message::UserData { address, result } => {
            app.apply_user_data(address, result);
            None
        }
        Message::Connected => {
            app.connection_status = ConnectionStatus::Connected;
            None
        }
        Message::Disconnected => {
            app.connection_status = ConnectionStatus::Disconnected;
            None
        }
        Message::Reconnecting => {
            app.connection_status = ConnectionStatus::Reconnecting;
            None
        }
        Message::Quit => {
            app.should_quit = true;
            None
        }
    }
}

fn handle_input(app: &mut App, event: Event) -> Option<Action> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Resize(_, _) => None,
        Event::Tick => {
            app.clear_stale_errors();
            None
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) -> Option<Action> {
    match app.mode {
        Mode::Normal => handle_normal_mode(app, key),
        Mode::Search => handle_search_mode(app, key),
        Mode::EditSize => handle_size_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') if key.modifiers.is_empty() => {
            app.should_quit = true;
            None
        }
        KeyCode::Tab => {
            app.next_tab();
            None
        }
        KeyCode::BackTab => {
            app.previous_tab();
            None
        }
        KeyCode::Char('1') => {
            app.set_tab(Tab::Markets);
            None
        }
        KeyCode::Char('2') => {
            app.set_tab(Tab::Trade);
            None
        }
        KeyCode::Char('3') => {
            app.set_tab(Tab::Portfolio);
            None
        }
        KeyCode::Char('D') => {
            app.toggle_theme();
            None
        }
        _ => match app.active_tab {
            Tab::Markets => handle_markets_keys(app, key),
            Tab::Trade => handle_trade_keys(app, key),
            Tab::Portfolio => handle_portfolio_keys(app, key),
        },
    }
}

fn handle_markets_keys(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_market_cursor(true);
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_market_cursor(false);
            None
        }
        KeyCode::Enter => app.select_highlighted(),
        KeyCode::Char('f') => {
            if let Some(symbol) = app.highlighted_market().map(|m| m.symbol.clone()) {
                app.toggle_favorite(&symbol);
            }
            None
        }
        KeyCode::Char('/') => {
            app.mode = Mode::Search;
            None
        }
        KeyCode::Char('v') => {
            app.cycle_filter();
            None
        }
        KeyCode::Char('r') => app.reset_query(),
        _ => None,
    }
}

fn handle_trade_keys(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        // Panel focus
        KeyCode::Char('h') | KeyCode::Left => {
            app.focus = match app.focus {
                Focus::DepthChart => Focus::OrderBook,
                Focus::OrderTicket => Focus::DepthChart,
                other => other,
            };
            None
        }
        KeyCode::Char('l') | KeyCode::Right => {
            app.focus = match app.focus {
                Focus::OrderBook => Focus::DepthChart,
                Focus::DepthChart => Focus::OrderTicket,
                other => other,
            };
            None
        }

        // Book cursor and price clicks
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_book_cursor(true);
            None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_book_cursor(false);
            None
        }
        KeyCode::Enter => {
            app.click_selected_row();
            None
        }
        KeyCode::Char('p') => {
            app.click_last_price();
            None
        }

        // Depth chart
        KeyCode::Char('[') => {
            app.move_depth_cursor(false);
            None
        }
        KeyCode::Char(']') => {
            app.move_depth_cursor(true);
            None
        }
        KeyCode::Char('g') => {
            app.resolution = app.resolution.next();
            None
        }

        // Order ticket
        KeyCode::Char('t') => {
            app.cycle_order_type();
            None
        }
        KeyCode::Char('s') => {
            app.flip_side();
            None
        }
        KeyCode::Char('i') => {
            app.focus = Focus::OrderTicket;
            app.mode = Mode::EditSize;
            None
        }
        KeyCode::Char('x') => {
            app.cycle_time_in_force();
            None
        }
        KeyCode::Char('R') => {
            app.toggle_flag(OrderFlag::ReduceOnly);
            None
        }
        KeyCode::Char('P') => {
            app.toggle_flag(OrderFlag::PostOnly);
            None
        }
        KeyCode::Char('L') => {
            app.toggle_flag(OrderFlag::StopLoss);
            None
        }
        KeyCode::Char('T') => {
            app.toggle_flag(OrderFlag::TakeProfit);
            None
        }

        // Resets
        KeyCode::Char('z') => {
            app.reset_order();
            None
        }
        KeyCode::Char('Z') => app.reset_market(),
        KeyCode::Char('r') => app.reset_query(),
        _ => None,
    }
}

fn handle_portfolio_keys(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('r') => app.reset_query(),
        _ => None,
    }
}

/// Edits the market search box; the list filters as you type.
fn handle_search_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => {
            app.search.take();
            app.mode = Mode::Normal;
        }
        KeyCode::Enter => app.mode = Mode::Normal,
        KeyCode::Char(c) => {
            app.search.insert(c);
        }
        KeyCode::Backspace => app.search.backspace(),
        KeyCode::Delete => app.search.delete(),
        KeyCode::Left => app.search.move_left(),
        KeyCode::Right => app.search.move_right(),
        KeyCode::Home => app.search.move_home(),
        KeyCode::End => app.search.move_end(),
        _ => return None,
    }
    app.market_index = 0;
    None
}

fn handle_size_mode(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => {
            app.size_input.take();
            app.mode = Mode::Normal;
        }
        KeyCode::Enter => {
            app.commit_size();
            app.mode = Mode::Normal;
        }
        KeyCode::Char(c) => {
            if !app.size_input.insert(c) {
                debug!(%c, "Rejected size character");
            }
        }
        KeyCode::Backspace => app.size_input.backspace(),
        KeyCode::Delete => app.size_input.delete(),
        KeyCode::Left => app.size_input.move_left(),
        KeyCode::Right => app.size_input.move_right(),
        KeyCode::Home => app.size_input.move_home(),
        KeyCode::End => app.size_input.move_end(),
        _ => {}
    }
    None
}
