//! Application state for the TUI.
//!
//! [`App`] owns the stores and caches and is mutated only from the app loop.
//! The market and order stores are cheap handles; clones of them can be
//! given to anything that needs to observe changes.

use std::time::{Duration, Instant};

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::feed::{FeedCommand, PollCommand};
use crate::market::format::format_decimal;
use crate::market::{LadderBook, Side, selectors};
use crate::models::account::UserData;
use crate::models::book::BookUpdateResponse;
use crate::models::ticker::TickerData;
use crate::models::trade::TradeUpdateResponse;
use crate::models::{MarketData, MarketKind, MarketSnapshot, MarketSymbol};
use crate::query::{ErrorSurface, QueryCache, QueryKey, QueryStatus};
use crate::settings::{SettingsPatch, SettingsStore, Theme};
use crate::store::order::price_click;
use crate::store::{CurrentMarket, CurrentOrder, MarketPatch, OrderPatch, Store};

use super::components::depth_chart::Resolution;
use super::input::{InputKind, TextInput};
use super::theme::{DepthPalette, ThemeVars};

/// How long a toast stays on the status bar.
const TOAST_TTL: Duration = Duration::from_secs(5);

/// Number of markets shown by the movers filter.
const TOP_MOVERS: usize = 10;

/// Precision used before the market list has loaded.
const FALLBACK_PRICE_PRECISION: u32 = 2;
const FALLBACK_SIZE_PRECISION: u32 = 4;

/// Fraction of the visible price range moved per depth cursor step.
const DEPTH_CURSOR_STEPS: f64 = 50.0;

/// Side effects the app loop forwards to background tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Feed(FeedCommand),
    Poll(PollCommand),
}

/// Central application state container.
pub struct App {
    // -- Stores --
    pub market: Store<CurrentMarket>,
    pub order: Store<CurrentOrder>,
    /// Live levels for the viewed market, source of the market store ladders.
    pub ladder: LadderBook,
    pub ticker: Option<TickerData>,
    /// Feed symbol the ladder and trades belong to.
    pub feed_symbol: Option<String>,

    // -- Query caches --
    pub markets: QueryCache<MarketSnapshot>,
    pub user_data: QueryCache<UserData>,
    pub address: Option<String>,

    // -- Preferences --
    pub settings: SettingsStore,
    pub theme_vars: ThemeVars,

    // -- UI State --
    pub active_tab: Tab,
    pub focus: Focus,
    pub mode: Mode,
    pub book_cursor: Option<BookCursor>,
    /// Price under the depth chart cursor.
    pub depth_cursor: Option<f64>,
    pub market_index: usize,
    pub market_filter: MarketFilter,
    pub search: TextInput,
    pub size_input: TextInput,
    pub resolution: Resolution,
    pub error_message: Option<ErrorDisplay>,

    // -- Connection State --
    pub connection_status: ConnectionStatus,
    pub last_heartbeat: Option<Instant>,

    pub should_quit: bool,
}

impl App {
    /// Creates the app state around already-loaded preferences.
    pub fn new(
        settings: SettingsStore,
        theme_vars: ThemeVars,
        address: Option<String>,
        book_depth: usize,
    ) -> Self {
        Self {
            market: Store::default(),
            order: Store::default(),
            ladder: LadderBook::new(book_depth),
            ticker: None,
            feed_symbol: None,

            markets: QueryCache::new(),
            user_data: QueryCache::new(),
            address,

            settings,
            theme_vars,

            active_tab: Tab::Markets,
            focus: Focus::MarketList,
            mode: Mode::Normal,
            book_cursor: None,
            depth_cursor: None,
            market_index: 0,
            market_filter: MarketFilter::All,
            search: TextInput::new(InputKind::Text),
            size_input: TextInput::new(InputKind::Decimal),
            resolution: Resolution::default(),
            error_message: None,

            connection_status: ConnectionStatus::Connecting,
            last_heartbeat: None,

            should_quit: false,
        }
    }

    // -- Tabs --

    pub fn next_tab(&mut self) {
        self.set_tab(self.active_tab.next());
    }

    pub fn previous_tab(&mut self) {
        self.set_tab(self.active_tab.previous());
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.focus = match tab {
            Tab::Markets => Focus::MarketList,
            Tab::Trade => Focus::OrderBook,
            Tab::Portfolio => Focus::Portfolio,
        };
    }

    // -- Toasts --

    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(ErrorDisplay {
            message: message.into(),
            timestamp: Instant::now(),
        });
    }

    pub fn clear_stale_errors(&mut self) {
        if let Some(ref error) = self.error_message
            && error.timestamp.elapsed() > TOAST_TTL
        {
            self.error_message = None;
        }
    }

    // -- Market list --

    /// Cached market list, if one has loaded.
    pub fn snapshot(&self) -> Option<&MarketSnapshot> {
        self.markets.get(&QueryKey::markets())
    }

    /// Parameters of the viewed market from the cached list.
    pub fn market_params(&self) -> Option<&MarketData> {
        let symbol = self.market.read(|m| m.symbol.clone());
        selectors::find(self.snapshot()?, &symbol)
    }

    /// Price and size precision of the viewed market.
    pub fn precision(&self) -> (u32, u32) {
        self.market_params().map_or(
            (FALLBACK_PRICE_PRECISION, FALLBACK_SIZE_PRECISION),
            |m| (m.price_precision, m.size_precision),
        )
    }

    /// Markets listed under the current filter and search text.
    pub fn visible_markets(&self) -> Vec<&MarketData> {
        let Some(snapshot) = self.snapshot() else {
            return Vec::new();
        };
        let base: Vec<&MarketData> = match self.market_filter {
            MarketFilter::All => selectors::all_markets(snapshot).collect(),
            MarketFilter::Futures => selectors::by_kind(snapshot, MarketKind::Futures)
                .iter()
                .collect(),
            MarketFilter::Spot => selectors::by_kind(snapshot, MarketKind::Spot)
                .iter()
                .collect(),
            MarketFilter::Favorites => {
                selectors::favorites(snapshot, &self.settings.settings().favorites)
            }
            MarketFilter::Movers => selectors::top_movers(snapshot, TOP_MOVERS),
            MarketFilter::Volume => selectors::by_volume(snapshot),
        };
        let needle = self.search.as_str().trim().to_lowercase();
        base.into_iter()
            .filter(|m| selectors::matches(m, &needle))
            .collect()
    }

    pub fn highlighted_market(&self) -> Option<&MarketData> {
        self.visible_markets().get(self.market_index).copied()
    }

    pub fn move_market_cursor(&mut self, down: bool) {
        let len = self.visible_markets().len();
        self.market_index = if down {
            (self.market_index + 1).min(len.saturating_sub(1))
        } else {
            self.market_index.saturating_sub(1)
        };
    }

    pub fn cycle_filter(&mut self) {
        self.market_filter = self.market_filter.next();
        self.market_index = 0;
    }

    // -- Current market --

    /// Switches the viewed market in one dispatch per store.
    ///
    /// Returns the feed command that moves the stream to the new market.
    /// Re-selecting the market already on screen keeps its live book, since
    /// the feed will not resend a snapshot for an unchanged subscription.
    pub fn select_market(&mut self, market: &MarketData) -> Option<Action> {
        let viewing = self.market.read(|m| m.symbol == market.symbol);
        if viewing && self.feed_symbol.as_deref() == Some(market.feed_symbol()) {
            debug!(symbol = %market.symbol, "Market already selected");
            return None;
        }
        info!(symbol = %market.symbol, "Selecting market");
        self.market.update(MarketPatch::select(market));
        self.order.update(OrderPatch::market(market));
        self.clear_live_data();

        let feed_symbol = market.feed_symbol().to_string();
        self.feed_symbol = Some(feed_symbol.clone());
        Some(Action::Feed(FeedCommand::Watch(feed_symbol)))
    }

    /// Selects the highlighted market and opens the trade tab.
    pub fn select_highlighted(&mut self) -> Option<Action> {
        let market = self.highlighted_market()?.clone();
        let action = self.select_market(&market);
        self.set_tab(Tab::Trade);
        action
    }

    /// Restores the default market and re-targets the feed if the default is
    /// listed.
    pub fn reset_market(&mut self) -> Option<Action> {
        self.market.reset();
        let Some(market) = self.market_params().cloned() else {
            // Unlisted default: stop publishing the old market's feed.
            self.clear_live_data();
            self.feed_symbol = None;
            return None;
        };
        let feed_symbol = market.feed_symbol().to_string();
        if self.feed_symbol.as_deref() == Some(feed_symbol.as_str()) {
            self.publish_ladders();
            return None;
        }
        self.clear_live_data();
        self.feed_symbol = Some(feed_symbol.clone());
        Some(Action::Feed(FeedCommand::Watch(feed_symbol)))
    }

    pub fn reset_order(&mut self) {
        self.order.reset();
        self.size_input.take();
    }

    fn clear_live_data(&mut self) {
        self.ladder.clear();
        self.ticker = None;
        self.book_cursor = None;
        self.depth_cursor = None;
    }

    /// Folds a book message into the ladder and publishes both sides in a
    /// single market patch.
    pub fn apply_book(&mut self, response: BookUpdateResponse) {
        let snapshot = response.is_snapshot();
        let mut touched = false;
        for data in response.data {
            if self.feed_symbol.as_deref() != Some(data.symbol.as_str()) {
                debug!(symbol = %data.symbol, "Ignoring book for unwatched market");
                continue;
            }
            if snapshot {
                self.ladder.apply_snapshot(Side::Bid, data.bids);
                self.ladder.apply_snapshot(Side::Ask, data.asks);
            } else {
                self.ladder.apply_update(Side::Bid, data.bids);
                self.ladder.apply_update(Side::Ask, data.asks);
            }
            touched = true;
        }
        if touched {
            self.publish_ladders();
        }
    }

    /// Publishes both sides of the live ladder in one market patch.
    fn publish_ladders(&mut self) {
        let (price_precision, size_precision) = self.precision();
        self.market.update(MarketPatch::ladders(
            self.ladder.rungs(Side::Bid),
            self.ladder.rungs(Side::Ask),
            self.ladder.raw(Side::Bid, price_precision, size_precision),
            self.ladder.raw(Side::Ask, price_precision, size_precision),
        ));
        self.clamp_book_cursor();
    }

    /// Prepends incoming trades for the viewed market.
    pub fn apply_trades(&mut self, response: TradeUpdateResponse) {
        let incoming: Vec<_> = response
            .data
            .into_iter()
            .filter(|t| self.feed_symbol.as_deref() == Some(t.symbol.as_str()))
            .collect();
        if incoming.is_empty() {
            return;
        }
        let trades = self.market.read(|m| m.trades_with(incoming));
        self.market.update(MarketPatch::trades(trades));
    }

    pub fn apply_ticker(&mut self, data: Vec<TickerData>) {
        if let Some(ticker) = data
            .into_iter()
            .rev()
            .find(|t| self.feed_symbol.as_deref() == Some(t.symbol.as_str()))
        {
            self.ticker = Some(ticker);
        }
    }

    // -- Price clicks --

    /// Writes the displayed price text into the order ticket.
    pub fn click_price(&mut self, displayed: &str) {
        let order = self.order.snapshot();
        match price_click(&order, displayed) {
            Ok(Some(patch)) => self.order.update(patch),
            Ok(None) => debug!("Price click ignored for market order"),
            Err(e) => self.show_error(e.to_string()),
        }
    }

    /// Clicks the price of the row under the book cursor.
    pub fn click_selected_row(&mut self) {
        let Some(cursor) = self.book_cursor else {
            return;
        };
        let displayed = self.market.read(|m| {
            let raw = match cursor.side {
                Side::Bid => &m.raw_bids,
                Side::Ask => &m.raw_asks,
            };
            raw.get(cursor.index).map(|level| level.price.clone())
        });
        if let Some(displayed) = displayed {
            self.click_price(&displayed);
        }
    }

    /// Clicks the most recent trade price.
    pub fn click_last_price(&mut self) {
        let (price_precision, _) = self.precision();
        let displayed = self
            .market
            .read(|m| m.last_trade().map(|t| format_decimal(t.price, price_precision)));
        if let Some(displayed) = displayed {
            self.click_price(&displayed);
        }
    }

    pub fn move_book_cursor(&mut self, down: bool) {
        let (bids, asks) = self.market.read(|m| (m.bids.len(), m.asks.len()));
        self.book_cursor = BookCursor::step(self.book_cursor, down, bids, asks);
    }

    fn clamp_book_cursor(&mut self) {
        let (bids, asks) = self.market.read(|m| (m.bids.len(), m.asks.len()));
        self.book_cursor = self.book_cursor.and_then(|c| c.clamp(bids, asks));
    }

    /// Moves the depth chart cursor one step toward higher or lower prices.
    pub fn move_depth_cursor(&mut self, up: bool) {
        let view = self
            .market
            .read(|m| crate::market::DepthView::from_ladders(&m.bids, &m.asks));
        let view = match view {
            Ok(view) => view,
            Err(e) => {
                warn!("Depth cursor unavailable: {e}");
                return;
            }
        };
        let (Some((lo, hi)), Some(mid)) = (view.x_bounds(), view.mid_price()) else {
            return;
        };
        let step = ((hi - lo) / DEPTH_CURSOR_STEPS).max(f64::EPSILON);
        let current = self.depth_cursor.unwrap_or(mid);
        let next = if up { current + step } else { current - step };
        self.depth_cursor = Some(next.clamp(lo, hi));
    }

    // -- Order ticket --

    /// Parses the size field and writes base and quote sizes in one patch.
    pub fn commit_size(&mut self) {
        let base = match self.size_input.decimal() {
            Ok(base) => base,
            Err(e) => {
                self.show_error(e.to_string());
                return;
            }
        };
        let (price_precision, size_precision) = self.precision();
        let price = self.reference_price().unwrap_or(Decimal::ZERO);
        match OrderPatch::size_from_base(base, price, size_precision, price_precision) {
            Ok(patch) => {
                self.order.update(patch);
                self.size_input.take();
            }
            Err(e) => self.show_error(e.to_string()),
        }
    }

    /// Limit price, else last trade, else ticker last.
    fn reference_price(&self) -> Option<Decimal> {
        let limit = self
            .order
            .read(|o| o.price.limit())
            .filter(|p| !p.is_zero());
        limit
            .or_else(|| self.market.read(|m| m.last_trade().map(|t| t.price)))
            .or_else(|| self.ticker.as_ref().map(|t| t.last))
    }

    pub fn cycle_order_type(&mut self) {
        let patch = self
            .order
            .read(|o| OrderPatch::order_type(o, o.order_type.next()));
        self.order.update(patch);
    }

    pub fn flip_side(&mut self) {
        let side = self.order.read(|o| o.side.flip());
        self.order.update(OrderPatch {
            side: Some(side),
            ..OrderPatch::default()
        });
    }

    pub fn cycle_time_in_force(&mut self) {
        let tif = self.order.read(|o| o.time_in_force.next());
        self.order.update(OrderPatch {
            time_in_force: Some(tif),
            ..OrderPatch::default()
        });
    }

    pub fn toggle_flag(&mut self, flag: OrderFlag) {
        let patch = self.order.read(|o| match flag {
            OrderFlag::ReduceOnly => OrderPatch {
                reduce_only: Some(!o.reduce_only),
                ..OrderPatch::default()
            },
            OrderFlag::PostOnly => OrderPatch {
                post_only: Some(!o.post_only),
                ..OrderPatch::default()
            },
            OrderFlag::StopLoss => OrderPatch {
                attach_stop_loss: Some(!o.attach_stop_loss),
                ..OrderPatch::default()
            },
            OrderFlag::TakeProfit => OrderPatch {
                attach_take_profit: Some(!o.attach_take_profit),
                ..OrderPatch::default()
            },
        });
        self.order.update(patch);
    }

    // -- Preferences --

    pub fn toggle_favorite(&mut self, symbol: &MarketSymbol) {
        match self.settings.toggle_favorite(symbol) {
            Ok(now) => info!(symbol = %symbol, favorite = now, "Toggled favourite"),
            Err(e) => self.show_error(e.to_string()),
        }
    }

    pub fn toggle_theme(&mut self) {
        let theme = self.settings.settings().theme.toggle();
        if let Err(e) = self.settings.update(SettingsPatch {
            theme: Some(theme),
            ..SettingsPatch::default()
        }) {
            self.show_error(e.to_string());
        }
    }

    pub fn theme(&self) -> Theme {
        self.settings.settings().theme
    }

    pub fn palette(&self) -> DepthPalette {
        DepthPalette::resolve(&self.theme_vars, self.theme())
    }

    // -- Query results --

    /// Stores a market list result.
    ///
    /// On the first successful load the default market's feed symbol is
    /// resolved and the stream is pointed at it.
    pub fn apply_markets(
        &mut self,
        result: std::result::Result<MarketSnapshot, String>,
    ) -> Option<Action> {
        let surface = self.markets.resolve(QueryKey::markets(), result);
        self.surface(surface);

        let len = self.visible_markets().len();
        self.market_index = self.market_index.min(len.saturating_sub(1));

        if self.feed_symbol.is_none() {
            let market = self.market_params()?.clone();
            let feed_symbol = market.feed_symbol().to_string();
            self.feed_symbol = Some(feed_symbol.clone());
            return Some(Action::Feed(FeedCommand::Watch(feed_symbol)));
        }
        None
    }

    /// Stores a user data result for the connected address.
    pub fn apply_user_data(
        &mut self,
        address: String,
        result: std::result::Result<UserData, String>,
    ) {
        if self.address.as_deref() != Some(address.as_str()) {
            debug!(address = %address, "Ignoring user data for another address");
            return;
        }
        let surface = self.user_data.resolve(QueryKey::user_data(address), result);
        self.surface(surface);
    }

    fn surface(&mut self, surface: Option<ErrorSurface>) {
        if let Some(ErrorSurface::Toast(message)) = surface {
            self.show_error(message);
        }
    }

    pub fn user_data_status(&self) -> Option<QueryStatus<'_, UserData>> {
        let address = self.address.as_ref()?;
        Some(self.user_data.status(&QueryKey::user_data(address.clone())))
    }

    /// Clears the failed query shown on the active tab and asks the poller
    /// for a fresh fetch.
    pub fn reset_query(&mut self) -> Option<Action> {
        match self.active_tab {
            Tab::Markets | Tab::Trade => self.markets.reset(&QueryKey::markets()),
            Tab::Portfolio => {
                let address = self.address.clone()?;
                self.user_data.reset(&QueryKey::user_data(address));
            }
        }
        Some(Action::Poll(PollCommand::Refresh))
    }
}

/// Top-level tabs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Markets,
    Trade,
    Portfolio,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Markets, Tab::Trade, Tab::Portfolio];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Markets => "Markets",
            Tab::Trade => "Trade",
            Tab::Portfolio => "Portfolio",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Market list filters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MarketFilter {
    #[default]
    All,
    Futures,
    Spot,
    Favorites,
    Movers,
    Volume,
}

impl MarketFilter {
    pub fn label(self) -> &'static str {
        match self {
            MarketFilter::All => "All",
            MarketFilter::Futures => "Futures",
            MarketFilter::Spot => "Spot",
            MarketFilter::Favorites => "Favorites",
            MarketFilter::Movers => "Top Movers",
            MarketFilter::Volume => "Volume",
        }
    }

    pub fn next(self) -> Self {
        match self {
            MarketFilter::All => MarketFilter::Futures,
            MarketFilter::Futures => MarketFilter::Spot,
            MarketFilter::Spot => MarketFilter::Favorites,
            MarketFilter::Favorites => MarketFilter::Movers,
            MarketFilter::Movers => MarketFilter::Volume,
            MarketFilter::Volume => MarketFilter::All,
        }
    }
}

/// Selected order book row, counted from the best price outward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BookCursor {
    pub side: Side,
    pub index: usize,
}

impl BookCursor {
    /// Moves one row down or up the rendered book.
    ///
    /// Asks are drawn above the spread with the best ask lowest, so moving
    /// down walks asks toward the spread and then bids away from it.
    pub fn step(current: Option<Self>, down: bool, bids: usize, asks: usize) -> Option<Self> {
        let at = |side, index| Some(Self { side, index });
        let Some(cursor) = current else {
            return match (bids, asks) {
                (0, 0) => None,
                (0, _) => at(Side::Ask, 0),
                _ => at(Side::Bid, 0),
            };
        };
        let next = match (cursor.side, down) {
            (Side::Ask, true) if cursor.index == 0 && bids > 0 => at(Side::Bid, 0),
            (Side::Ask, true) => at(Side::Ask, cursor.index.saturating_sub(1)),
            (Side::Ask, false) => at(Side::Ask, cursor.index + 1),
            (Side::Bid, true) => at(Side::Bid, cursor.index + 1),
            (Side::Bid, false) if cursor.index == 0 && asks > 0 => at(Side::Ask, 0),
            (Side::Bid, false) => at(Side::Bid, cursor.index.saturating_sub(1)),
        };
        next.and_then(|c| c.clamp(bids, asks))
    }

    /// Keeps the cursor on an existing row after the ladder changes.
    pub fn clamp(self, bids: usize, asks: usize) -> Option<Self> {
        let len = match self.side {
            Side::Bid => bids,
            Side::Ask => asks,
        };
        if len > 0 {
            return Some(Self {
                index: self.index.min(len - 1),
                ..self
            });
        }
        match self.side {
            Side::Bid if asks > 0 => Some(Self {
                side: Side::Ask,
                index: 0,
            }),
            Side::Ask if bids > 0 => Some(Self {
                side: Side::Bid,
                index: 0,
            }),
            _ => None,
        }
    }
}

/// Boolean order ticket options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderFlag {
    ReduceOnly,
    PostOnly,
    StopLoss,
    TakeProfit,
}

/// UI focus targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    MarketList,

    // Trade tab
    OrderBook,
    DepthChart,
    OrderTicket,

    Portfolio,
}

/// Input mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    Search,
    EditSize,
}

/// Feed connection status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Reconnecting,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "Offline",
            ConnectionStatus::Connecting => "Connecting...",
            ConnectionStatus::Connected => "Online",
            ConnectionStatus::Reconnecting => "Reconnecting...",
        }
    }
}

/// Error message with timestamp for auto-clear.
#[derive(Clone, Debug)]
pub struct ErrorDisplay {
    pub message: String,
    pub timestamp: Instant,
}
