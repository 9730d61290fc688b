//! Polled REST data services: the market list and per-address user data.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::Result;
use crate::config::DataConfig;
use crate::models::MarketSnapshot;
use crate::models::account::UserData;
use crate::tui::Message;

/// Fetches and validates the market list.
///
/// Records failing [`MarketData::validate`](crate::models::MarketData::validate)
/// are dropped with a warning rather than failing the whole snapshot.
///
/// # Errors
///
/// Returns [`DeskError::Http`](crate::DeskError::Http) on transport
/// failures, non-success status codes, or undecodable bodies.
pub async fn fetch_markets(client: &reqwest::Client, url: &str) -> Result<MarketSnapshot> {
    let mut snapshot: MarketSnapshot = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let rejected = snapshot.retain_valid();
    if rejected > 0 {
        warn!(rejected, "Dropped invalid market records");
    }
    debug!(
        futures = snapshot.futures.len(),
        spot = snapshot.spot.len(),
        "Fetched market list"
    );
    Ok(snapshot)
}

/// Fetches open orders, order history and positions for `address`.
///
/// # Errors
///
/// Returns [`DeskError::Http`](crate::DeskError::Http) on transport
/// failures, non-success status codes, or undecodable bodies.
pub async fn fetch_user_data(
    client: &reqwest::Client,
    base_url: &str,
    address: &str,
) -> Result<UserData> {
    let url = format!("{}/{address}", base_url.trim_end_matches('/'));
    let data = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(data)
}

/// Commands sent from the app loop to the poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollCommand {
    /// Fetch immediately instead of waiting for the next tick.
    Refresh,
}

/// Periodically fetches the REST sources and posts results to the app loop.
///
/// Fetches run one after another, so results for a key arrive in request
/// order.
pub struct Poller {
    client: reqwest::Client,
    config: DataConfig,
    tx: mpsc::UnboundedSender<Message>,
    cmd_rx: mpsc::UnboundedReceiver<PollCommand>,
}

impl Poller {
    #[must_use]
    pub fn new(
        config: DataConfig,
        tx: mpsc::UnboundedSender<Message>,
        cmd_rx: mpsc::UnboundedReceiver<PollCommand>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            tx,
            cmd_rx,
        }
    }

    /// Runs until the app loop goes away.
    pub async fn run(mut self) {
        let mut interval = tokio::time::interval(self.config.poll_interval);
        info!(
            interval_secs = self.config.poll_interval.as_secs(),
            "Starting data poller"
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(PollCommand::Refresh) => interval.reset(),
                    None => return,
                },
            }

            if !self.poll_once().await {
                info!("Data poller shutting down");
                return;
            }
        }
    }

    /// Fetches every source once. Returns `false` once the app loop is gone.
    async fn poll_once(&self) -> bool {
        let markets = fetch_markets(&self.client, &self.config.markets_url)
            .await
            .map_err(|e| e.to_string());
        if self.tx.send(Message::Markets(markets)).is_err() {
            return false;
        }

        if let (Some(base_url), Some(address)) = (&self.config.user_url, &self.config.address) {
            let result = fetch_user_data(&self.client, base_url, address)
                .await
                .map_err(|e| e.to_string());
            let message = Message::UserData {
                address: address.clone(),
                result,
            };
            if self.tx.send(message).is_err() {
                return false;
            }
        }
        true
    }
}
