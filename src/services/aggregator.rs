use crate::analytics::domain::guess_domain;
use crate::analytics::{metrics, series};
use crate::config::Config;
use crate::errors::{LensError, Result};
use crate::models::stock::{
    Fundamentals, Identity, PriceHistory, StockRecord, StockResponse, MISSING_SYMBOL, NO_CHART_DATA,
};
use crate::sources::base::{FundamentalsSource, IdentitySource, PriceHistorySource};
use crate::sources::finnhub::FinnhubClient;
use crate::sources::yahoo::YahooClient;
use log::{debug, info, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Merges price history, identity and fundamentals for one symbol per call.
pub struct Aggregator {
    config: Config,
    price_history: Arc<dyn PriceHistorySource + Send + Sync>,
    identity: Arc<dyn IdentitySource + Send + Sync>,
    fundamentals: Arc<dyn FundamentalsSource + Send + Sync>,
}

impl Aggregator {
    pub fn new(
        config: Config,
        price_history: Arc<dyn PriceHistorySource + Send + Sync>,
        identity: Arc<dyn IdentitySource + Send + Sync>,
        fundamentals: Arc<dyn FundamentalsSource + Send + Sync>,
    ) -> Self {
        Self {
            config,
            price_history,
            identity,
            fundamentals,
        }
    }

    /// Wires the Yahoo and Finnhub HTTP clients.
    pub fn from_config(config: Config) -> Result<Self> {
        let yahoo = Arc::new(YahooClient::new(&config)?);
        let finnhub = Arc::new(FinnhubClient::new(&config)?);
        Ok(Self::new(config, yahoo.clone(), yahoo, finnhub))
    }

    /// Never fails: upstream problems become `null` fields or an error marker.
    pub async fn aggregate(&self, symbol: &str) -> StockResponse {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return StockResponse::error(MISSING_SYMBOL);
        }

        info!("Aggregating {}", symbol);

        let (chain, fundamentals) = tokio::join!(
            self.fetch_history_and_identity(symbol),
            self.fetch_fundamentals(symbol)
        );

        match chain {
            Some((history, identity)) => {
                let record = build_record(symbol, &history, identity.as_ref(), fundamentals.as_ref());
                debug!(
                    "{}: trend {:?}, volatility {:?}, domain {:?}",
                    symbol, record.trend, record.volatility, record.domain
                );
                StockResponse::Record(Box::new(record))
            }
            None => StockResponse::error(NO_CHART_DATA),
        }
    }

    async fn fetch_history_and_identity(&self, symbol: &str) -> Option<(PriceHistory, Option<Identity>)> {
        let source_name = self.price_history.source_name();
        let outcome = bounded(
            source_name,
            self.config.chart_timeout,
            self.price_history.fetch_price_history(symbol),
        )
        .await;

        let history = match outcome {
            Ok(Some(history)) => history,
            Ok(None) => {
                warn!("{} returned no chart data for {}", source_name, symbol);
                return None;
            }
            Err(e) if e.is_unavailable() => {
                warn!("{} unavailable for {}: {}", source_name, symbol, e);
                return None;
            }
            Err(e) => {
                warn!("{} sent an unreadable response for {}: {}", source_name, symbol, e);
                return None;
            }
        };

        let source_name = self.identity.source_name();
        let identity = best_effort(
            source_name,
            symbol,
            bounded(
                source_name,
                self.config.identity_timeout,
                self.identity.fetch_identity(symbol),
            )
            .await,
        );

        Some((history, identity))
    }

    async fn fetch_fundamentals(&self, symbol: &str) -> Option<Fundamentals> {
        let source_name = self.fundamentals.source_name();
        best_effort(
            source_name,
            symbol,
            bounded(
                source_name,
                self.config.fundamentals_timeout,
                self.fundamentals.fetch_fundamentals(symbol),
            )
            .await,
        )
    }
}

/// Runs `fetch` under `limit`; running out of time is reported as a timeout error.
async fn bounded<T, F>(source_name: &'static str, limit: Duration, fetch: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fetch).await {
        Ok(outcome) => outcome,
        Err(_) => Err(LensError::TimeoutError {
            source_name,
            millis: limit.as_millis(),
        }),
    }
}

fn best_effort<T>(source_name: &str, symbol: &str, outcome: Result<Option<T>>) -> Option<T> {
    match outcome {
        Ok(value) => value,
        Err(e) => {
            warn!("{} unavailable for {}, leaving its fields empty: {}", source_name, symbol, e);
            None
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Builds the output record from already-fetched inputs.
pub fn build_record(
    symbol: &str,
    history: &PriceHistory,
    identity: Option<&Identity>,
    fundamentals: Option<&Fundamentals>,
) -> StockRecord {
    let meta = &history.meta;
    let bars = &history.series;

    let closes = bars.closes();
    let adj_closes = bars.adj_closes();
    let highs = bars.highs();
    let repaired = series::repair(&closes, &adj_closes, &highs);

    let name = identity
        .and_then(|i| present(&i.long_name))
        .or_else(|| present(&meta.long_name))
        .unwrap_or(symbol)
        .to_string();
    let domain = guess_domain(Some(name.as_str()));

    let fundamentals = fundamentals.cloned().unwrap_or_default();

    StockRecord {
        symbol: present(&meta.symbol).unwrap_or(symbol).to_string(),
        name,

        price: meta.current_price,
        prev_close: meta.previous_close,
        open: bars.latest(&bars.open),
        high: bars.latest(&bars.high),
        low: bars.latest(&bars.low),
        volume: bars.latest(&bars.volume),

        fifty_two_week_high: meta.fifty_two_week_high,
        fifty_two_week_low: meta.fifty_two_week_low,

        currency: meta.currency.clone(),
        exchange: meta.exchange_name.clone(),

        timestamps: bars.timestamps.clone(),
        closes: repaired.to_vec(),
        change: metrics::change(meta.current_price, meta.previous_close),
        percent_change: metrics::percent_change(meta.current_price, meta.previous_close),
        fifty_day_ma: metrics::fifty_day_ma(&bars.close),
        trend: metrics::trend(repaired),
        avg_volume: metrics::avg_volume(&bars.volume, bars.latest_index()),
        volatility: metrics::volatility(repaired),

        domain,
        logo: fundamentals.logo_url,

        sector: fundamentals.sector,
        industry: fundamentals.industry,
        market_cap: fundamentals.market_cap,
        beta: fundamentals.beta,
    }
}
