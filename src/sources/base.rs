use crate::errors::{LensError, Result};
use crate::models::stock::{Fundamentals, Identity, PriceHistory};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;

/// Load-bearing source of the OHLCV series and quote snapshot.
#[async_trait]
pub trait PriceHistorySource {
    fn source_name(&self) -> &'static str;

    /// `Ok(None)` when the upstream answered but had no usable result.
    async fn fetch_price_history(&self, symbol: &str) -> Result<Option<PriceHistory>>;
}

/// Best-effort source of the company's long name.
#[async_trait]
pub trait IdentitySource {
    fn source_name(&self) -> &'static str;

    async fn fetch_identity(&self, symbol: &str) -> Result<Option<Identity>>;
}

/// Best-effort source of sector, industry, market cap, beta and logo.
#[async_trait]
pub trait FundamentalsSource {
    fn source_name(&self) -> &'static str;

    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Option<Fundamentals>>;
}

/// GETs `url` and returns the body of a successful response.
pub(crate) async fn fetch_body(
    client: &Client,
    source_name: &'static str,
    url: &str,
    query: &[(&str, &str)],
) -> Result<String> {
    debug!("{}: GET {}", source_name, url);

    let response = client.get(url).query(query).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(LensError::StatusError {
            source_name,
            status: status.as_u16(),
        });
    }

    Ok(response.text().await?)
}
