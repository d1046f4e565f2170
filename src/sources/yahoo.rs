use crate::config::Config;
use crate::errors::{LensError, Result};
use crate::models::stock::{Identity, PriceHistory, PriceSeries, QuoteMeta};
use crate::sources::base::{fetch_body, IdentitySource, PriceHistorySource};
use crate::sources::lenient::{self, non_blank};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;

/// Yahoo Finance client serving both the chart and the quoteType endpoints.
pub struct YahooClient {
    client: Client,
    chart_base: String,
    summary_base: String,
    range: String,
    interval: String,
}

impl YahooClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.client_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(LensError::RequestError)?;

        Ok(Self {
            client,
            chart_base: config.yahoo_chart_base.clone(),
            summary_base: config.yahoo_summary_base.clone(),
            range: config.chart_range.clone(),
            interval: config.chart_interval.clone(),
        })
    }
}

#[derive(Deserialize, Debug, Default)]
struct ChartEnvelope {
    #[serde(default, deserialize_with = "lenient::optional")]
    chart: Option<ChartBody>,
}

#[derive(Deserialize, Debug, Default)]
struct ChartBody {
    #[serde(default, deserialize_with = "lenient::optional")]
    result: Option<Vec<ChartResult>>,
}

#[derive(Deserialize, Debug, Default)]
struct ChartResult {
    #[serde(default, deserialize_with = "lenient::optional")]
    meta: Option<ChartMeta>,
    #[serde(default, deserialize_with = "lenient::timestamps")]
    timestamp: Vec<Option<i64>>,
    #[serde(default, deserialize_with = "lenient::optional")]
    indicators: Option<ChartIndicators>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    #[serde(default, deserialize_with = "lenient::optional")]
    symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    long_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    regular_market_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    chart_previous_close: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    fifty_two_week_high: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    fifty_two_week_low: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    currency: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    exchange_name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct ChartIndicators {
    #[serde(default, deserialize_with = "lenient::optional")]
    quote: Option<Vec<QuoteColumns>>,
    #[serde(default, deserialize_with = "lenient::optional")]
    adjclose: Option<Vec<AdjCloseColumn>>,
}

#[derive(Deserialize, Debug, Default)]
struct QuoteColumns {
    #[serde(default, deserialize_with = "lenient::column")]
    open: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "lenient::column")]
    high: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "lenient::column")]
    low: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "lenient::column")]
    close: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "lenient::column")]
    volume: Vec<Option<f64>>,
}

#[derive(Deserialize, Debug, Default)]
struct AdjCloseColumn {
    #[serde(default, deserialize_with = "lenient::column")]
    adjclose: Vec<Option<f64>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct SummaryEnvelope {
    #[serde(default, deserialize_with = "lenient::optional")]
    quote_summary: Option<SummaryBody>,
}

#[derive(Deserialize, Debug, Default)]
struct SummaryBody {
    #[serde(default, deserialize_with = "lenient::optional")]
    result: Option<Vec<SummaryResult>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    #[serde(default, deserialize_with = "lenient::optional")]
    quote_type: Option<QuoteType>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct QuoteType {
    #[serde(default, deserialize_with = "lenient::optional")]
    long_name: Option<String>,
}

/// Decodes a v8 chart response. `Ok(None)` when `chart.result[0]` is missing.
pub fn parse_chart(body: &str) -> Result<Option<PriceHistory>> {
    let envelope: ChartEnvelope = serde_json::from_str(body)?;

    let result = match envelope
        .chart
        .and_then(|c| c.result)
        .and_then(|r| r.into_iter().next())
    {
        Some(result) => result,
        None => return Ok(None),
    };

    let meta = result.meta.unwrap_or_default();
    let indicators = result.indicators.unwrap_or_default();
    let quote = indicators
        .quote
        .and_then(|q| q.into_iter().next())
        .unwrap_or_default();
    let adj_close = indicators
        .adjclose
        .and_then(|a| a.into_iter().next())
        .map(|a| a.adjclose)
        .unwrap_or_default();

    Ok(Some(PriceHistory {
        meta: QuoteMeta {
            symbol: non_blank(meta.symbol),
            long_name: non_blank(meta.long_name),
            current_price: meta.regular_market_price,
            previous_close: meta.chart_previous_close,
            fifty_two_week_high: meta.fifty_two_week_high,
            fifty_two_week_low: meta.fifty_two_week_low,
            currency: non_blank(meta.currency),
            exchange_name: non_blank(meta.exchange_name),
        },
        series: PriceSeries {
            timestamps: result.timestamp,
            open: quote.open,
            high: quote.high,
            low: quote.low,
            close: quote.close,
            volume: quote.volume,
            adj_close,
        },
    }))
}

/// Decodes a quoteSummary response with the `quoteType` module.
pub fn parse_identity(body: &str) -> Result<Option<Identity>> {
    let envelope: SummaryEnvelope = serde_json::from_str(body)?;

    let long_name = envelope
        .quote_summary
        .and_then(|s| s.result)
        .and_then(|r| r.into_iter().next())
        .and_then(|r| r.quote_type)
        .and_then(|q| non_blank(q.long_name));

    Ok(long_name.map(|name| Identity {
        long_name: Some(name),
    }))
}

#[async_trait]
impl PriceHistorySource for YahooClient {
    fn source_name(&self) -> &'static str {
        "yahoo-chart"
    }

    async fn fetch_price_history(&self, symbol: &str) -> Result<Option<PriceHistory>> {
        let url = format!("{}/v8/finance/chart/{}", self.chart_base, symbol);
        let body = fetch_body(
            &self.client,
            PriceHistorySource::source_name(self),
            &url,
            &[("interval", self.interval.as_str()), ("range", self.range.as_str())],
        )
        .await?;

        let history = parse_chart(&body)?;
        match &history {
            Some(h) => info!("Fetched {} sessions of price history for {}", h.series.close.len(), symbol),
            None => debug!("Chart response for {} carried no result", symbol),
        }
        Ok(history)
    }
}

#[async_trait]
impl IdentitySource for YahooClient {
    fn source_name(&self) -> &'static str {
        "yahoo-quote-type"
    }

    async fn fetch_identity(&self, symbol: &str) -> Result<Option<Identity>> {
        let url = format!("{}/v10/finance/quoteSummary/{}", self.summary_base, symbol);
        let body = fetch_body(
            &self.client,
            IdentitySource::source_name(self),
            &url,
            &[("modules", "quoteType")],
        )
        .await?;

        parse_identity(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "symbol": "AAPL",
                    "longName": "Apple Inc.",
                    "currency": "USD",
                    "exchangeName": "NMS",
                    "regularMarketPrice": 189.5,
                    "chartPreviousClose": 185.0,
                    "fiftyTwoWeekHigh": 199.6,
                    "fiftyTwoWeekLow": 164.1
                },
                "timestamp": [1700000000, 1700086400, 1700172800],
                "indicators": {
                    "quote": [{
                        "open": [184.0, 186.0, 188.0],
                        "high": [186.0, 188.5, 190.0],
                        "low": [183.0, 185.5, 187.0],
                        "close": [185.5, null, 189.5],
                        "volume": [50000000, 42000000, 61000000]
                    }],
                    "adjclose": [{ "adjclose": [185.4, 187.2, 189.4] }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn parses_full_chart() {
        let history = parse_chart(CHART).unwrap().unwrap();
        assert_eq!(history.meta.symbol.as_deref(), Some("AAPL"));
        assert_eq!(history.meta.long_name.as_deref(), Some("Apple Inc."));
        assert_eq!(history.meta.current_price, Some(189.5));
        assert_eq!(history.meta.previous_close, Some(185.0));
        assert_eq!(history.meta.exchange_name.as_deref(), Some("NMS"));
        assert_eq!(history.series.timestamps.len(), 3);
        assert_eq!(history.series.close, vec![Some(185.5), None, Some(189.5)]);
        assert_eq!(history.series.volume[2], Some(61000000.0));
        assert_eq!(history.series.adj_close.len(), 3);
    }

    #[test]
    fn null_timestamp_keeps_later_sessions_aligned() {
        let body = r#"{"chart":{"result":[{
            "timestamp": [1700000000, null, 1700172800],
            "indicators": {"quote": [{"close": [null, 2.0, 3.0]}]}
        }]}}"#;
        let series = parse_chart(body).unwrap().unwrap().series;
        assert_eq!(series.timestamps, vec![Some(1_700_000_000), None, Some(1_700_172_800)]);
        assert_eq!(series.timestamps.len(), series.close.len());
    }

    #[test]
    fn missing_result_is_none() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#;
        assert!(parse_chart(body).unwrap().is_none());
        assert!(parse_chart(r#"{"chart":{"result":[]}}"#).unwrap().is_none());
        assert!(parse_chart("{}").unwrap().is_none());
    }

    #[test]
    fn wrongly_typed_meta_field_becomes_null() {
        let body = r#"{"chart":{"result":[{"meta":{"symbol":"X","regularMarketPrice":"n/a"}}]}}"#;
        let history = parse_chart(body).unwrap().unwrap();
        assert_eq!(history.meta.symbol.as_deref(), Some("X"));
        assert_eq!(history.meta.current_price, None);
        assert!(history.series.close.is_empty());
    }

    #[test]
    fn non_json_body_is_an_error() {
        assert!(matches!(parse_chart("<html>"), Err(LensError::JsonError(_))));
    }

    #[test]
    fn parses_identity_long_name() {
        let body = r#"{"quoteSummary":{"result":[{"quoteType":{"symbol":"MSFT","longName":"Microsoft Corporation"}}],"error":null}}"#;
        let identity = parse_identity(body).unwrap().unwrap();
        assert_eq!(identity.long_name.as_deref(), Some("Microsoft Corporation"));
    }

    #[test]
    fn blank_identity_is_none() {
        let body = r#"{"quoteSummary":{"result":[{"quoteType":{"longName":""}}]}}"#;
        assert!(parse_identity(body).unwrap().is_none());
        assert!(parse_identity(r#"{"quoteSummary":{"result":null}}"#).unwrap().is_none());
    }
}
