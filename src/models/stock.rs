use serde::Serialize;

/// Index-aligned daily bars. Entries are `None` where the upstream reported a gap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    pub timestamps: Vec<Option<i64>>,
    pub open: Vec<Option<f64>>,
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
    pub close: Vec<Option<f64>>,
    pub volume: Vec<Option<f64>>,
    pub adj_close: Vec<Option<f64>>,
}

impl PriceSeries {
    /// Index of the latest observed session, taken from the close array.
    pub fn latest_index(&self) -> Option<usize> {
        self.close.len().checked_sub(1)
    }

    /// Value of `column` at the latest session, if present.
    pub fn latest(&self, column: &[Option<f64>]) -> Option<f64> {
        self.latest_index()
            .and_then(|i| column.get(i).copied().flatten())
    }

    pub fn closes(&self) -> Vec<f64> {
        numeric(&self.close)
    }

    pub fn adj_closes(&self) -> Vec<f64> {
        numeric(&self.adj_close)
    }

    pub fn highs(&self) -> Vec<f64> {
        numeric(&self.high)
    }
}

/// Drops gaps and non-finite values, keeping order.
pub fn numeric(values: &[Option<f64>]) -> Vec<f64> {
    values
        .iter()
        .filter_map(|v| *v)
        .filter(|v| v.is_finite())
        .collect()
}

/// Scalar snapshot reported alongside the price series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteMeta {
    pub symbol: Option<String>,
    pub long_name: Option<String>,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub currency: Option<String>,
    pub exchange_name: Option<String>,
}

/// Usable result of a price-history fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceHistory {
    pub meta: QuoteMeta,
    pub series: PriceSeries,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Identity {
    pub long_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fundamentals {
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
    pub beta: Option<f64>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

/// Merged per-symbol record. Every key is serialized; missing values become `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub symbol: String,
    pub name: String,

    pub price: Option<f64>,
    pub prev_close: Option<f64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub volume: Option<f64>,

    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,

    pub currency: Option<String>,
    pub exchange: Option<String>,

    pub timestamps: Vec<Option<i64>>,
    pub closes: Vec<f64>,
    pub change: Option<f64>,
    pub percent_change: Option<f64>,
    #[serde(rename = "fiftyDayMA")]
    pub fifty_day_ma: Option<f64>,
    pub trend: Option<Trend>,
    pub avg_volume: Option<f64>,
    pub volatility: Option<f64>,

    pub domain: Option<String>,
    pub logo: Option<String>,

    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
    pub beta: Option<f64>,
}

pub const MISSING_SYMBOL: &str = "Missing symbol";
pub const NO_CHART_DATA: &str = "No chart data available";

/// What the aggregator hands to its callers: a record or a single error marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StockResponse {
    Record(Box<StockRecord>),
    Error { error: String },
}

impl StockResponse {
    pub fn error(marker: &str) -> Self {
        StockResponse::Error {
            error: marker.to_string(),
        }
    }

    pub fn record(&self) -> Option<&StockRecord> {
        match self {
            StockResponse::Record(record) => Some(record.as_ref()),
            StockResponse::Error { .. } => None,
        }
    }

    pub fn error_marker(&self) -> Option<&str> {
        match self {
            StockResponse::Record(_) => None,
            StockResponse::Error { error } => Some(error.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_follows_close_length() {
        let series = PriceSeries {
            close: vec![Some(1.0), Some(2.0), Some(3.0)],
            volume: vec![Some(10.0), Some(20.0), None],
            open: vec![Some(0.5), Some(1.5), Some(2.5)],
            ..Default::default()
        };
        assert_eq!(series.latest_index(), Some(2));
        assert_eq!(series.latest(&series.open), Some(2.5));
        assert_eq!(series.latest(&series.volume), None);
        assert_eq!(series.latest(&series.high), None);
    }

    #[test]
    fn numeric_skips_gaps_and_nan() {
        let values = vec![Some(1.0), None, Some(f64::NAN), Some(4.0)];
        assert_eq!(numeric(&values), vec![1.0, 4.0]);
    }

    #[test]
    fn error_marker_serializes_as_single_field() {
        let json = serde_json::to_value(StockResponse::error(NO_CHART_DATA)).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "No chart data available" }));
    }

    #[test]
    fn trend_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Trend::Up).unwrap(), "\"up\"");
        assert_eq!(serde_json::to_string(&Trend::Down).unwrap(), "\"down\"");
    }
}
