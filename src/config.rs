use crate::errors::{LensError, Result};
use std::time::Duration;

pub const YAHOO_CHART_BASE: &str = "https://query1.finance.yahoo.com";
pub const YAHOO_SUMMARY_BASE: &str = "https://query2.finance.yahoo.com";
pub const FINNHUB_BASE: &str = "https://finnhub.io";

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

#[derive(Debug, Clone)]
pub struct Config {
    pub chart_range: String,
    pub chart_interval: String,
    pub yahoo_chart_base: String,
    pub yahoo_summary_base: String,
    pub finnhub_base: String,
    pub finnhub_api_key: Option<String>,
    pub user_agent: String,
    pub chart_timeout: Duration,
    pub identity_timeout: Duration,
    pub fundamentals_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            chart_range: "1mo".to_string(),
            chart_interval: "1d".to_string(),
            yahoo_chart_base: YAHOO_CHART_BASE.to_string(),
            yahoo_summary_base: YAHOO_SUMMARY_BASE.to_string(),
            finnhub_base: FINNHUB_BASE.to_string(),
            finnhub_api_key: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            chart_timeout: Duration::from_secs(10),
            identity_timeout: Duration::from_secs(5),
            fundamentals_timeout: Duration::from_secs(5),
        }
    }

    /// Defaults overlaid with `FINNHUB_API_KEY` and the `TICKERLENS_*` variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new();

        if let Some(key) = non_empty_var("FINNHUB_API_KEY") {
            config = config.with_finnhub_api_key(&key);
        }
        if let Some(range) = non_empty_var("TICKERLENS_CHART_RANGE") {
            config = config.with_chart_range(&range);
        }
        if let Some(interval) = non_empty_var("TICKERLENS_CHART_INTERVAL") {
            config = config.with_chart_interval(&interval);
        }
        if let Some(raw) = non_empty_var("TICKERLENS_TIMEOUT_MS") {
            config = config.with_timeout(parse_timeout_ms(&raw)?);
        }

        Ok(config)
    }

    pub fn with_chart_range(mut self, range: &str) -> Self {
        self.chart_range = range.to_string();
        self
    }

    pub fn with_chart_interval(mut self, interval: &str) -> Self {
        self.chart_interval = interval.to_string();
        self
    }

    pub fn with_finnhub_api_key(mut self, key: &str) -> Self {
        self.finnhub_api_key = Some(key.to_string());
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    pub fn with_yahoo_chart_base(mut self, base: &str) -> Self {
        self.yahoo_chart_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_yahoo_summary_base(mut self, base: &str) -> Self {
        self.yahoo_summary_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_finnhub_base(mut self, base: &str) -> Self {
        self.finnhub_base = base.trim_end_matches('/').to_string();
        self
    }

    /// Applies one bound to all three upstream fetches.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_chart_timeout(timeout)
            .with_identity_timeout(timeout)
            .with_fundamentals_timeout(timeout)
    }

    pub fn with_chart_timeout(mut self, timeout: Duration) -> Self {
        self.chart_timeout = timeout;
        self
    }

    pub fn with_identity_timeout(mut self, timeout: Duration) -> Self {
        self.identity_timeout = timeout;
        self
    }

    pub fn with_fundamentals_timeout(mut self, timeout: Duration) -> Self {
        self.fundamentals_timeout = timeout;
        self
    }

    /// Longest per-source bound, used as the HTTP client's own timeout.
    pub fn client_timeout(&self) -> Duration {
        self.chart_timeout
            .max(self.identity_timeout)
            .max(self.fundamentals_timeout)
    }
}

pub fn parse_timeout_ms(raw: &str) -> Result<Duration> {
    let millis = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| LensError::ConfigError(format!("invalid timeout '{}': {}", raw, e)))?;
    if millis == 0 {
        return Err(LensError::ConfigError("timeout must be greater than zero".to_string()));
    }
    Ok(Duration::from_millis(millis))
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_one_month_daily_window() {
        let config = Config::new();
        assert_eq!(config.chart_range, "1mo");
        assert_eq!(config.chart_interval, "1d");
        assert!(config.finnhub_api_key.is_none());
        assert_eq!(config.client_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn with_timeout_bounds_every_source() {
        let config = Config::new().with_timeout(Duration::from_millis(250));
        assert_eq!(config.chart_timeout, Duration::from_millis(250));
        assert_eq!(config.identity_timeout, Duration::from_millis(250));
        assert_eq!(config.fundamentals_timeout, Duration::from_millis(250));
    }

    #[test]
    fn base_urls_lose_trailing_slash() {
        let config = Config::new()
            .with_yahoo_chart_base("http://127.0.0.1:9001/")
            .with_yahoo_summary_base("http://127.0.0.1:9002//")
            .with_finnhub_base("http://127.0.0.1:9000/");
        assert_eq!(config.yahoo_chart_base, "http://127.0.0.1:9001");
        assert_eq!(config.yahoo_summary_base, "http://127.0.0.1:9002");
        assert_eq!(config.finnhub_base, "http://127.0.0.1:9000");
    }

    #[test]
    fn user_agent_override() {
        assert!(Config::new().user_agent.starts_with("Mozilla/5.0"));
        let config = Config::new().with_user_agent("tickerlens-ci/1.0");
        assert_eq!(config.user_agent, "tickerlens-ci/1.0");
    }

    #[test]
    fn timeout_parsing_rejects_garbage_and_zero() {
        assert_eq!(parse_timeout_ms(" 1500 ").unwrap(), Duration::from_millis(1500));
        assert!(matches!(parse_timeout_ms("soon"), Err(LensError::ConfigError(_))));
        assert!(matches!(parse_timeout_ms("0"), Err(LensError::ConfigError(_))));
    }
}
