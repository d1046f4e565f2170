use crate::config::Config;
use crate::errors::{LensError, Result};
use crate::models::stock::Fundamentals;
use crate::sources::base::{fetch_body, FundamentalsSource};
use crate::sources::lenient::{self, non_blank};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;

/// Finnhub company profile client.
pub struct FinnhubClient {
    client: Client,
    base: String,
    api_key: Option<String>,
}

impl FinnhubClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.client_timeout())
            .build()
            .map_err(LensError::RequestError)?;

        Ok(Self {
            client,
            base: config.finnhub_base.clone(),
            api_key: config.finnhub_api_key.clone(),
        })
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct Profile {
    #[serde(default, deserialize_with = "lenient::optional")]
    sector: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    finnhub_industry: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    market_capitalization: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    beta: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    logo: Option<String>,
}

// Finnhub answers unknown symbols with `{}` and uses 0 for unknown figures.
fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && v.is_finite())
}

/// Decodes a profile2 response. `Ok(None)` when the profile carries nothing usable.
pub fn parse_profile(body: &str) -> Result<Option<Fundamentals>> {
    let profile: Profile = serde_json::from_str(body)?;

    let fundamentals = Fundamentals {
        sector: non_blank(profile.sector),
        industry: non_blank(profile.finnhub_industry),
        market_cap: non_zero(profile.market_capitalization),
        beta: non_zero(profile.beta),
        logo_url: non_blank(profile.logo),
    };

    if fundamentals == Fundamentals::default() {
        return Ok(None);
    }
    Ok(Some(fundamentals))
}

#[async_trait]
impl FundamentalsSource for FinnhubClient {
    fn source_name(&self) -> &'static str {
        "finnhub-profile"
    }

    async fn fetch_fundamentals(&self, symbol: &str) -> Result<Option<Fundamentals>> {
        let token = match &self.api_key {
            Some(key) => key.as_str(),
            None => {
                warn!("FINNHUB_API_KEY not configured, skipping fundamentals for {}", symbol);
                return Ok(None);
            }
        };

        let url = format!("{}/api/v1/stock/profile2", self.base);
        let body = fetch_body(
            &self.client,
            self.source_name(),
            &url,
            &[("symbol", symbol), ("token", token)],
        )
        .await?;

        let fundamentals = parse_profile(&body)?;
        if fundamentals.is_none() {
            debug!("Finnhub has no profile for {}", symbol);
        }
        Ok(fundamentals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_profile() {
        let body = r#"{
            "country": "US",
            "finnhubIndustry": "Technology",
            "logo": "https://static.finnhub.io/logo/aapl.png",
            "marketCapitalization": 2950000.5,
            "name": "Apple Inc",
            "ticker": "AAPL"
        }"#;
        let fundamentals = parse_profile(body).unwrap().unwrap();
        assert_eq!(fundamentals.industry.as_deref(), Some("Technology"));
        assert_eq!(fundamentals.market_cap, Some(2950000.5));
        assert_eq!(fundamentals.logo_url.as_deref(), Some("https://static.finnhub.io/logo/aapl.png"));
        assert_eq!(fundamentals.sector, None);
        assert_eq!(fundamentals.beta, None);
    }

    #[test]
    fn empty_profile_is_none() {
        assert!(parse_profile("{}").unwrap().is_none());
        assert!(parse_profile(r#"{"logo":"","marketCapitalization":0}"#).unwrap().is_none());
    }

    #[test]
    fn wrong_types_do_not_fail_the_profile() {
        let body = r#"{"finnhubIndustry":"Banking","beta":"high"}"#;
        let fundamentals = parse_profile(body).unwrap().unwrap();
        assert_eq!(fundamentals.industry.as_deref(), Some("Banking"));
        assert_eq!(fundamentals.beta, None);
    }

    #[tokio::test]
    async fn missing_api_key_skips_the_request() {
        let client = FinnhubClient::new(&Config::new().with_finnhub_base("http://127.0.0.1:9")).unwrap();
        assert!(client.fetch_fundamentals("AAPL").await.unwrap().is_none());
    }
}
