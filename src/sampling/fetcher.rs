//! Sample fetchers.
//!
//! # Responsibilities
//! - Perform one bounded request against the price API
//! - Extract the price and its upstream timestamp
//! - Classify every failure as a typed `FetchError`

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::SourceConfig;
use crate::sampling::types::{FetchError, FetchResult, Sample};

/// Source of price samples consumed by the poller.
#[async_trait]
pub trait SampleFetcher: Send + Sync {
    /// Fetch one sample. Must complete or fail within a bounded time.
    async fn fetch(&self) -> FetchResult<Sample>;
}

/// Fetcher for a CoinGecko-style simple-price endpoint.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    api_url: String,
    coin_id: String,
    vs_currency: String,
    timeout_duration: Duration,
}

impl HttpFetcher {
    /// Create a fetcher from the source configuration.
    pub fn new(config: &SourceConfig) -> FetchResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if !config.use_env_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            coin_id: config.coin_id.clone(),
            vs_currency: config.vs_currency.clone(),
            timeout_duration: config.timeout(),
        })
    }

    /// Override the request deadline.
    pub fn with_timeout(mut self, timeout_duration: Duration) -> Self {
        self.timeout_duration = timeout_duration;
        self
    }

    async fn request(&self) -> FetchResult<Value> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("ids", self.coin_id.as_str()),
                ("vs_currencies", self.vs_currency.as_str()),
                ("include_last_updated_at", "true"),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| FetchError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl SampleFetcher for HttpFetcher {
    async fn fetch(&self) -> FetchResult<Sample> {
        let body = match timeout(self.timeout_duration, self.request()).await {
            Ok(result) => result?,
            Err(_) => return Err(FetchError::Timeout(self.timeout_duration)),
        };

        parse_simple_price(&body, &self.coin_id, &self.vs_currency)
    }
}

/// Extract a sample from a simple-price response body.
///
/// Expected shape: `{ "<coin>": { "<currency>": 43210.5, "last_updated_at": 1700000000 } }`.
pub fn parse_simple_price(body: &Value, coin_id: &str, vs_currency: &str) -> FetchResult<Sample> {
    let entry = body
        .get(coin_id)
        .ok_or_else(|| FetchError::MissingField(coin_id.to_string()))?;

    let value = entry
        .get(vs_currency)
        .ok_or_else(|| FetchError::MissingField(format!("{}.{}", coin_id, vs_currency)))?
        .as_f64()
        .ok_or_else(|| {
            FetchError::MalformedResponse(format!("{}.{} is not a number", coin_id, vs_currency))
        })?;

    let ts = entry
        .get("last_updated_at")
        .ok_or_else(|| FetchError::MissingField(format!("{}.last_updated_at", coin_id)))?
        .as_i64()
        .ok_or_else(|| {
            FetchError::MalformedResponse(format!("{}.last_updated_at is not an integer", coin_id))
        })?;

    let observed_at: DateTime<Utc> = Utc
        .timestamp_opt(ts, 0)
        .single()
        .ok_or_else(|| FetchError::MalformedResponse(format!("timestamp {} out of range", ts)))?;

    Ok(Sample::new(value, observed_at))
}
