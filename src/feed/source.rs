use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Url, header};
use serde_json::Value;
use time::OffsetDateTime;

use crate::feed::{
    error::{FeedError, fetch_error, format_error, transport_error},
    types::{RecordSet, decode_record_set},
};

pub const CACHE_BUST_PARAM: &str = "t";

/// Upstream producer of the daily record set.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Retrieves the raw JSON document. Every call is a round-trip to the upstream.
    async fn fetch_document(&self) -> Result<Value, FeedError>;

    async fn fetch_records(&self) -> Result<RecordSet, FeedError> {
        decode_record_set(self.fetch_document().await?)
    }
}

#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: Client,
    document_url: Url,
    timeout: Option<Duration>,
}

impl HttpFeedSource {
    pub fn new(
        base_url: &str,
        document: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, FeedError> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| transport_error(format!("failed to build http client: {err}")))?;
        Self::with_client(client, base_url, document, timeout)
    }

    pub fn with_client(
        client: Client,
        base_url: &str,
        document: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, FeedError> {
        let raw = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            document.trim_start_matches('/')
        );
        let document_url = Url::parse(&raw)
            .map_err(|err| transport_error(format!("invalid feed url '{raw}': {err}")))?;
        if !matches!(document_url.scheme(), "http" | "https") {
            return Err(transport_error(format!(
                "unsupported feed url scheme '{}'",
                document_url.scheme()
            )));
        }

        Ok(Self {
            client,
            document_url,
            timeout,
        })
    }

    pub fn document_url(&self) -> &Url {
        &self.document_url
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_document(&self) -> Result<Value, FeedError> {
        let cache_bust = cache_bust_value(OffsetDateTime::now_utc());
        let started_at = Instant::now();
        tracing::debug!(
            target: "feed.http",
            url = %self.document_url,
            cache_bust = %cache_bust,
            "feed_request_start"
        );

        let mut request = self
            .client
            .get(self.document_url.clone())
            .query(&[(CACHE_BUST_PARAM, cache_bust.as_str())])
            .header(header::ACCEPT, "application/json")
            .header(header::CACHE_CONTROL, "no-cache");
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|err| {
            tracing::warn!(target: "feed.http", error = %err, "feed_request_failed");
            transport_error(format!("feed request failed: {err}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                target: "feed.http",
                status = status.as_u16(),
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                "feed_request_rejected"
            );
            return Err(fetch_error(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| transport_error(format!("failed to read feed body: {err}")))?;
        tracing::debug!(
            target: "feed.http",
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "feed_request_completed"
        );

        serde_json::from_slice(&body)
            .map_err(|err| format_error(format!("feed body is not valid json: {err}")))
    }
}

fn cache_bust_value(now: OffsetDateTime) -> String {
    (now.unix_timestamp_nanos() / 1_000_000).to_string()
}
