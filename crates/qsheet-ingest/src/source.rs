//! Remote question sheets.
//!
//! Sheets are fetched by slug from the public question-tracker API. The
//! response body is returned as raw JSON; turning it into a tree is the
//! normalizer's job.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use reqwest::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;

/// Public question-tracker API.
pub const DEFAULT_BASE_URL: &str = "https://node.codolio.com/api/question-tracker/v1";

/// Sheet fetched when no slug is given.
pub const DEFAULT_SLUG: &str = "striver-sde-sheet";

/// How long a fetched sheet is served from cache (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can produce a raw sheet payload for a slug.
#[allow(async_fn_in_trait)]
pub trait SheetSource {
    async fn fetch_sheet(&self, slug: &str) -> Result<Value, FetchError>;
}

/// Sheet source backed by the HTTP API.
#[derive(Debug, Clone)]
pub struct HttpSheetSource {
    client: Client,
    base_url: String,
}

impl HttpSheetSource {
    /// Create a source for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// URL of the sheet with the given slug.
    pub fn sheet_url(&self, slug: &str) -> String {
        format!("{}/sheet/public/get-sheet-by-slug/{slug}", self.base_url)
    }
}

impl SheetSource for HttpSheetSource {
    async fn fetch_sheet(&self, slug: &str) -> Result<Value, FetchError> {
        let url = self.sheet_url(slug);
        debug!(%url, "Fetching sheet");

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, concat!("qsheet/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body).map_err(FetchError::Decode)?;
        Ok(unwrap_envelope(value))
    }
}

/// API responses wrap the sheet in `{ "data": ... }`; bare payloads pass
/// through.
fn unwrap_envelope(mut value: Value) -> Value {
    match value.get_mut("data") {
        Some(data) if !data.is_null() => data.take(),
        _ => value,
    }
}

/// A payload and whether it came from the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedSheet {
    pub payload: Value,
    pub cached: bool,
}

struct CachedPayload {
    payload: Value,
    fetched_at: Instant,
}

/// Per-slug cache in front of another source.
pub struct CachedSheetSource<S> {
    inner: S,
    ttl: Duration,
    cache: Mutex<HashMap<String, CachedPayload>>,
}

impl<S: SheetSource> CachedSheetSource<S> {
    pub fn new(inner: S) -> Self {
        Self::with_ttl(inner, DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch a sheet, serving a cached copy younger than the TTL.
    pub async fn fetch(&self, slug: &str) -> Result<FetchedSheet, FetchError> {
        if let Some(payload) = self.cached(slug) {
            return Ok(FetchedSheet {
                payload,
                cached: true,
            });
        }

        let payload = self.inner.fetch_sheet(slug).await?;
        self.lock().insert(
            slug.to_string(),
            CachedPayload {
                payload: payload.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(FetchedSheet {
            payload,
            cached: false,
        })
    }

    /// Drop every cached sheet.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn cached(&self, slug: &str) -> Option<Value> {
        let mut cache = self.lock();
        let entry = cache.get(slug)?;
        let age = entry.fetched_at.elapsed();
        if age < self.ttl {
            debug!(slug, ?age, "Serving sheet from cache");
            return Some(entry.payload.clone());
        }
        cache.remove(slug);
        None
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CachedPayload>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: SheetSource> SheetSource for CachedSheetSource<S> {
    async fn fetch_sheet(&self, slug: &str) -> Result<Value, FetchError> {
        Ok(self.fetch(slug).await?.payload)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
    }

    impl SheetSource for CountingSource {
        async fn fetch_sheet(&self, slug: &str) -> Result<Value, FetchError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(json!({"slug": slug, "call": n}))
        }
    }

    #[test]
    fn sheet_url_joins_base_and_slug() {
        let source = HttpSheetSource::new("https://api.example.test/v1/").unwrap();
        assert_eq!(
            source.sheet_url("blind-75"),
            "https://api.example.test/v1/sheet/public/get-sheet-by-slug/blind-75"
        );
    }

    #[test]
    fn envelope_is_unwrapped() {
        let wrapped = json!({"status": "ok", "data": {"questions": []}});
        assert_eq!(unwrap_envelope(wrapped), json!({"questions": []}));
        let bare = json!({"questions": [1]});
        assert_eq!(unwrap_envelope(bare.clone()), bare);
        let null_data = json!({"data": null, "questions": []});
        assert_eq!(unwrap_envelope(null_data.clone()), null_data);
    }

    #[tokio::test]
    async fn second_fetch_is_served_from_cache() {
        let source = CachedSheetSource::new(CountingSource::default());
        let first = source.fetch("a").await.unwrap();
        let second = source.fetch("a").await.unwrap();

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(first.payload, second.payload);
        assert_eq!(source.inner().calls.load(Ordering::SeqCst), 1);

        // Different slugs are cached separately.
        assert!(!source.fetch("b").await.unwrap().cached);
    }

    #[tokio::test]
    async fn expired_or_cleared_entries_are_refetched() {
        let source = CachedSheetSource::with_ttl(CountingSource::default(), Duration::ZERO);
        source.fetch("a").await.unwrap();
        assert!(!source.fetch("a").await.unwrap().cached);

        let source = CachedSheetSource::new(CountingSource::default());
        source.fetch("a").await.unwrap();
        source.clear();
        assert!(!source.fetch("a").await.unwrap().cached);
        assert_eq!(source.inner().calls.load(Ordering::SeqCst), 2);
    }
}
