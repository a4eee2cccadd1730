//! Address to coordinate lookups with a bounded in-process cache.

use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use serde::Deserialize;
use thiserror::Error;

use crate::error::{CsvCalError, CsvCalResult};
use crate::settings::Settings;

/// Number of distinct addresses kept in the cache.
pub const GEOCODE_CACHE_CAPACITY: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Why a provider lookup failed. Never surfaces past [`GeocodingCache`].
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// An external service that turns an address into coordinates.
pub trait GeocodeProvider: Send + Sync {
    /// `Ok(None)` means the provider answered but found nothing.
    fn lookup(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Option<Coordinates>, GeocodeError>> + Send;
}

/// Nominatim (OpenStreetMap) search API client.
pub struct NominatimProvider {
    client: reqwest::Client,
    search_url: String,
}

#[derive(Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimProvider {
    pub fn new(settings: &Settings) -> CsvCalResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.geocode_timeout())
            .build()
            .map_err(|e| CsvCalError::Config(format!("Could not build geocoding client: {e}")))?;

        Ok(NominatimProvider {
            client,
            search_url: settings.geocode_url.clone(),
        })
    }
}

impl GeocodeProvider for NominatimProvider {
    async fn lookup(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status()));
        }

        let places: Vec<NominatimPlace> = response.json().await?;
        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        let latitude = place
            .lat
            .parse::<f64>()
            .map_err(|_| GeocodeError::Malformed(format!("latitude '{}'", place.lat)))?;
        let longitude = place
            .lon
            .parse::<f64>()
            .map_err(|_| GeocodeError::Malformed(format!("longitude '{}'", place.lon)))?;

        Ok(Some(Coordinates {
            latitude,
            longitude,
        }))
    }
}

/// Snapshot of cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheInfo {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub capacity: usize,
}

/// Memoizes provider answers per address, including negative ones.
///
/// The lock is only held for cache reads and writes, not during the
/// provider call, so two concurrent misses on the same address may both
/// reach the provider. Sequential lookups of a cached address never do.
pub struct GeocodingCache<P> {
    provider: P,
    enabled: bool,
    entries: Mutex<LruCache<String, Option<Coordinates>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<P: GeocodeProvider> GeocodingCache<P> {
    pub fn new(provider: P, enabled: bool) -> Self {
        Self::with_capacity(provider, enabled, GEOCODE_CACHE_CAPACITY)
    }

    pub fn with_capacity(provider: P, enabled: bool, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        GeocodingCache {
            provider,
            enabled,
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Coordinates for `address`, or `None` when disabled, unknown or failing.
    pub async fn resolve(&self, address: &str) -> Option<Coordinates> {
        if !self.enabled {
            return None;
        }

        if let Some(cached) = self.cached(address) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(address, "geocode cache hit");
            return cached;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(address, "geocode cache miss");

        let coordinates = match self.provider.lookup(address).await {
            Ok(coordinates) => coordinates,
            Err(e) => {
                tracing::warn!(address, error = %e, "geocoding failed");
                None
            }
        };

        self.lock().put(address.to_string(), coordinates);
        coordinates
    }

    pub fn cache_info(&self) -> CacheInfo {
        let entries = self.lock();
        CacheInfo {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: entries.len(),
            capacity: entries.cap().get(),
        }
    }

    /// Drop all cached answers and reset the counters.
    pub fn clear(&self) {
        self.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn cached(&self, address: &str) -> Option<Option<Coordinates>> {
        self.lock().get(address).copied()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<String, Option<Coordinates>>> {
        // Entries stay valid after a panic in another lookup
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
