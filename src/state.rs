use std::sync::Arc;

use anyhow::Result;
use csvcal_core::{GeocodeProvider, GeocodingCache, NominatimProvider, Settings};

/// Shared application state
///
/// Calendars are converted on every request so CSV edits show up
/// immediately; only geocoding answers are kept between requests.
pub struct AppState<P = NominatimProvider> {
    pub settings: Arc<Settings>,
    pub geocoder: Arc<GeocodingCache<P>>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        AppState {
            settings: Arc::clone(&self.settings),
            geocoder: Arc::clone(&self.geocoder),
        }
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self> {
        let provider = NominatimProvider::new(&settings)?;
        Ok(Self::with_provider(settings, provider))
    }
}

impl<P: GeocodeProvider> AppState<P> {
    pub fn with_provider(settings: Settings, provider: P) -> Self {
        let geocoder = GeocodingCache::new(provider, settings.geocode_enabled);
        AppState {
            settings: Arc::new(settings),
            geocoder: Arc::new(geocoder),
        }
    }
}
