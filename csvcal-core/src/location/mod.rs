//! Venue addresses: display formatting and geocoding.

mod address;
mod geocode;

pub use address::format_address;
pub use geocode::{
    CacheInfo, Coordinates, GEOCODE_CACHE_CAPACITY, GeocodeError, GeocodeProvider,
    GeocodingCache, NominatimProvider,
};

#[cfg(test)]
pub(crate) use geocode::tests::FakeProvider;
