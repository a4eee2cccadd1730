use std::io::Write;

use anyhow::Result;

use csvcal_core::{GeocodingCache, NominatimProvider, Settings, calendar_path, csv_to_ical};

pub async fn run(settings: Settings, name: &str) -> Result<()> {
    let path = calendar_path(&settings.data_dir, name)?;
    let geocoder = GeocodingCache::new(NominatimProvider::new(&settings)?, settings.geocode_enabled);

    let ics = csv_to_ical(&path, name, &settings, &geocoder).await?;

    std::io::stdout().write_all(&ics)?;
    Ok(())
}
