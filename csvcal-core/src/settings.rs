//! Process-wide settings.
//!
//! Settings are resolved once at startup from defaults, an optional TOML
//! file and `CSVCAL_*` environment variables, then passed by reference to
//! everything that needs them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{CsvCalError, CsvCalResult};

static DEFAULT_CONFIG_FILE: &str = "csvcal.toml";
static ENV_PREFIX: &str = "CSVCAL";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// IANA zone used for records without a `timezone` column
    #[serde(default = "default_tz")]
    pub tz: String,

    /// Directory holding the `<name>.csv` calendar sources
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Region/country suffix for records without a `place` column
    #[serde(default)]
    pub default_place: String,

    #[serde(default = "default_true")]
    pub geocode_enabled: bool,

    /// User agent sent to the geocoding provider
    #[serde(default = "default_name")]
    pub user_agent: String,

    /// Namespace for PRODID and event UIDs
    #[serde(default = "default_name")]
    pub project_name: String,

    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,

    #[serde(default = "default_geocode_timeout_secs")]
    pub geocode_timeout_secs: u64,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tz() -> String {
    "Europe/Berlin".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_true() -> bool {
    true
}

fn default_name() -> String {
    "csvcal".to_string()
}

fn default_geocode_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_geocode_timeout_secs() -> u64 {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            tz: default_tz(),
            data_dir: default_data_dir(),
            default_place: String::new(),
            geocode_enabled: default_true(),
            user_agent: default_name(),
            project_name: default_name(),
            geocode_url: default_geocode_url(),
            geocode_timeout_secs: default_geocode_timeout_secs(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Settings {
    /// Load settings from `.env`, the config file and the environment.
    ///
    /// When `path` is `None`, `csvcal.toml` in the working directory is used
    /// if it exists. An explicitly given path must exist.
    pub fn load(path: Option<&Path>) -> CsvCalResult<Self> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(|e| CsvCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CsvCalError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the converter cannot work with.
    pub fn validate(&self) -> CsvCalResult<()> {
        self.default_timezone()?;
        if self.project_name.trim().is_empty() {
            return Err(CsvCalError::Config("project_name must not be empty".into()));
        }
        Ok(())
    }

    pub fn default_timezone(&self) -> CsvCalResult<Tz> {
        self.tz
            .parse::<Tz>()
            .map_err(|_| CsvCalError::Config(format!("Unknown timezone '{}'", self.tz)))
    }

    pub fn geocode_timeout(&self) -> Duration {
        Duration::from_secs(self.geocode_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.default_timezone().unwrap(), chrono_tz::Europe::Berlin);
        assert_eq!(settings.bind_address(), "127.0.0.1:8000");
    }

    #[test]
    fn load_reads_toml_file_over_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "tz = \"America/New_York\"\ndefault_place = \"Germany\"\ngeocode_enabled = false"
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();

        assert_eq!(settings.tz, "America/New_York");
        assert_eq!(settings.default_place, "Germany");
        assert!(!settings.geocode_enabled);
        assert_eq!(settings.project_name, "csvcal");
    }

    #[test]
    fn load_rejects_unknown_timezone() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "tz = \"Mars/Olympus_Mons\"").unwrap();

        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, CsvCalError::Config(_)), "got {err:?}");
    }

    #[test]
    fn load_fails_for_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Settings::load(Some(&missing)).is_err());
    }
}
