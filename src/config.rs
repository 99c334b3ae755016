use std::env;

use thiserror::Error;

const DEFAULT_DB_NAME: &str = "event_booking";
const DEFAULT_APP_NAME: &str = "event_booking";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mongodb_uri: String,
    pub database_name: String,
    pub app_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mongodb_uri = lookup("MONGODB_URI")
            .filter(|uri| !uri.trim().is_empty())
            .ok_or(ConfigError::Missing("MONGODB_URI"))?;

        let database_name = lookup("MONGODB_DB")
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| database_from_uri(&mongodb_uri));

        let app_name = lookup("MONGODB_APP_NAME")
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());

        Ok(Config {
            mongodb_uri,
            database_name,
            app_name,
        })
    }
}

/// Path segment of a connection string, e.g. `mongodb://host/events?retryWrites=true` -> `events`.
fn database_from_uri(uri: &str) -> String {
    let without_scheme = uri.split_once("://").map_or(uri, |(_, rest)| rest);
    without_scheme
        .split_once('/')
        .map(|(_, path)| path.split('?').next().unwrap_or_default())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_DB_NAME)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_uri_is_fatal() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("MONGODB_URI"));

        let err = Config::from_lookup(lookup_from(&[("MONGODB_URI", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("MONGODB_URI"));
    }

    #[test]
    fn database_name_comes_from_uri_path() {
        let config = Config::from_lookup(lookup_from(&[(
            "MONGODB_URI",
            "mongodb+srv://user:pw@cluster.example.net/devevents?retryWrites=true",
        )]))
        .unwrap();
        assert_eq!(config.database_name, "devevents");
        assert_eq!(config.app_name, "event_booking");
    }

    #[test]
    fn database_name_falls_back_to_default() {
        let config =
            Config::from_lookup(lookup_from(&[("MONGODB_URI", "mongodb://localhost:27017")]))
                .unwrap();
        assert_eq!(config.database_name, DEFAULT_DB_NAME);

        let config =
            Config::from_lookup(lookup_from(&[("MONGODB_URI", "mongodb://localhost:27017/")]))
                .unwrap();
        assert_eq!(config.database_name, DEFAULT_DB_NAME);
    }

    #[test]
    fn blank_optional_settings_use_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://localhost/events"),
            ("MONGODB_DB", " "),
            ("MONGODB_APP_NAME", ""),
        ]))
        .unwrap();
        assert_eq!(config.database_name, "events");
        assert_eq!(config.app_name, DEFAULT_APP_NAME);
    }

    #[test]
    fn explicit_database_overrides_uri() {
        let config = Config::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://localhost/ignored"),
            ("MONGODB_DB", "bookings"),
            ("MONGODB_APP_NAME", "seed"),
        ]))
        .unwrap();
        assert_eq!(config.database_name, "bookings");
        assert_eq!(config.app_name, "seed");
    }
}
