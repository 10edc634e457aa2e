use crate::{ConfigError, Connection, Driver, Result};
use std::env;

/// Variable holding the driver name, e.g. `sqlite`.
pub const DRIVER_VAR: &str = "DATABASE";
/// Variable holding the connection string.
pub const URL_VAR: &str = "DBCONNSTRING";

/// Connection settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub driver: String,
    pub url: String,
}

impl Config {
    /// Loads `.env` when present, then reads `DATABASE` and `DBCONNSTRING`.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Ok(Self::from_lookup(|name| env::var(name).ok())?)
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> std::result::Result<Self, ConfigError> {
        let read = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        Ok(Self {
            driver: read(DRIVER_VAR)?.trim().to_lowercase(),
            url: read(URL_VAR)?,
        })
    }

    /// Connection string with the driver scheme, `data.db` becomes `sqlite://data.db`.
    pub fn connection_url(&self) -> String {
        if self.url.contains("://") {
            self.url.clone()
        } else {
            format!("{}://{}", self.driver, self.url)
        }
    }

    /// Opens a connection of the driver `D`, which must be the one configured.
    pub async fn connect<D: Driver>(&self) -> Result<D::Connection> {
        if self.driver != D::NAME {
            let error = ConfigError::DriverMismatch {
                configured: self.driver.clone(),
                requested: D::NAME,
            };
            log::error!("{}", error);
            return Err(error.into());
        }
        D::Connection::connect(&self.connection_url()).await
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use crate::ConfigError;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn complete() {
        let config =
            Config::from_lookup(lookup(&[("DATABASE", "SQLite"), ("DBCONNSTRING", "data.db")]))
                .unwrap();
        assert_eq!(config.driver, "sqlite");
        assert_eq!(config.connection_url(), "sqlite://data.db");

        let config = Config::from_lookup(lookup(&[
            ("DATABASE", "sqlite"),
            ("DBCONNSTRING", "sqlite://:memory:"),
        ]))
        .unwrap();
        assert_eq!(config.connection_url(), "sqlite://:memory:");
    }

    #[test]
    fn missing() {
        assert_eq!(
            Config::from_lookup(lookup(&[("DBCONNSTRING", "data.db")])),
            Err(ConfigError::Missing("DATABASE"))
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("DATABASE", "sqlite"), ("DBCONNSTRING", " ")])),
            Err(ConfigError::Missing("DBCONNSTRING"))
        );
    }
}
