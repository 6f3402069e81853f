use std::{net::SocketAddr, path::Path};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::registry::{DEFAULT_REGISTRY_ADDR, DEFAULT_SERVICE_NAME};

/// Settings shared by the server and the client binaries.
///
/// Sources, later ones winning: built-in defaults, `hotel.toml` (or the file
/// given explicitly), `HOTEL__*` environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct HotelConfig {
    pub service: Service,
    pub registry: Registry,
    pub logger: Logger,
}

impl HotelConfig {
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name("hotel").required(false),
        };

        Config::builder()
            .set_default("service.listen", "127.0.0.1:0")?
            .set_default("service.name", DEFAULT_SERVICE_NAME)?
            .set_default("registry.address", DEFAULT_REGISTRY_ADDR)?
            .set_default("registry.embedded", true)?
            .set_default("logger.level", "INFO")?
            .add_source(file)
            .add_source(Environment::with_prefix("HOTEL").separator("__"))
            .build()?
            .try_deserialize::<HotelConfig>()
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
    /// Address the booking service listens on.
    pub listen: SocketAddr,
    /// Name the service is bound under in the registry.
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Registry {
    pub address: SocketAddr,
    /// Whether the server starts the registry itself.
    pub embedded: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Logger {
    pub level: Level,
}

#[derive(Clone, Debug, Deserialize)]
pub enum Level {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl From<&Level> for tracing::Level {
    fn from(value: &Level) -> Self {
        match value {
            Level::TRACE => tracing::Level::TRACE,
            Level::DEBUG => tracing::Level::DEBUG,
            Level::INFO => tracing::Level::INFO,
            Level::WARN => tracing::Level::WARN,
            Level::ERROR => tracing::Level::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let config = HotelConfig::load(None).unwrap();

        assert_eq!(config.service.name, "HotelService");
        assert_eq!(
            config.registry.address,
            "127.0.0.1:1099".parse::<SocketAddr>().unwrap()
        );
        assert!(config.registry.embedded);
        assert_eq!(tracing::Level::from(&config.logger.level), tracing::Level::INFO);
    }
}
