use dotenv::dotenv;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} has invalid value {value:?}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings read from the environment (and `.env` if present)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub request_timeout: Duration,
    pub concurrency_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        Ok(Self {
            data_dir: PathBuf::from(
                env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            ),
            host: parse_var("HOST", IpAddr::from([0, 0, 0, 0]))?,
            port: parse_var("PORT", 5000)?,
            request_timeout: Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECS", 10)?),
            concurrency_limit: parse_var("CONCURRENCY_LIMIT", 64)?,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// Parse an optional environment variable, falling back to `default` when unset
fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => parse_value(name, &value),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        let port: u16 = parse_value("PORT", "8080").unwrap();
        assert_eq!(port, 8080);

        let host: IpAddr = parse_value("HOST", " 127.0.0.1 ").unwrap();
        assert_eq!(host, IpAddr::from([127, 0, 0, 1]));
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        let result: Result<u16, _> = parse_value("PORT", "eighty");
        match result {
            Err(ConfigError::InvalidValue { name, value, .. }) => {
                assert_eq!(name, "PORT");
                assert_eq!(value, "eighty");
            }
            Ok(_) => panic!("expected an error"),
        }

        let result: Result<u16, _> = parse_value("PORT", "70000");
        assert!(result.is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            data_dir: PathBuf::from("./data"),
            host: IpAddr::from([0, 0, 0, 0]),
            port: 5000,
            request_timeout: Duration::from_secs(10),
            concurrency_limit: 64,
        };
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:5000");
    }
}
