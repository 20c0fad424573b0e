//! Process configuration, fixed at startup.
//!
//! All values are read once from the environment; there is no hot reload.
//! Site-tunable knobs only; fixed device behavior lives in
//! [`crate::constants`].

use crate::{
    Result,
    constants::{
        DEFAULT_CARD_READ_TIMEOUT_MS, DEFAULT_LISTEN_ADDR, DEFAULT_MOTOR_DRIVE_MS,
        DEFAULT_REQUEST_TIMEOUT_MS,
    },
    error::Error,
    types::DeviceMode,
};
use std::net::SocketAddr;
use std::time::Duration;

/// Environment variable naming the directory base URL (required).
pub const ENV_DIRECTORY_URL: &str = "DOORKEEP_DIRECTORY_URL";
/// Environment variable for the device mode (required: `reader` | `enroller`).
pub const ENV_DEVICE_MODE: &str = "DOORKEEP_DEVICE_MODE";
/// Environment variable for the directory request timeout in milliseconds.
pub const ENV_REQUEST_TIMEOUT_MS: &str = "DOORKEEP_REQUEST_TIMEOUT_MS";
/// Environment variable for the card-read timeout in milliseconds.
pub const ENV_CARD_READ_TIMEOUT_MS: &str = "DOORKEEP_CARD_READ_TIMEOUT_MS";
/// Environment variable for the motor drive duration in milliseconds.
pub const ENV_MOTOR_DURATION_MS: &str = "DOORKEEP_MOTOR_DURATION_MS";
/// Environment variable for the HTTP listen address.
pub const ENV_LISTEN_ADDR: &str = "DOORKEEP_LISTEN_ADDR";

/// Process-wide configuration for one access-control endpoint.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote directory (e.g. `http://directory.local:8000`).
    pub directory_url: String,

    /// Timeout for one outbound directory request.
    pub request_timeout: Duration,

    /// Budget for one card-read attempt in reader mode.
    pub card_read_timeout: Duration,

    /// Forward (and base backward) motor drive time.
    pub motor_duration: Duration,

    /// Process role selected at startup.
    pub device_mode: DeviceMode,

    /// Bind address for the inbound HTTP surface.
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Load configuration from `DOORKEEP_*` environment variables.
    ///
    /// # Errors
    /// Returns `Error::MissingConfig` if a required key is absent and
    /// `Error::Config` if a value does not parse.
    pub fn from_env() -> Result<Self> {
        let directory_url = require(ENV_DIRECTORY_URL)?;
        let device_mode: DeviceMode = require(ENV_DEVICE_MODE)?.parse()?;

        let request_timeout = millis(ENV_REQUEST_TIMEOUT_MS, DEFAULT_REQUEST_TIMEOUT_MS)?;
        let card_read_timeout = millis(ENV_CARD_READ_TIMEOUT_MS, DEFAULT_CARD_READ_TIMEOUT_MS)?;
        let motor_duration = millis(ENV_MOTOR_DURATION_MS, DEFAULT_MOTOR_DRIVE_MS)?;

        let listen_addr = std::env::var(ENV_LISTEN_ADDR)
            .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .map_err(|e| Error::Config(format!("invalid {ENV_LISTEN_ADDR}: {e}")))?;

        Ok(Config {
            directory_url: directory_url.trim_end_matches('/').to_string(),
            request_timeout,
            card_read_timeout,
            motor_duration,
            device_mode,
            listen_addr,
        })
    }
}

fn require(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| Error::MissingConfig(key.to_string()))
}

fn millis(key: &str, default: u64) -> Result<Duration> {
    match std::env::var(key) {
        Ok(raw) => {
            let ms: u64 = raw
                .parse()
                .map_err(|_| Error::Config(format!("invalid {key}: '{raw}' is not a number")))?;
            Ok(Duration::from_millis(ms))
        }
        Err(_) => Ok(Duration::from_millis(default)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var access in tests is process-global; keep every case in one test
    // to avoid interleaving with parallel test threads.
    #[test]
    fn test_from_env() {
        // Missing required keys
        unsafe {
            std::env::remove_var(ENV_DIRECTORY_URL);
            std::env::remove_var(ENV_DEVICE_MODE);
        }
        assert!(matches!(
            Config::from_env(),
            Err(Error::MissingConfig(_))
        ));

        // Minimal valid environment picks up defaults
        unsafe {
            std::env::set_var(ENV_DIRECTORY_URL, "http://directory.local:8000/");
            std::env::set_var(ENV_DEVICE_MODE, "reader");
            std::env::remove_var(ENV_REQUEST_TIMEOUT_MS);
            std::env::remove_var(ENV_CARD_READ_TIMEOUT_MS);
            std::env::remove_var(ENV_MOTOR_DURATION_MS);
            std::env::remove_var(ENV_LISTEN_ADDR);
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.directory_url, "http://directory.local:8000");
        assert_eq!(config.device_mode, DeviceMode::Reader);
        assert_eq!(config.request_timeout, Duration::from_millis(5000));
        assert_eq!(config.card_read_timeout, Duration::from_millis(1000));
        assert_eq!(config.motor_duration, Duration::from_millis(1000));
        assert_eq!(config.listen_addr.port(), 5000);

        // Overrides
        unsafe {
            std::env::set_var(ENV_DEVICE_MODE, "enroller");
            std::env::set_var(ENV_MOTOR_DURATION_MS, "250");
            std::env::set_var(ENV_LISTEN_ADDR, "127.0.0.1:9000");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.device_mode, DeviceMode::Enroller);
        assert_eq!(config.motor_duration, Duration::from_millis(250));
        assert_eq!(config.listen_addr.port(), 9000);

        // Invalid number
        unsafe {
            std::env::set_var(ENV_MOTOR_DURATION_MS, "fast");
        }
        assert!(matches!(Config::from_env(), Err(Error::Config(_))));
        unsafe {
            std::env::remove_var(ENV_MOTOR_DURATION_MS);
        }
    }
}
