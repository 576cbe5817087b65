//! Configuration loading. TOML file with environment variable overrides.
//!
//! Looks for `openmote.toml` in the working directory. Every field has a
//! default, so the file is optional. Environment variables take precedence
//! over file values.

use serde::Deserialize;

use openmote_adapter_coap::CoapConfig;
use openmote_domain::endpoint::DEFAULT_PORT;
use openmote_domain::led::Led;

/// Address of the mote the demo was written against.
pub const DEFAULT_ADDRESS: &str = "fd00::212:4b00:430:53c0";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which device to talk to.
    pub device: DeviceConfig,
    /// CoAP transport settings.
    pub coap: CoapConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// What the demo does.
    pub demo: DemoConfig,
}

/// Device locator.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// IP address literal of the mote.
    pub address: String,
    /// UDP port of its CoAP server.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// LEDs to toggle, in order.
    pub leds: Vec<Led>,
}

impl Config {
    /// Load configuration from `openmote.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("openmote.toml")?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Apply overrides looked up through `var` (the process environment in
    /// [`load`](Self::load)).
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(val) = var("OPENMOTE_ADDRESS") {
            self.device.address = val;
        }
        if let Some(val) = var("OPENMOTE_PORT") {
            self.device.port = val.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("OPENMOTE_PORT {val:?} is not a port number"))
            })?;
        }
        if let Some(val) = var("OPENMOTE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.device.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.coap.request_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "request_timeout_ms must be non-zero".to_string(),
            ));
        }
        if self.coap.ping_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "ping_timeout_ms must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "openmote_demo=info,openmote=info".to_string(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            leds: Led::ALL.to_vec(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use openmote_app::ports::ObserveErrorPolicy;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.device.address, "fd00::212:4b00:430:53c0");
        assert_eq!(config.device.port, 5683);
        assert_eq!(config.coap.request_timeout_ms, 5_000);
        assert_eq!(config.demo.leds, vec![Led::Red, Led::Green, Led::Blue]);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.device.port, 5683);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [device]
            address = '::1'
            port = 5684

            [coap]
            request_timeout_ms = 1000
            ping_timeout_ms = 500
            observe_errors = 'ignore'

            [logging]
            filter = 'debug'

            [demo]
            leds = ['blue']
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.device.address, "::1");
        assert_eq!(config.device.port, 5684);
        assert_eq!(config.coap.request_timeout_ms, 1000);
        assert_eq!(config.coap.ping_timeout_ms, 500);
        assert_eq!(config.coap.observe_errors, ObserveErrorPolicy::Ignore);
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.demo.leds, vec![Led::Blue]);
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [device]
            address = '10.0.0.7'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.device.address, "10.0.0.7");
        assert_eq!(config.device.port, 5683);
        assert_eq!(config.coap.ping_timeout_ms, 2_000);
        assert_eq!(config.demo.leds.len(), 3);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.device.port, 5683);
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn should_apply_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                ("OPENMOTE_ADDRESS", "::1"),
                ("OPENMOTE_PORT", "15683"),
                ("OPENMOTE_LOG", "debug"),
            ]))
            .unwrap();
        assert_eq!(config.device.address, "::1");
        assert_eq!(config.device.port, 15683);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn should_prefer_rust_log_over_openmote_log() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[("OPENMOTE_LOG", "debug"), ("RUST_LOG", "trace")]))
            .unwrap();
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_reject_unparsable_port_override() {
        let mut config = Config::default();
        let result = config.apply_overrides(env(&[("OPENMOTE_PORT", "coap")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
        assert_eq!(config.device.port, 5683);
    }

    #[test]
    fn should_keep_file_values_without_overrides() {
        let mut config = Config::default();
        config.apply_overrides(env(&[])).unwrap();
        assert_eq!(config.device.address, DEFAULT_ADDRESS);
        assert_eq!(config.device.port, 5683);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.device.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_timeouts() {
        let mut config = Config::default();
        config.coap.request_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.coap.ping_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_reject_unknown_led_colour() {
        let result: Result<Config, _> = toml::from_str("[demo]\nleds = ['purple']");
        assert!(result.is_err());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
