// Service configuration - Layered files plus SPARKLINE__ environment overrides
use crate::application::metrics_source::QPS_METRICS;
use crate::domain::sparkline::{Color, SparklineConfig};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

const ENV_PREFIX: &str = "SPARKLINE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("sparkline dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },
    #[error("sparkline needs at least one metric")]
    NoMetrics,
    #[error("invalid listen address {0}")]
    InvalidListenAddr(String),
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub source: SourceSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub listen_addr: String,
    pub refresh_interval_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8090".to_string(),
            refresh_interval_secs: 10,
        }
    }
}

impl ServerSettings {
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_addr
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddr(self.listen_addr.clone()))
    }

    pub fn refresh_interval(&self) -> Result<Duration, ConfigError> {
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::ZeroDuration("refresh_interval_secs"));
        }
        Ok(Duration::from_secs(self.refresh_interval_secs))
    }
}

/// Where the external time-series provider lives and what window to ask for.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SourceSettings {
    pub host: String,
    pub window_secs: u64,
    pub sample_secs: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            host: "http://localhost:8080".to_string(),
            window_secs: 600,
            sample_secs: 10,
        }
    }
}

impl SourceSettings {
    pub fn window(&self) -> Result<Duration, ConfigError> {
        if self.window_secs == 0 {
            return Err(ConfigError::ZeroDuration("window_secs"));
        }
        Ok(Duration::from_secs(self.window_secs))
    }

    pub fn sample_period(&self) -> Result<Duration, ConfigError> {
        if self.sample_secs == 0 {
            return Err(ConfigError::ZeroDuration("sample_secs"));
        }
        Ok(Duration::from_secs(self.sample_secs))
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SparklineSettings {
    pub width: f64,
    pub height: f64,
    pub background_color: Color,
    pub line_color: Color,
    pub metrics: Vec<String>,
}

impl Default for SparklineSettings {
    fn default() -> Self {
        let defaults = SparklineConfig::default();
        Self {
            width: defaults.width,
            height: defaults.height,
            background_color: defaults.background_color,
            line_color: defaults.line_color,
            metrics: QPS_METRICS.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl SparklineSettings {
    pub fn to_config(&self) -> Result<SparklineConfig, ConfigError> {
        // `!(x > 0.0)` also rejects NaN.
        if !(self.width > 0.0) || !(self.height > 0.0) {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.metrics.is_empty() {
            return Err(ConfigError::NoMetrics);
        }

        Ok(SparklineConfig::new(
            self.width,
            self.height,
            self.background_color,
            self.line_color,
        ))
    }
}

fn builder(file: &str) -> config::ConfigBuilder<config::builder::DefaultState> {
    config::Config::builder()
        .add_source(config::File::with_name(file).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
}

pub fn load_service_config() -> Result<ServiceConfig, ConfigError> {
    let settings = builder("config/server").build()?;
    Ok(settings.try_deserialize()?)
}

pub fn load_sparkline_settings() -> Result<SparklineSettings, ConfigError> {
    let settings = builder("config/sparkline").build()?;
    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_defaults() {
        let config: ServiceConfig = toml::from_str("").unwrap();

        assert_eq!(config.server.listen_addr().unwrap().port(), 8090);
        assert_eq!(config.server.refresh_interval().unwrap(), Duration::from_secs(10));
        assert_eq!(config.source.host, "http://localhost:8080");
        assert_eq!(config.source.window().unwrap(), Duration::from_secs(600));
    }

    #[test]
    fn test_service_overrides() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [server]
            listen_addr = "127.0.0.1:9000"

            [source]
            host = "http://crdb:8080"
            sample_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.server.listen_addr().unwrap().port(), 9000);
        assert_eq!(config.server.refresh_interval_secs, 10);
        assert_eq!(config.source.host, "http://crdb:8080");
        assert_eq!(config.source.sample_period().unwrap(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_server_settings() {
        let settings = ServerSettings {
            listen_addr: "nowhere".to_string(),
            refresh_interval_secs: 0,
        };
        assert!(matches!(
            settings.listen_addr(),
            Err(ConfigError::InvalidListenAddr(_))
        ));
        assert!(matches!(
            settings.refresh_interval(),
            Err(ConfigError::ZeroDuration("refresh_interval_secs"))
        ));
    }

    #[test]
    fn test_sparkline_defaults() {
        let settings: SparklineSettings = toml::from_str("").unwrap();
        assert_eq!(settings.to_config().unwrap(), SparklineConfig::default());
        assert_eq!(settings.metrics.len(), 4);
    }

    #[test]
    fn test_sparkline_from_config_source() {
        let settings: SparklineSettings = config::Config::builder()
            .add_source(config::File::from_str(
                r##"
                width = 120.0
                height = 24.0
                line_color = "#ff0000"
                metrics = ["cr.node.sql.select.count"]
                "##,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        let config = settings.to_config().unwrap();
        assert_eq!(config.width, 120.0);
        assert_eq!(config.line_color, Color::rgb(0xFF, 0, 0));
        assert_eq!(config.background_color, SparklineConfig::default().background_color);
    }

    #[test]
    fn test_sparkline_rejects_bad_values() {
        let bad_color: Result<SparklineSettings, _> = toml::from_str(r#"line_color = "blue""#);
        assert!(bad_color.is_err());

        let settings = SparklineSettings {
            width: 0.0,
            ..SparklineSettings::default()
        };
        assert!(matches!(
            settings.to_config(),
            Err(ConfigError::InvalidDimensions { .. })
        ));

        let settings = SparklineSettings {
            metrics: vec![],
            ..SparklineSettings::default()
        };
        assert!(matches!(settings.to_config(), Err(ConfigError::NoMetrics)));
    }
}
