use std::{env::var, fs, net::SocketAddr, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "campus.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid bind address {0:?}")]
    Bind(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind: String,
    pub tls: Option<TlsConfig>,
    /// Where the session mirror is kept. In memory when unset.
    pub storage_path: Option<PathBuf>,
    pub login_delay_ms: u64,
    pub submit_delay_ms: u64,
    pub save_delay_ms: u64,
    pub session_hours: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:9090".into(),
            tls: None,
            storage_path: None,
            login_delay_ms: 1000,
            submit_delay_ms: 1500,
            save_delay_ms: 1000,
            session_hours: 1,
        }
    }
}

impl Config {
    /// Loads `CAMPUS_CONFIG` (or `campus.toml`), falling back to defaults when the file is absent.
    /// `CAMPUS_BIND` overrides the bind address.
    pub fn load() -> Result<Self, ConfigError> {
        let path = var("CAMPUS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            Self::from_toml(&contents).map_err(|source| ConfigError::Parse { path, source })?
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Self::default()
        };

        if let Ok(bind) = var("CAMPUS_BIND") {
            config.bind = bind;
        }

        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|_| ConfigError::Bind(self.bind.clone()))
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn save_delay(&self) -> Duration {
        Duration::from_millis(self.save_delay_ms)
    }

    pub fn session_ttl(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::hours(self.session_hours)
    }

    /// Same settings with every simulated delay removed
    #[cfg(test)]
    pub fn instant() -> Self {
        Self {
            login_delay_ms: 0,
            submit_delay_ms: 0,
            save_delay_ms: 0,
            ..Self::default()
        }
    }
}
