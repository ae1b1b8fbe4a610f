//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Environment variable holding the listen address.
pub const ADDR_VAR: &str = "WASTE_SERVER_ADDR";

/// Environment variable holding the snapshot directory.
pub const DATA_DIR_VAR: &str = "WASTE_SERVER_DATA_DIR";

/// Errors reading the server configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServerConfigError {
    #[error("{var} is not a valid socket address: '{value}'")]
    InvalidAddr { var: &'static str, value: String },
}

/// Runtime settings of the server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub addr: SocketAddr,

    /// Directory holding the CSV snapshot imported at startup.
    pub data_dir: PathBuf,
}

impl ServerConfig {
    pub fn new(addr: SocketAddr, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            addr,
            data_dir: data_dir.into(),
        }
    }

    /// Read the configuration from the process environment.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ServerConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through `lookup`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ServerConfigError> {
        let mut config = Self::default();
        if let Some(value) = lookup(ADDR_VAR) {
            let addr = value
                .trim()
                .parse()
                .map_err(|_| ServerConfigError::InvalidAddr {
                    var: ADDR_VAR,
                    value: value.clone(),
                })?;
            config = config.with_addr(addr);
        }
        if let Some(dir) = lookup(DATA_DIR_VAR).filter(|d| !d.trim().is_empty()) {
            config = config.with_data_dir(dir);
        }
        Ok(config)
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_dir: PathBuf::from("data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn reads_variables() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ADDR_VAR, "0.0.0.0:8080"),
            (DATA_DIR_VAR, "/srv/waste"),
        ]))
        .unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.data_dir, PathBuf::from("/srv/waste"));
    }

    #[test]
    fn invalid_address() {
        let err = ServerConfig::from_lookup(lookup(&[(ADDR_VAR, "localhost")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "WASTE_SERVER_ADDR is not a valid socket address: 'localhost'"
        );
    }

    #[test]
    fn builder_overrides() {
        let addr: SocketAddr = "[::1]:9000".parse().unwrap();
        let config = ServerConfig::default()
            .with_addr(addr)
            .with_data_dir("snapshots");
        assert_eq!(config, ServerConfig::new(addr, "snapshots"));
    }
}
