use anyhow::{anyhow, Result};
use config::Config;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Settings for the upstream topology service.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the topology service
    pub url: String,

    /// Basic-auth user, paired with `password` when no token is set
    pub user: Option<String>,

    /// Basic-auth password
    pub password: Option<String>,

    /// Bearer token, takes precedence over user/password
    pub token: Option<String>,

    /// Skip TLS certificate verification (default: true, the upstream
    /// usually serves a self-signed certificate)
    pub insecure: bool,

    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "https://10.100.200.199".to_string(),
            user: None,
            password: None,
            token: None,
            insecure: true,
            timeout_secs: 30,
        }
    }
}

impl UpstreamConfig {
    /// Get the request timeout as Duration
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}

pub struct PathlensConfig {
    /// Path to the directory to hold pathlens's store files
    pub data_dir: String,

    /// Host the HTTP API binds to (default: 127.0.0.1)
    pub host: String,

    /// Port the HTTP API binds to (default: 8080)
    pub port: u16,

    /// Upstream topology service settings
    pub upstream: UpstreamConfig,
}

const EMPTY_CONFIG: &str = r#"### pathlens configuration file

### directory for data stored by pathlens
# data_dir = "~/.pathlens"

### HTTP API bind address
# host = "127.0.0.1"
# port = 8080

### upstream topology service
# upstream_url = "https://10.100.200.199"
# upstream_user = "api-user"
# upstream_password = "secret"
# upstream_token = ""
# upstream_insecure = true
# upstream_timeout_secs = 30
"#;

impl Default for PathlensConfig {
    fn default() -> Self {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());

        Self {
            data_dir: format!("{}/.pathlens", home_dir),
            host: "127.0.0.1".to_string(),
            port: 8080,
            upstream: UpstreamConfig::default(),
        }
    }
}

impl PathlensConfig {
    /// Function to create and initialize a new configuration
    pub fn new(path: &Option<String>) -> Result<PathlensConfig> {
        // Load a local .env file, if any, before reading the environment
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();

        // By default use $HOME/.pathlens/pathlens.toml as the configuration file path
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow!("Could not find home directory"))?
            .to_str()
            .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?
            .to_owned();

        // Config dir
        let pathlens_dir = format!("{}/.pathlens", home_dir.as_str());

        // Add in toml configuration file
        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                std::fs::create_dir_all(pathlens_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create pathlens directory: {}", e))?;
                let p = format!("{}/pathlens.toml", pathlens_dir.as_str());
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
            }
        }

        // Add in settings from the environment (with a prefix of PATHLENS)
        // E.g., `PATHLENS_UPSTREAM_URL=https://tufin.example pathlens serve` would set the upstream
        builder = builder.add_source(config::Environment::with_prefix("PATHLENS"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        // Parse data directory
        let data_dir = match config.get("data_dir") {
            Some(p) => {
                let path = Path::new(p);
                path.to_str()
                    .ok_or_else(|| anyhow!("Could not convert data_dir path to string"))?
                    .to_string()
            }
            None => {
                let dir = format!("{}/", pathlens_dir.as_str());
                std::fs::create_dir_all(dir.as_str())
                    .map_err(|e| anyhow!("Unable to create data directory: {}", e))?;
                dir
            }
        };

        // Parse bind address
        let host = config
            .get("host")
            .cloned()
            .unwrap_or_else(|| "127.0.0.1".to_string());
        let port = config
            .get("port")
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);

        // Parse upstream settings, empty strings count as unset
        let defaults = UpstreamConfig::default();
        let upstream = UpstreamConfig {
            url: config.get("upstream_url").cloned().unwrap_or(defaults.url),
            user: config
                .get("upstream_user")
                .cloned()
                .filter(|s| !s.is_empty()),
            password: config
                .get("upstream_password")
                .cloned()
                .filter(|s| !s.is_empty()),
            token: config
                .get("upstream_token")
                .cloned()
                .filter(|s| !s.is_empty()),
            insecure: config
                .get("upstream_insecure")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.insecure),
            timeout_secs: config
                .get("upstream_timeout_secs")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        };

        Ok(PathlensConfig {
            data_dir,
            host,
            port,
            upstream,
        })
    }

    /// Get the path to the approved-networks store file
    pub fn network_store_path(&self) -> PathBuf {
        Path::new(self.data_dir.trim_end_matches('/')).join("approved_networks.json")
    }

    /// Get the path to the network-mappings store file
    pub fn mapping_store_path(&self) -> PathBuf {
        Path::new(self.data_dir.trim_end_matches('/')).join("network_mappings.json")
    }

    /// Get the address the HTTP API binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.pathlens/pathlens.toml", home_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PathlensConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.upstream.url, "https://10.100.200.199");
        assert!(config.upstream.insecure);
        assert_eq!(config.upstream.timeout_secs, 30);
        assert!(config.upstream.token.is_none());
    }

    #[test]
    fn test_store_paths() {
        let config = PathlensConfig {
            data_dir: "/test/dir/".to_string(),
            ..PathlensConfig::default()
        };

        assert_eq!(
            config.network_store_path(),
            PathBuf::from("/test/dir/approved_networks.json")
        );
        assert_eq!(
            config.mapping_store_path(),
            PathBuf::from("/test/dir/network_mappings.json")
        );
    }

    #[test]
    fn test_bind_address() {
        let config = PathlensConfig {
            host: "0.0.0.0".to_string(),
            port: 9090,
            ..PathlensConfig::default()
        };
        assert_eq!(config.bind_address(), "0.0.0.0:9090");
    }

    #[test]
    fn test_upstream_timeout() {
        let upstream = UpstreamConfig {
            timeout_secs: 5,
            ..UpstreamConfig::default()
        };
        assert_eq!(upstream.timeout(), std::time::Duration::from_secs(5));
    }
}
