//! Configuration management with TOML, environment variables, and CLI overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the API server binds to
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Port the API server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Amazon request timeout in seconds
    #[serde(default = "default_amazon_timeout_secs")]
    pub amazon_timeout_secs: u64,

    /// Myntra request timeout in seconds
    #[serde(default = "default_myntra_timeout_secs")]
    pub myntra_timeout_secs: u64,

    /// How long to wait for the Flipkart login popup
    #[serde(default = "default_popup_wait_secs")]
    pub popup_wait_secs: u64,

    /// How long to wait for Flipkart listings to render
    #[serde(default = "default_listing_wait_secs")]
    pub listing_wait_secs: u64,

    /// Chrome/Chromium binary; auto-detected when unset
    #[serde(default)]
    pub chrome_executable: Option<PathBuf>,

    /// Directory for raw pages captured on failures; disabled when unset
    #[serde(default)]
    pub debug_dir: Option<PathBuf>,

    /// Output format for the search command
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_amazon_timeout_secs() -> u64 {
    15
}

fn default_myntra_timeout_secs() -> u64 {
    10
}

fn default_popup_wait_secs() -> u64 {
    5
}

fn default_listing_wait_secs() -> u64 {
    15
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            proxy: None,
            amazon_timeout_secs: default_amazon_timeout_secs(),
            myntra_timeout_secs: default_myntra_timeout_secs(),
            popup_wait_secs: default_popup_wait_secs(),
            listing_wait_secs: default_listing_wait_secs(),
            chrome_executable: None,
            debug_dir: None,
            format: OutputFormat::Table,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("shop-scraper").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(bind) = std::env::var("SHOP_SCRAPER_BIND") {
            self.bind = bind;
        }

        if let Ok(port) = std::env::var("SHOP_SCRAPER_PORT") {
            if let Ok(p) = port.parse() {
                self.port = p;
            }
        }

        if let Ok(proxy) = std::env::var("SHOP_SCRAPER_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(dir) = std::env::var("SHOP_SCRAPER_DEBUG_DIR") {
            self.debug_dir = Some(PathBuf::from(dir));
        }

        self
    }

    /// `bind:port` for the API listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    pub fn amazon_timeout(&self) -> Duration {
        Duration::from_secs(self.amazon_timeout_secs)
    }

    pub fn myntra_timeout(&self) -> Duration {
        Duration::from_secs(self.myntra_timeout_secs)
    }

    pub fn popup_wait(&self) -> Duration {
        Duration::from_secs(self.popup_wait_secs)
    }

    pub fn listing_wait(&self) -> Duration {
        Duration::from_secs(self.listing_wait_secs)
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bind, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.amazon_timeout(), Duration::from_secs(15));
        assert_eq!(config.myntra_timeout(), Duration::from_secs(10));
        assert_eq!(config.popup_wait(), Duration::from_secs(5));
        assert_eq!(config.listing_wait(), Duration::from_secs(15));
        assert_eq!(config.format, OutputFormat::Table);
        assert!(config.proxy.is_none());
        assert!(config.chrome_executable.is_none());
        assert!(config.debug_dir.is_none());
    }

    #[test]
    fn test_listen_addr() {
        let mut config = Config::new();
        assert_eq!(config.listen_addr(), "0.0.0.0:5000");

        config.bind = "127.0.0.1".to_string();
        config.port = 8080;
        assert_eq!(config.listen_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);

        let err = "markdown".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("Unknown format"));
        assert!(err.contains("table, json, csv"));
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            port = 8080
            amazon_timeout_secs = 30
            format = "csv"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.amazon_timeout_secs, 30);
        assert_eq!(config.format, OutputFormat::Csv);
        // Unset fields keep their defaults
        assert_eq!(config.bind, "0.0.0.0");
        assert_eq!(config.myntra_timeout_secs, 10);
    }

    #[test]
    fn test_config_from_toml_all_fields() {
        let toml = r#"
            bind = "127.0.0.1"
            port = 9000
            proxy = "socks5://localhost:1080"
            amazon_timeout_secs = 20
            myntra_timeout_secs = 12
            popup_wait_secs = 3
            listing_wait_secs = 25
            chrome_executable = "/usr/bin/chromium"
            debug_dir = "/tmp/shop-debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.bind, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.proxy, Some("socks5://localhost:1080".to_string()));
        assert_eq!(config.amazon_timeout_secs, 20);
        assert_eq!(config.myntra_timeout_secs, 12);
        assert_eq!(config.popup_wait_secs, 3);
        assert_eq!(config.listing_wait_secs, 25);
        assert_eq!(config.chrome_executable, Some(PathBuf::from("/usr/bin/chromium")));
        assert_eq!(config.debug_dir, Some(PathBuf::from("/tmp/shop-debug")));
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            port = 5050
            popup_wait_secs = 1
            "#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.port, 5050);
        assert_eq!(config.popup_wait_secs, 1);
    }

    #[test]
    fn test_config_from_file_not_found() {
        let err = Config::from_file("/nonexistent/path/config.toml").unwrap_err().to_string();
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_config_from_file_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml {{{{").unwrap();

        let err = Config::from_file(file.path()).unwrap_err().to_string();
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_load_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"bind = "10.0.0.5""#).unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.bind, "10.0.0.5");
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_config_with_env() {
        let vars = ["SHOP_SCRAPER_BIND", "SHOP_SCRAPER_PORT", "SHOP_SCRAPER_PROXY", "SHOP_SCRAPER_DEBUG_DIR"];
        let originals: Vec<_> = vars.iter().map(|v| std::env::var(v).ok()).collect();

        std::env::set_var("SHOP_SCRAPER_BIND", "127.0.0.1");
        std::env::set_var("SHOP_SCRAPER_PORT", "not_a_port");
        std::env::set_var("SHOP_SCRAPER_PROXY", "http://proxy:8080");
        std::env::set_var("SHOP_SCRAPER_DEBUG_DIR", "/tmp/pages");

        let config = Config::new().with_env();
        assert_eq!(config.bind, "127.0.0.1");
        // Invalid values are ignored, keeping defaults
        assert_eq!(config.port, 5000);
        assert_eq!(config.proxy, Some("http://proxy:8080".to_string()));
        assert_eq!(config.debug_dir, Some(PathBuf::from("/tmp/pages")));

        std::env::set_var("SHOP_SCRAPER_PORT", "7000");
        assert_eq!(Config::new().with_env().port, 7000);

        // Restore original env vars
        for (var, original) in vars.iter().zip(originals) {
            match original {
                Some(v) => std::env::set_var(var, v),
                None => std::env::remove_var(var),
            }
        }
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            proxy: Some("socks5://localhost:1080".to_string()),
            debug_dir: Some(PathBuf::from("debug")),
            format: OutputFormat::Json,
            ..Config::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.proxy, config.proxy);
        assert_eq!(parsed.debug_dir, config.debug_dir);
        assert_eq!(parsed.format, config.format);
        assert_eq!(parsed.port, config.port);
    }
}
