use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::domain::RulesetType;
use crate::error::{BuoyError, Result};

const LOCAL_CONFIG: &str = "./buoy.toml";
const USER_CONFIG: &str = ".buoy.toml";

fn default_domain() -> String {
    "knative.dev".to_string()
}

fn default_ruleset() -> String {
    RulesetType::AnyRule.name().to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Settings shared by every buoy command.
///
/// Command line flags take precedence over anything read here.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Module path prefix selecting the dependencies to operate on
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Ruleset used when none is given on the command line
    #[serde(default = "default_ruleset")]
    pub ruleset: String,

    /// Module path to git URL overrides, consulted before go-import discovery
    #[serde(default)]
    pub repos: HashMap<String, String>,

    #[serde(default)]
    pub http: HttpConfig,
}

/// Settings for go-import discovery requests.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            domain: default_domain(),
            ruleset: default_ruleset(),
            repos: HashMap::new(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Parse a configuration document. `source` only labels errors.
    pub fn parse(source: &str, data: &str) -> Result<Self> {
        let config: Config = toml::from_str(data)
            .map_err(|e| BuoyError::config(format!("{}: {}", source, e)))?;
        if config.ruleset.parse::<RulesetType>().is_err() {
            return Err(BuoyError::config(format!(
                "{}: invalid ruleset '{}', expected one of: [{}]",
                source,
                config.ruleset,
                RulesetType::names().join(", ")
            )));
        }
        Ok(config)
    }

    /// The configured ruleset. Validated by [`Config::parse`].
    pub fn ruleset(&self) -> RulesetType {
        RulesetType::parse(&self.ruleset)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `buoy.toml` in current directory
/// 3. `.buoy.toml` in user config directory
/// 4. Default configuration if no file found
///
/// A file that exists but cannot be read or parsed is an error.
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let Some(path) = locate(config_path) else {
        debug!("no configuration file found, using defaults");
        return Ok(Config::default());
    };

    let data = fs::read_to_string(&path).map_err(|e| {
        BuoyError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    debug!(path = %path.display(), "loaded configuration");
    Config::parse(&path.display().to_string(), &data)
}

fn locate(config_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(PathBuf::from(path));
    }
    if Path::new(LOCAL_CONFIG).exists() {
        return Some(PathBuf::from(LOCAL_CONFIG));
    }
    dirs::config_dir()
        .map(|dir| dir.join(USER_CONFIG))
        .filter(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.domain, "knative.dev");
        assert_eq!(config.ruleset(), RulesetType::AnyRule);
        assert!(config.repos.is_empty());
        assert_eq!(config.http.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_parse_partial_fills_defaults() {
        let config = Config::parse("t.toml", "ruleset = \"release\"\n").unwrap();
        assert_eq!(config.domain, "knative.dev");
        assert_eq!(config.ruleset(), RulesetType::ReleaseRule);
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn test_parse_full() {
        let data = r#"
domain = "example.com"
ruleset = "Branch"

[repos]
"example.com/lib" = "https://git.example.com/lib.git"

[http]
timeout_secs = 5
"#;
        let config = Config::parse("t.toml", data).unwrap();
        assert_eq!(config.domain, "example.com");
        assert_eq!(config.ruleset(), RulesetType::ReleaseBranchRule);
        assert_eq!(
            config.repos.get("example.com/lib").map(String::as_str),
            Some("https://git.example.com/lib.git")
        );
        assert_eq!(config.http.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_parse_rejects_invalid_ruleset() {
        let err = Config::parse("t.toml", "ruleset = \"Sometimes\"\n").unwrap_err();
        assert!(matches!(err, BuoyError::Config(_)));
        assert!(err.to_string().contains("Sometimes"));
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        let err = Config::parse("t.toml", "domain = ").unwrap_err();
        assert!(err.to_string().contains("t.toml"));
    }
}
