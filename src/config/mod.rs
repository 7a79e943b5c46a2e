use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::output::{Theme, View};

pub const API_KEY_ENV: &str = "API_KEY";
pub const MIN_TIMEOUT_SECONDS: u64 = 5;
pub const MAX_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not set; export it or run with --mock")]
    MissingCredential { var: &'static str },

    #[error("config file not found '{path}'")]
    NotFound { path: String },

    #[error("failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to write config file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not determine a home directory for the default config path")]
    NoHomeDir,

    #[error("invalid timeout {value}, expected 5-30 seconds")]
    InvalidTimeout { value: u64 },

    #[error("invalid view '{value}', expected results, json or all")]
    InvalidView { value: String },

    #[error("invalid api url '{url}': {message}")]
    InvalidApiUrl { url: String, message: String },
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    pub api_url: Option<String>,
    pub timeout: Option<u64>,
    pub mock: Option<bool>,
    pub auto_map: Option<bool>,
    #[serde(alias = "dark")]
    pub dark_mode: Option<bool>,
    pub view: Option<String>,
    pub export: Option<bool>,
    pub output_dir: Option<String>,
    pub no_color: Option<bool>,
}

/// API credential; `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Session configuration, resolved once at startup and never mutated.
#[derive(Clone, Debug)]
pub struct Settings {
    pub api_url: reqwest::Url,
    pub credential: Option<Credential>,
    pub mock: bool,
    pub timeout: Duration,
    pub auto_map: bool,
    pub theme: Theme,
    pub view: View,
    pub export: bool,
    pub output_dir: PathBuf,
    pub no_color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            credential: None,
            mock: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            auto_map: true,
            theme: Theme::Light,
            view: View::All,
            export: false,
            output_dir: PathBuf::from("."),
            no_color: false,
        }
    }
}

impl Settings {
    /// Fails when no credential is available and mock mode is off.
    pub fn ensure_credential(&self) -> Result<(), ConfigError> {
        if self.mock || self.credential.is_some() {
            Ok(())
        } else {
            Err(ConfigError::MissingCredential { var: API_KEY_ENV })
        }
    }
}

fn default_api_url() -> reqwest::Url {
    reqwest::Url::parse(crate::client::DEFAULT_API_URL).expect("default api url is valid")
}

/// Reads the credential from the environment; an empty value counts as unset.
pub fn read_credential() -> Option<Credential> {
    credential_from(env::var(API_KEY_ENV).ok())
}

pub fn credential_from(raw: Option<String>) -> Option<Credential> {
    raw.filter(|v| !v.is_empty()).map(Credential)
}

pub fn check_timeout(value: u64) -> Result<Duration, ConfigError> {
    if (MIN_TIMEOUT_SECONDS..=MAX_TIMEOUT_SECONDS).contains(&value) {
        Ok(Duration::from_secs(value))
    } else {
        Err(ConfigError::InvalidTimeout { value })
    }
}

pub fn parse_api_url(raw: &str) -> Result<reqwest::Url, ConfigError> {
    let url = reqwest::Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidApiUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidApiUrl {
            url: raw.to_string(),
            message: format!("unsupported scheme '{other}'"),
        }),
    }
}

pub fn parse_view(raw: &str) -> Result<View, ConfigError> {
    View::parse(raw).ok_or_else(|| ConfigError::InvalidView {
        value: raw.to_string(),
    })
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".numinfo").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn parse_config(contents: &str, path: &Path) -> Result<ConfigFile, ConfigError> {
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str::<ConfigFile>(contents).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents, path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound {
            path: path.display().to_string(),
        }),
        Err(e) => Err(ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

fn default_config_yaml() -> String {
    format!(
        r#"# numinfo config
#
# Location (default):
#   ~/.numinfo/config.yml
#
# The API credential is never read from this file; export {API_KEY_ENV} instead.

# Lookup endpoint
# api_url: {api_url}

# Request timeout in seconds ({MIN_TIMEOUT_SECONDS}-{MAX_TIMEOUT_SECONDS})
timeout: {DEFAULT_TIMEOUT_SECONDS}

# Serve canned records instead of calling the API
mock: false

# Map name/mobile/email/address aliases onto the display schema
auto_map: true

# Output
dark_mode: false
view: all
no_color: false

# CSV export (one numinfo_<term>.csv per lookup)
export: false
output_dir: .
"#,
        api_url = crate::client::DEFAULT_API_URL,
    )
}

pub fn ensure_default_config_file(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    let write_err = |e: std::io::Error| ConfigError::Write {
        path: path.display().to_string(),
        source: e,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, default_config_yaml()).map_err(write_err)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_yaml_parses_to_defaults() {
        let cfg = parse_config(&default_config_yaml(), Path::new("default.yml")).unwrap();
        assert_eq!(cfg.timeout, Some(DEFAULT_TIMEOUT_SECONDS));
        assert_eq!(cfg.mock, Some(false));
        assert_eq!(cfg.auto_map, Some(true));
        assert_eq!(cfg.view.as_deref(), Some("all"));
        assert!(cfg.api_url.is_none());
    }

    #[test]
    fn dark_alias_is_accepted() {
        let cfg = parse_config("dark: true\n", Path::new("c.yml")).unwrap();
        assert_eq!(cfg.dark_mode, Some(true));
    }

    #[test]
    fn unknown_shape_is_a_parse_error() {
        let err = parse_config("timeout: [1, 2]\n", Path::new("c.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_respects_allow_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yml");
        assert!(load_config(&path, true).is_ok());
        assert!(matches!(
            load_config(&path, false),
            Err(ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn ensure_default_config_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        assert!(ensure_default_config_file(&path).unwrap());
        assert!(!ensure_default_config_file(&path).unwrap());
        let cfg = load_config(&path, false).unwrap();
        assert_eq!(cfg.export, Some(false));
    }

    #[test]
    fn timeout_bounds_are_inclusive() {
        assert!(check_timeout(5).is_ok());
        assert!(check_timeout(30).is_ok());
        assert!(matches!(
            check_timeout(4),
            Err(ConfigError::InvalidTimeout { value: 4 })
        ));
        assert!(check_timeout(31).is_err());
    }

    #[test]
    fn api_url_must_be_http() {
        assert!(parse_api_url("https://example.com/lookup").is_ok());
        assert!(parse_api_url("ftp://example.com/").is_err());
        assert!(parse_api_url("not a url").is_err());
    }

    #[test]
    fn empty_credential_is_unset() {
        assert_eq!(credential_from(Some(String::new())), None);
        assert_eq!(credential_from(None), None);
        let credential = credential_from(Some(" k ".to_string())).unwrap();
        assert_eq!(credential.expose(), " k ");
        let blank = credential_from(Some("  ".to_string())).unwrap();
        assert_eq!(blank.expose(), "  ");
        assert_eq!(format!("{credential:?}"), "Credential(***)");
    }

    #[test]
    fn credential_is_required_outside_mock_mode() {
        let settings = Settings::default();
        assert!(matches!(
            settings.ensure_credential(),
            Err(ConfigError::MissingCredential { var: API_KEY_ENV })
        ));
        let mock = Settings {
            mock: true,
            ..Settings::default()
        };
        assert!(mock.ensure_credential().is_ok());
    }
}
