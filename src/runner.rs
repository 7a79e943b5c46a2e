use serde_json::Value;
use thiserror::Error;

use crate::client::{LookupClient, LookupStatus};
use crate::config::{ConfigError, Settings};
use crate::mapper::DisplayRecord;
use crate::normalizer;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("enter a search term")]
    EmptyTerm,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },
}

/// Everything one lookup produced, normalized and raw side by side.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupResult {
    pub term: String,
    pub records: Vec<DisplayRecord>,
    pub raw: Value,
    pub status: LookupStatus,
}

impl LookupResult {
    pub fn is_error(&self) -> bool {
        self.raw.get("error").is_some()
    }
}

#[derive(Debug)]
pub struct Runner {
    settings: Settings,
    client: LookupClient,
}

impl Runner {
    pub fn new(settings: Settings) -> Result<Self, RunnerError> {
        let client = match settings.credential.as_ref() {
            _ if settings.mock => LookupClient::mock(),
            Some(credential) => LookupClient::live(
                settings.api_url.clone(),
                credential.expose().to_string(),
                settings.timeout,
            )
            .map_err(|source| RunnerError::HttpClientBuild { source })?,
            None => {
                return Err(ConfigError::MissingCredential {
                    var: crate::config::API_KEY_ENV,
                }
                .into())
            }
        };
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs one lookup. Only an empty term is rejected; every other failure
    /// is carried inside the returned payload.
    pub fn lookup(&self, term: &str) -> Result<LookupResult, RunnerError> {
        if term.is_empty() {
            return Err(RunnerError::EmptyTerm);
        }

        let raw = self.client.lookup(term);
        let records = normalizer::handle_multiple_results(&raw.payload, self.settings.auto_map);
        tracing::info!(
            status = %raw.status,
            records = records.len(),
            mock = self.client.is_mock(),
            "lookup complete"
        );
        Ok(LookupResult {
            term: term.to_string(),
            records,
            raw: raw.payload,
            status: raw.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credential;
    use serde_json::json;

    fn mock_settings() -> Settings {
        Settings {
            mock: true,
            ..Settings::default()
        }
    }

    #[test]
    fn missing_credential_stops_startup() {
        let err = Runner::new(Settings::default()).unwrap_err();
        assert!(matches!(
            err,
            RunnerError::Config(ConfigError::MissingCredential { .. })
        ));
    }

    #[test]
    fn empty_term_is_rejected_without_lookup() {
        let runner = Runner::new(mock_settings()).unwrap();
        assert!(matches!(runner.lookup(""), Err(RunnerError::EmptyTerm)));
    }

    #[test]
    fn whitespace_term_is_sent_as_is() {
        let runner = Runner::new(mock_settings()).unwrap();
        let result = runner.lookup("   ").unwrap();
        assert_eq!(result.term, "   ");
        assert_eq!(result.raw["mobile"], json!("   "));
    }

    #[test]
    fn mock_lookup_is_normalized() {
        let runner = Runner::new(mock_settings()).unwrap();
        let result = runner.lookup("9876543210").unwrap();
        assert_eq!(result.term, "9876543210");
        assert_eq!(result.status, LookupStatus::Code(200));
        assert_eq!(
            serde_json::to_value(&result.records).unwrap(),
            json!([{
                "name": "Priya Sharma",
                "mobile": "9876543210",
                "email": "priya.sh@example.com"
            }])
        );
        assert_eq!(result.raw["mobile"], json!("9876543210"));
        assert!(!result.is_error());
    }

    #[test]
    fn auto_map_off_keeps_raw_keys() {
        let runner = Runner::new(Settings {
            auto_map: false,
            ..mock_settings()
        })
        .unwrap();
        let result = runner.lookup("alice").unwrap();
        assert_eq!(
            serde_json::to_value(&result.records).unwrap(),
            json!([{"name": "Unknown", "mobile": "alice", "note": "No data"}])
        );
    }

    #[test]
    fn unreachable_api_yields_error_record() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let settings = Settings {
            api_url: reqwest::Url::parse(&format!("http://{addr}/")).unwrap(),
            credential: Some(Credential::new("k")),
            ..Settings::default()
        };
        let result = Runner::new(settings).unwrap().lookup("x").unwrap();
        assert!(result.is_error());
        assert_eq!(result.status, LookupStatus::Unknown);
        assert_eq!(result.records.len(), 1);
    }
}
