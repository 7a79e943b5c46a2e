use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use serde_json::{json, Value};
use sha2::{Digest, Sha256};

pub const DEFAULT_API_URL: &str = "https://decryptkarnrwalebkl.wasmer.app/";
pub const KEY_PARAM: &str = "key";
pub const TERM_PARAM: &str = "term";
pub const MOCK_STATUS: u16 = 200;

/// HTTP status of a lookup, or `Unknown` when the request never produced one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupStatus {
    Code(u16),
    Unknown,
}

impl LookupStatus {
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Code(code) => Some(*code),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Unknown => f.write_str("N/A"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RawLookup {
    pub payload: Value,
    pub status: LookupStatus,
}

enum Backend {
    Live {
        http: reqwest::blocking::Client,
        api_url: reqwest::Url,
        credential: String,
    },
    Mock,
}

pub struct LookupClient {
    backend: Backend,
}

impl fmt::Debug for LookupClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.backend {
            Backend::Live { api_url, .. } => f
                .debug_struct("LookupClient")
                .field("api_url", &api_url.as_str())
                .finish_non_exhaustive(),
            Backend::Mock => f.debug_struct("LookupClient").field("mock", &true).finish(),
        }
    }
}

impl LookupClient {
    pub fn live(
        api_url: reqwest::Url,
        credential: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(concat!(
                "numinfo/",
                env!("CARGO_PKG_VERSION")
            )),
        );
        let http = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            backend: Backend::Live {
                http,
                api_url,
                credential,
            },
        })
    }

    pub fn mock() -> Self {
        Self {
            backend: Backend::Mock,
        }
    }

    pub fn is_mock(&self) -> bool {
        matches!(self.backend, Backend::Mock)
    }

    /// Runs one lookup. Transport failures come back as an `{"error": ...}`
    /// payload instead of an `Err`.
    pub fn lookup(&self, term: &str) -> RawLookup {
        match &self.backend {
            Backend::Live {
                http,
                api_url,
                credential,
            } => fetch(http, api_url, credential, term),
            Backend::Mock => RawLookup {
                payload: mock_lookup(term),
                status: LookupStatus::Code(MOCK_STATUS),
            },
        }
    }
}

fn fetch(
    http: &reqwest::blocking::Client,
    api_url: &reqwest::Url,
    credential: &str,
    term: &str,
) -> RawLookup {
    tracing::debug!(url = api_url.as_str(), "sending lookup request");
    let response = match http
        .get(api_url.clone())
        .query(&[(KEY_PARAM, credential), (TERM_PARAM, term)])
        .send()
    {
        Ok(response) => response,
        Err(e) => {
            let status = e
                .status()
                .map(|s| LookupStatus::Code(s.as_u16()))
                .unwrap_or(LookupStatus::Unknown);
            tracing::warn!(%status, "lookup request failed");
            return RawLookup {
                payload: error_payload(e),
                status,
            };
        }
    };

    let status = LookupStatus::Code(response.status().as_u16());
    match response.text() {
        Ok(body) => RawLookup {
            payload: parse_body(body),
            status,
        },
        Err(e) => {
            tracing::warn!(%status, "failed to read lookup response body");
            RawLookup {
                payload: error_payload(e),
                status,
            }
        }
    }
}

/// Structured JSON when the body parses, otherwise `{"text": body}`.
pub fn parse_body(body: String) -> Value {
    match serde_json::from_str::<Value>(&body) {
        Ok(value) => value,
        Err(_) => json!({ "text": body }),
    }
}

// The request URL carries the credential, so it is stripped from the message.
fn describe_error(e: reqwest::Error) -> String {
    let e = e.without_url();
    let mut message = e.to_string();
    let mut source = StdError::source(&e);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

fn error_payload(e: reqwest::Error) -> Value {
    json!({ "error": describe_error(e) })
}

fn mock_samples(term: &str) -> Vec<Value> {
    vec![
        json!({"name": "Rahul Kumar", "mobile": term, "email": "rahul.k@example.com"}),
        json!({"name": "Priya Sharma", "mobile": term, "email": "priya.sh@example.com"}),
        json!({"name": "Unknown", "mobile": term, "note": "No data"}),
    ]
}

/// Index into a list of `len` canned records, derived from SHA-256 of the term.
pub fn mock_index(term: &str, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let digest = Sha256::digest(term.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(head) % len as u64) as usize
}

pub fn mock_lookup(term: &str) -> Value {
    let mut samples = mock_samples(term);
    let idx = mock_index(term, samples.len());
    samples.swap_remove(idx)
}
