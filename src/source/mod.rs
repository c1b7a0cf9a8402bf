//! Data-source layer: the user record type and the capability that fetches it.
//!
//! The Users screen only ever talks to a [`UserSource`]. The binary wires an
//! [`HttpUserSource`] pointed at the configured endpoint (or a
//! [`StaticUserSource`] loaded from a fixture); tests hand in fixed records.
//!
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;

use crate::error::FetchError;

/// Collection endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/users";

/// One user as delivered by the remote collection.
///
/// Extra fields in the payload (address, company, ...) are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(deserialize_with = "phone_as_text")]
    pub phone: String,
    #[serde(default)]
    pub website: Option<String>,
}

// Some payloads carry the phone as a bare number.
fn phone_as_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Phone {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Phone::deserialize(deserializer)? {
        Phone::Text(s) => s,
        Phone::Number(n) => n.to_string(),
    })
}

/// Parse a JSON array of users.
pub fn parse_users(body: &str) -> Result<Vec<UserRecord>, FetchError> {
    Ok(serde_json::from_str(body)?)
}

/// Capability to obtain the full user collection in one call.
pub trait UserSource: Send + Sync {
    fn fetch_all(&self) -> Result<Vec<UserRecord>, FetchError>;

    /// Short human-readable origin, shown in the header and logs.
    fn describe(&self) -> String;
}

/// Reads the collection with a single `GET` against a JSON endpoint.
pub struct HttpUserSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpUserSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let url = url.into();
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;
        Ok(Self { url, client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl UserSource for HttpUserSource {
    fn fetch_all(&self) -> Result<Vec<UserRecord>, FetchError> {
        let transport = |source| FetchError::Transport {
            url: self.url.clone(),
            source,
        };
        tracing::debug!(url = %self.url, "requesting user collection");
        let resp = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().map_err(transport)?;
        parse_users(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Serves a fixed, in-memory collection.
#[derive(Clone, Debug, Default)]
pub struct StaticUserSource {
    records: Vec<UserRecord>,
    label: String,
}

impl StaticUserSource {
    pub fn new(records: Vec<UserRecord>) -> Self {
        Self {
            records,
            label: "in-memory".to_string(),
        }
    }

    /// Load a collection from a JSON file shaped like the remote payload.
    pub fn from_fixture(path: impl AsRef<Path>) -> Result<Self, FetchError> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path).map_err(|source| FetchError::Fixture {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            records: parse_users(&body)?,
            label: path.display().to_string(),
        })
    }

    pub fn records(&self) -> &[UserRecord] {
        &self.records
    }
}

impl UserSource for StaticUserSource {
    fn fetch_all(&self) -> Result<Vec<UserRecord>, FetchError> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
