//! Record-fetch boundary. The pipeline only sees [`QuotationSource`]; where
//! records actually live is up to the caller.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, FetchError, Result};
use crate::model::QuotationRecord;

/// Opaque access token, passed explicitly on every fetch.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            f.write_str("Credential(<none>)")
        } else {
            f.write_str("Credential(<redacted>)")
        }
    }
}

pub trait QuotationSource {
    /// Fetch one record. Single-shot: no retries happen behind this call.
    fn fetch(&self, id: &str, credential: &Credential) -> Result<QuotationRecord>;
}

fn check_token(expected: Option<&str>, credential: &Credential) -> Result<()> {
    match expected {
        Some(token) if token != credential.token() => Err(FetchError::Unauthorized.into()),
        _ => Ok(()),
    }
}

/// Reads `<dir>/<id>.json`. When an expected token is configured, any other
/// credential is rejected as unauthorized.
#[derive(Clone, Debug)]
pub struct JsonDirSource {
    dir: PathBuf,
    expected_token: Option<String>,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            expected_token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.expected_token = Some(token.into());
        self
    }

    fn record_path(&self, id: &str) -> Option<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then(|| self.dir.join(format!("{id}.json")))
    }
}

impl QuotationSource for JsonDirSource {
    fn fetch(&self, id: &str, credential: &Credential) -> Result<QuotationRecord> {
        check_token(self.expected_token.as_deref(), credential)?;

        let path = self
            .record_path(id)
            .ok_or_else(|| FetchError::NotFound(format!("invalid quotation id {id:?}")))?;
        let text = std::fs::read_to_string(&path).map_err(|e| -> Error {
            match e.kind() {
                std::io::ErrorKind::NotFound => {
                    FetchError::NotFound(format!("{}", path.display())).into()
                }
                _ => FetchError::Network(format!("{}: {e}", path.display())).into(),
            }
        })?;

        log::debug!("Fetched quotation {id} from {}", path.display());
        QuotationRecord::from_json(&text)
    }
}

/// In-memory store, for embedding and tests.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    records: HashMap<String, QuotationRecord>,
    expected_token: Option<String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.expected_token = Some(token.into());
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, record: QuotationRecord) {
        self.records.insert(id.into(), record);
    }
}

impl QuotationSource for MemorySource {
    fn fetch(&self, id: &str, credential: &Credential) -> Result<QuotationRecord> {
        check_token(self.expected_token.as_deref(), credential)?;
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(id.to_string()).into())
    }
}

/// Load a single record file directly, bypassing id lookup.
pub fn read_record_file(path: &Path) -> Result<QuotationRecord> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
    })?;
    QuotationRecord::from_json(&text)
}
