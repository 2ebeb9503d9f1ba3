//! Credential sources, consulted in priority order.
//!
//! The first source holding a non-empty value for a key wins. The usual
//! chain is: settings file `[credentials]` table, then the process
//! environment, then a `.env` file.

use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use tracing::debug;

use medlens_contracts::error::{MedlensError, MedlensResult};

/// Selects the vision backend when present.
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
/// Credential for the text backend.
pub const MISTRAL_API_KEY: &str = "MISTRAL_API_KEY";
/// Chat backend key.
pub const STREAM_API_KEY: &str = "STREAM_API_KEY";
/// Chat backend secret used to sign server tokens.
pub const STREAM_API_SECRET: &str = "STREAM_API_SECRET";

/// Something that can answer "what is the value of KEY?".
pub trait CredentialSource: Send + Sync {
    /// Short label for logs, e.g. "env".
    fn name(&self) -> &str;

    fn get(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSource;

impl CredentialSource for EnvSource {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed key/value table.
#[derive(Debug, Clone)]
pub struct MapSource {
    name: String,
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: HashMap::new(),
        }
    }

    pub fn from_table(name: impl Into<String>, table: &BTreeMap<String, String>) -> Self {
        Self {
            name: name.into(),
            values: table.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl CredentialSource for MapSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Values read from a dotenv file. The process environment is not modified.
#[derive(Debug, Clone)]
pub struct DotenvSource {
    inner: MapSource,
}

impl DotenvSource {
    /// Read `path`; a missing or malformed file is an error.
    pub fn load(path: &Path) -> MedlensResult<Self> {
        let iter = dotenvy::from_path_iter(path).map_err(|e| MedlensError::ConfigError {
            reason: format!("failed to open env file '{}': {e}", path.display()),
        })?;

        let mut inner = MapSource::new("dotenv");
        for item in iter {
            let (key, value) = item.map_err(|e| MedlensError::ConfigError {
                reason: format!("failed to parse env file '{}': {e}", path.display()),
            })?;
            inner = inner.with(key, value);
        }
        Ok(Self { inner })
    }

    /// Like [`load`](Self::load) but a missing file yields `None`.
    pub fn load_optional(path: &Path) -> MedlensResult<Option<Self>> {
        if path.exists() {
            Self::load(path).map(Some)
        } else {
            Ok(None)
        }
    }
}

impl CredentialSource for DotenvSource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }
}

/// Ordered list of sources.
#[derive(Default)]
pub struct CredentialChain {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source with lower priority than all sources added before it.
    pub fn push(mut self, source: impl CredentialSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// First non-empty value for `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        for source in &self.sources {
            if let Some(value) = source.get(key).filter(|v| !v.trim().is_empty()) {
                debug!(key, source = source.name(), "credential resolved");
                return Some(value);
            }
        }
        None
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }
}
