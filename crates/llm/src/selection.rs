//! Model selection: which backend, which model, where and how.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{collections::BTreeMap, convert::Infallible, str::FromStr, time::Duration};

/// Everything needed to address one model on one backend.
#[derive(Debug, Clone, Default)]
pub struct ModelSelection {
    /// Backend identifier, e.g. `openai` or `Gemini`
    pub backend: CompactString,
    /// Model name as the backend knows it
    pub model: CompactString,
    /// Endpoint override; adapters fall back to their public default
    pub base_url: Option<String>,
    /// Credential, empty for keyless backends
    pub api_key: String,
    /// Backend-specific extra request parameters
    pub extra: ExtraParams,
    /// Request timeout override
    pub timeout: Option<Duration>,
}

impl ModelSelection {
    pub fn new(backend: impl Into<CompactString>, model: impl Into<CompactString>) -> Self {
        Self {
            backend: backend.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    pub fn with_extra(mut self, extra: ExtraParams) -> Self {
        self.extra = extra;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Extra request parameters, written as `key=value;key2=value2`.
///
/// Values that parse as JSON keep their JSON type, anything else is a
/// string: `temperature=0.2;user=max` yields a number and a string.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ExtraParams(BTreeMap<String, Value>);

impl ExtraParams {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Copy every parameter into a JSON object, overwriting existing keys.
    pub fn merge_into(&self, target: &mut Map<String, Value>) {
        for (key, value) in &self.0 {
            target.insert(key.clone(), value.clone());
        }
    }
}

impl FromStr for ExtraParams {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut params = BTreeMap::new();
        for pair in s.split(';') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            let value = value.trim();
            let value = serde_json::from_str(value).unwrap_or_else(|_| Value::from(value));
            params.insert(key.to_owned(), value);
        }
        Ok(Self(params))
    }
}
