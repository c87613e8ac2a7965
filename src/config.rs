use crate::error::SdsResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_api_version() -> String {
    "v1".to_string()
}

/// Connection settings, in the shape of an `appsettings.json` file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SdsConfig {
    /// Base service URL, e.g. `https://dat-b.osisoft.com`
    pub resource: String,
    pub tenant_id: String,
    pub namespace_id: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    pub client_id: String,
    pub client_key: String,
    #[serde(default)]
    pub accept_verbosity: bool,
}

impl SdsConfig {
    /// Load settings from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> SdsResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> SdsResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
