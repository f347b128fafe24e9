use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, Result};

pub const API_NAME: &str = "analytics";
pub const API_VERSION: &str = "v3";

const DISCOVERY_URI: &str = "https://www.googleapis.com/discovery/v1/apis/analytics/v3/rest";

/// The subset of the remote API's capability descriptor this system needs.
/// Cached on disk per API version to skip a discovery round-trip on every
/// invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryDoc {
    pub base_url: String,
}

impl DiscoveryDoc {
    pub fn report_endpoint(&self) -> String {
        format!("{}data/ga", self.base_url)
    }
}

pub fn cache_path(version: &str) -> PathBuf {
    env::temp_dir().join(format!(".ga-{API_NAME}-{version}.cache"))
}

/// A cache file that is missing, unreadable or corrupt reads as a miss.
pub(crate) fn read_cached(path: &Path) -> Option<DiscoveryDoc> {
    let bytes = fs::read(path).ok()?;
    serde_json::from_slice(&bytes).ok()
}

pub(crate) fn load(http: &reqwest::blocking::Client, path: &Path) -> Result<DiscoveryDoc> {
    if let Some(doc) = read_cached(path) {
        return Ok(doc);
    }
    debug!(cache = %path.display(), "discovery cache miss, fetching descriptor");
    let doc = fetch(http)?;
    if let Ok(bytes) = serde_json::to_vec(&doc) {
        // Failing to persist the cache only costs the next run a round-trip.
        let _ = fs::write(path, bytes);
    }
    Ok(doc)
}

fn fetch(http: &reqwest::blocking::Client) -> Result<DiscoveryDoc> {
    let value: serde_json::Value = http.get(DISCOVERY_URI).send()?.json()?;
    let base_url = value
        .get("baseUrl")
        .and_then(|value| value.as_str())
        .ok_or_else(|| ClientError::Discovery("descriptor has no baseUrl".to_string()))?;
    Ok(DiscoveryDoc {
        base_url: base_url.to_string(),
    })
}
