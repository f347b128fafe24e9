use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use pulse_core::MetricSpec;

use crate::error::{AppError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/sitepulse.yml";

/// Host-global configuration file. Other host subsystems keep their own
/// sections; this system only reads `google_analytics`.
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalConfig {
    pub google_analytics: GaSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GaSettings {
    #[serde(default)]
    pub application_name: Option<String>,
    #[serde(default)]
    pub application_version: Option<String>,
    pub service_account_email: String,
    pub key_file: PathBuf,
    /// Passphrase of the legacy key container format; retained for
    /// compatibility with existing host config files. Keys are expected as
    /// unencrypted PEM.
    #[serde(default)]
    pub key_secret: Option<String>,
    pub profile_id: u64,
    pub db_path: PathBuf,
    /// Schedule class (`monthly`/`daily`/`today`) to metric definition file.
    #[serde(default)]
    pub attributes: BTreeMap<String, PathBuf>,
}

pub type MetricSets = BTreeMap<String, MetricSpec>;

pub fn load_global(path: &Path) -> Result<GlobalConfig> {
    let contents = fs::read_to_string(path)?;
    parse_global(&contents)
}

pub fn parse_global(contents: &str) -> Result<GlobalConfig> {
    Ok(serde_yaml::from_str(contents)?)
}

pub fn load_metric_sets(path: &Path) -> Result<MetricSets> {
    let contents = fs::read_to_string(path)?;
    parse_metric_sets(&contents)
}

pub fn parse_metric_sets(contents: &str) -> Result<MetricSets> {
    let sets: MetricSets = serde_yaml::from_str(contents)?;
    for (name, spec) in &sets {
        spec.validate().map_err(|source| AppError::InvalidSpec {
            name: name.clone(),
            source,
        })?;
    }
    Ok(sets)
}
