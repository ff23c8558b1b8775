//! Configuration for the fetch pipeline.
//!
//! # Examples
//!
//! ```
//! use lexdx::fetch::FetchConfig;
//!
//! # fn main() -> lexdx::Result<()> {
//! let config = FetchConfig::from_json_str(r#"{
//!     "cache_dir": "/var/cache/lexdx",
//!     "mirror_dir": "/srv/dictionaries",
//!     "registry": {"threat": "threat.txt"}
//! }"#)?;
//! assert_eq!(config.registry.artifact_for("threat")?, "threat.txt");
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::fetch::registry::Registry;
use crate::formats::{DicReadOptions, DicxWriteOptions, ReadOptions, WriteOptions};
use crate::utils::io_utils::text_from_file;
use crate::{DxError, Result};

/// Pipeline configuration.
///
/// Directory paths may use `~` and `$VAR`; they are expanded when resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Directory holding cached raw and derived artifacts
    pub cache_dir: String,
    /// Directory the local mirror fetcher copies raw artifacts from
    pub mirror_dir: String,
    /// Dictionary name → raw artifact file name
    pub registry: Registry,
    /// Options used when loading DIC artifacts
    pub dic: DicReadOptions,
    /// Options used when persisting derived DICX artifacts
    pub dicx: DicxWriteOptions,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            cache_dir: "~/.cache/lexdx".to_string(),
            mirror_dir: String::new(),
            registry: Registry::builtin(),
            dic: DicReadOptions::default(),
            dicx: DicxWriteOptions::default(),
        }
    }
}

fn expand_dir(dir: &str, what: &str) -> Result<PathBuf> {
    if dir.trim().is_empty() {
        return Err(DxError::invalid_parameter(format!("{} is not configured", what)));
    }
    let expanded = shellexpand::full(dir)
        .map_err(|e| DxError::invalid_parameter(format!("Cannot expand {} {:?}: {}", what, dir, e)))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

impl FetchConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = text_from_file(path, "utf-8")?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn resolved_cache_dir(&self) -> Result<PathBuf> {
        expand_dir(&self.cache_dir, "cache_dir")
    }

    pub fn resolved_mirror_dir(&self) -> Result<PathBuf> {
        expand_dir(&self.mirror_dir, "mirror_dir")
    }

    pub fn read_options(&self) -> ReadOptions {
        ReadOptions { dic: self.dic.clone() }
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions { dicx: self.dicx }
    }
}
