//! Fetch/convert pipeline.
//!
//! For a dictionary name the pipeline:
//!
//! 1. looks up the raw artifact in the [`Registry`] and asks the
//!    [`ContentFetcher`] for a local copy;
//! 2. if the artifact is already `.dic`/`.dicx`, loads it directly;
//! 3. otherwise runs the registered [`RawConverter`], validates the result
//!    and writes it as a `.dicx` next to the raw file, then loads that.
//!
//! Conversion happens only when the fetcher reports new or updated content,
//! or when the derived file is missing. Everything else reuses the derived
//! file, so each raw artifact version is converted at most once. New content
//! removes the previous derived file first, so a failed conversion never
//! leaves an older version behind for later reuse.
//!
//! # Examples
//!
//! ```no_run
//! use lexdx::builder::ConverterRegistry;
//! use lexdx::fetch::{FetchConfig, FetchPipeline};
//!
//! # fn main() -> lexdx::Result<()> {
//! let config = FetchConfig::from_json_file("lexdx.json")?;
//! let pipeline = FetchPipeline::from_config(&config, ConverterRegistry::builtin())?;
//! let threat = pipeline.fetch_table("threat")?;
//! println!("{} threat terms", threat.len());
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::builder::merge::merge_tables;
use crate::builder::raw_converters::ConverterRegistry;
use crate::fetch::config::FetchConfig;
use crate::fetch::content_fetcher::{ContentFetcher, FetchOutcome, LocalMirrorFetcher};
use crate::fetch::registry::Registry;
use crate::formats::{
    DICX_SUFFIX, DictFormat, ReadOptions, WriteOptions, read_table_with_options, write_table_with_options,
};
use crate::storage::dictionary_table::DictionaryTable;
use crate::storage::schema::validate;
use crate::utils::io_utils::{path_suffix, with_suffix};
use crate::{DxError, Result};

/// Path of the `.dicx` derived from a raw artifact.
///
/// # Errors
///
/// Returns `AlreadyDerived` if `raw_path` is itself a `.dicx` file, since the
/// derived file would overwrite its own source.
pub fn derived_path<P: AsRef<Path>>(raw_path: P) -> Result<PathBuf> {
    let raw_path = raw_path.as_ref();
    if path_suffix(raw_path) == DICX_SUFFIX {
        return Err(DxError::already_derived(raw_path));
    }
    Ok(with_suffix(raw_path, DICX_SUFFIX))
}

/// Drives fetching, conversion and loading of named dictionaries.
pub struct FetchPipeline<F: ContentFetcher> {
    fetcher: F,
    registry: Registry,
    converters: ConverterRegistry,
    read_options: ReadOptions,
    write_options: WriteOptions,
}

impl FetchPipeline<LocalMirrorFetcher> {
    /// Builds a pipeline backed by a [`LocalMirrorFetcher`] from a config.
    pub fn from_config(config: &FetchConfig, converters: ConverterRegistry) -> Result<Self> {
        let fetcher = LocalMirrorFetcher::new(config.resolved_mirror_dir()?, config.resolved_cache_dir()?);
        Ok(Self::new(fetcher, config.registry.clone(), converters)
            .with_options(config.read_options(), config.write_options()))
    }
}

impl<F: ContentFetcher> FetchPipeline<F> {
    pub fn new(fetcher: F, registry: Registry, converters: ConverterRegistry) -> Self {
        Self {
            fetcher,
            registry,
            converters,
            read_options: ReadOptions::default(),
            write_options: WriteOptions::default(),
        }
    }

    pub fn with_options(mut self, read_options: ReadOptions, write_options: WriteOptions) -> Self {
        self.read_options = read_options;
        self.write_options = write_options;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Fetches `name` and returns the path of a readable `.dic`/`.dicx`
    /// artifact, converting the raw artifact if needed.
    pub fn fetch_path(&self, name: &str) -> Result<PathBuf> {
        let artifact = self.registry.artifact_for(name)?;
        let outcome = self.fetcher.fetch(artifact)?;
        debug!("{}: fetcher reported {} for {}", name, outcome.action, outcome.path.display());

        if DictFormat::from_path(&outcome.path).is_ok() {
            return Ok(outcome.path);
        }
        self.derive(name, &outcome)
    }

    /// Fetches `name` and loads it as a validated table.
    pub fn fetch_table(&self, name: &str) -> Result<DictionaryTable> {
        let path = self.fetch_path(name)?;
        read_table_with_options(&path, &self.read_options)
    }

    /// Fetches several dictionaries and merges them into one table.
    pub fn merge_fetched<S: AsRef<str>>(&self, names: &[S]) -> Result<DictionaryTable> {
        let tables = names
            .iter()
            .map(|name| self.fetch_table(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        merge_tables(&tables)
    }

    fn derive(&self, name: &str, outcome: &FetchOutcome) -> Result<PathBuf> {
        let out_path = derived_path(&outcome.path)?;
        if !outcome.action.is_new_content() && out_path.exists() {
            debug!("{}: reusing {}", name, out_path.display());
            return Ok(out_path);
        }

        let converter = self
            .converters
            .get(name)
            .ok_or_else(|| DxError::missing_converter(name))?;
        if out_path.exists() {
            warn!("{}: discarding {} derived from the previous version", name, out_path.display());
            fs::remove_file(&out_path)?;
        }

        info!("{}: converting {} ({})", name, outcome.path.display(), outcome.action);
        let frame = converter
            .convert(&outcome.path)
            .map_err(|e| DxError::conversion(name, e))?;
        let table = validate(frame).map_err(|e| DxError::conversion(name, e))?;
        write_table_with_options(&table, &out_path, &self.write_options)?;
        info!("{}: wrote {} terms to {}", name, table.len(), out_path.display());
        Ok(out_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_path() {
        assert_eq!(derived_path("/c/threat.txt").unwrap(), PathBuf::from("/c/threat.dicx"));
        assert_eq!(derived_path("/c/table.tsv").unwrap(), PathBuf::from("/c/table.dicx"));
        assert!(derived_path("/c/threat.dicx").unwrap_err().is_already_derived());
    }
}
