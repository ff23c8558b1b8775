//! Content fetchers place raw dictionary artifacts in a local cache.
//!
//! The pipeline only needs two things from a fetcher: the local path of the
//! artifact and whether this call brought in a new or changed copy. Transport,
//! retries and checksums are the fetcher's own business.

use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::utils::io_utils::write_atomic;
use crate::{DxError, Result};

/// What a fetch call did to the cached artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchAction {
    /// The artifact was not cached and has been downloaded.
    Download,
    /// The cached artifact was stale and has been refreshed.
    Update,
    /// The cached artifact was current; nothing was transferred.
    Fetch,
}

impl FetchAction {
    /// Whether the cached content changed during this call.
    pub fn is_new_content(&self) -> bool {
        !matches!(self, FetchAction::Fetch)
    }
}

impl fmt::Display for FetchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FetchAction::Download => "download",
            FetchAction::Update => "update",
            FetchAction::Fetch => "fetch",
        };
        f.write_str(s)
    }
}

/// Result of a fetch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Local path of the cached artifact
    pub path: PathBuf,
    pub action: FetchAction,
}

/// Common interface for retrieving raw artifacts into a local cache.
pub trait ContentFetcher {
    /// Makes `artifact_name` available locally and reports what was done.
    fn fetch(&self, artifact_name: &str) -> Result<FetchOutcome>;
}

impl<T: ContentFetcher + ?Sized> ContentFetcher for &T {
    fn fetch(&self, artifact_name: &str) -> Result<FetchOutcome> {
        (**self).fetch(artifact_name)
    }
}

/// A fetcher that mirrors artifacts from a local directory into the cache.
///
/// A cached copy is refreshed when the mirror copy is newer or differs in
/// size.
#[derive(Debug, Clone)]
pub struct LocalMirrorFetcher {
    mirror_dir: PathBuf,
    cache_dir: PathBuf,
}

impl LocalMirrorFetcher {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(mirror_dir: P, cache_dir: Q) -> Self {
        Self {
            mirror_dir: mirror_dir.into(),
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn is_stale(source: &Path, cached: &Path) -> Result<bool> {
        let source_meta = fs::metadata(source)?;
        let cached_meta = fs::metadata(cached)?;
        if source_meta.len() != cached_meta.len() {
            return Ok(true);
        }
        match (source_meta.modified(), cached_meta.modified()) {
            (Ok(source_time), Ok(cached_time)) => Ok(source_time > cached_time),
            _ => Ok(false),
        }
    }
}

impl ContentFetcher for LocalMirrorFetcher {
    fn fetch(&self, artifact_name: &str) -> Result<FetchOutcome> {
        if artifact_name.is_empty() || Path::new(artifact_name).file_name() != Some(OsStr::new(artifact_name)) {
            return Err(DxError::invalid_parameter(format!("Invalid artifact name: {:?}", artifact_name)));
        }
        let source = self.mirror_dir.join(artifact_name);
        let cached = self.cache_dir.join(artifact_name);

        let action = if !cached.exists() {
            FetchAction::Download
        } else if Self::is_stale(&source, &cached)? {
            FetchAction::Update
        } else {
            FetchAction::Fetch
        };

        if action.is_new_content() {
            fs::create_dir_all(&self.cache_dir)?;
            let data = fs::read(&source)?;
            write_atomic(&cached, &data)?;
            info!("{} {} into {}", action, artifact_name, self.cache_dir.display());
        }
        Ok(FetchOutcome { path: cached, action })
    }
}
