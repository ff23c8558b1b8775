//! Remote dictionary acquisition.
//!
//! This module resolves dictionary names to raw artifacts, obtains them
//! through a [`ContentFetcher`], converts non-DIC releases to DICX once per
//! artifact version and loads the result.

pub mod config;
pub mod content_fetcher;
pub mod pipeline;
pub mod registry;

pub use config::FetchConfig;
pub use content_fetcher::{ContentFetcher, FetchAction, FetchOutcome, LocalMirrorFetcher};
pub use pipeline::{FetchPipeline, derived_path};
pub use registry::Registry;
