//! Builder module for producing dictionary tables from other tables or from
//! raw third-party releases.
//!
//! This module contains the merge engine and the raw converter registry used
//! by the fetch pipeline.

pub mod merge;
pub mod raw_converters;

// Re-export commonly used types for convenience
pub use merge::merge_tables;
pub use raw_converters::{ConverterRegistry, RawConverter, read_raw_sleep, read_raw_threat};
