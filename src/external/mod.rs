// External collaborators driven through their command line
//
// This module wraps the desktop text-analysis application's command-line
// client.

pub mod analysis_cli;

pub use analysis_cli::{AnalysisCli, ProcessProbe, SystemProcessProbe};
