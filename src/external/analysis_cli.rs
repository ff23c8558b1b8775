//! Thin wrapper over the command line of the external LIWC-22 desktop
//! application.
//!
//! The command-line client only works while the desktop application is
//! running, so [`AnalysisCli::run`] checks for it first and fails fast.
//!
//! # Examples
//!
//! ```no_run
//! use indexmap::IndexMap;
//! use lexdx::external::AnalysisCli;
//!
//! # fn main() -> lexdx::Result<()> {
//! let cli = AnalysisCli::default();
//! let mut options = IndexMap::new();
//! options.insert("mode".to_string(), "wc".to_string());
//! options.insert("input".to_string(), "texts.csv".to_string());
//! let code = cli.run(&options)?;
//! println!("liwc-22-cli exited with {}", code);
//! # Ok(())
//! # }
//! ```

use std::io;
use std::process::Command;

use indexmap::IndexMap;
use log::{debug, info};
use sysinfo::{ProcessesToUpdate, System};

use crate::{DxError, Result};

pub const DEFAULT_APP_NAME: &str = "LIWC-22";
pub const DEFAULT_CLI_PROGRAM: &str = "liwc-22-cli";

/// Answers whether a process with a given name is running.
pub trait ProcessProbe {
    fn is_running(&self, app_name: &str) -> bool;
}

/// Process probe backed by the operating system's process table.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessProbe;

/// Compares a process name against an application name, ignoring any
/// extension such as `.exe`.
fn process_matches(process_name: &str, app_name: &str) -> bool {
    process_name.split('.').next() == Some(app_name)
}

impl ProcessProbe for SystemProcessProbe {
    fn is_running(&self, app_name: &str) -> bool {
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);
        system
            .processes()
            .values()
            .any(|process| process_matches(&process.name().to_string_lossy(), app_name))
    }
}

/// Launcher for the application's command-line client.
pub struct AnalysisCli<P: ProcessProbe = SystemProcessProbe> {
    app_name: String,
    program: String,
    probe: P,
}

impl Default for AnalysisCli<SystemProcessProbe> {
    fn default() -> Self {
        Self::new(DEFAULT_APP_NAME, DEFAULT_CLI_PROGRAM, SystemProcessProbe)
    }
}

impl<P: ProcessProbe> AnalysisCli<P> {
    pub fn new(app_name: &str, program: &str, probe: P) -> Self {
        Self {
            app_name: app_name.to_string(),
            program: program.to_string(),
            probe,
        }
    }

    pub fn is_app_running(&self) -> bool {
        self.probe.is_running(&self.app_name)
    }

    /// Builds the `--name value` argument list in insertion order.
    pub fn command_args(options: &IndexMap<String, String>) -> Vec<String> {
        options
            .iter()
            .flat_map(|(key, value)| [format!("--{}", key), value.clone()])
            .collect()
    }

    /// Runs the command-line client with the given options and returns its
    /// exit code.
    ///
    /// # Errors
    ///
    /// Returns `AppNotRunning` if the desktop application is not running, or
    /// an I/O error if the client cannot be started or is killed by a signal.
    pub fn run(&self, options: &IndexMap<String, String>) -> Result<i32> {
        if !self.is_app_running() {
            return Err(DxError::app_not_running(&self.app_name));
        }
        let args = Self::command_args(options);
        debug!("Running {} {:?}", self.program, args);
        let status = Command::new(&self.program).args(&args).status()?;
        let code = status
            .code()
            .ok_or_else(|| io::Error::other(format!("{} was terminated by a signal", self.program)))?;
        info!("{} exited with {}", self.program, code);
        Ok(code)
    }
}
