//! Console attachment for GUI-subsystem Windows executables.
//!
//! A process linked with `windows_subsystem = "windows"` starts without
//! working standard streams. [`initialize`] attaches them to the terminal the
//! program was launched from (or a new console), grows its scroll-back so long
//! listings aren't cut off, and leaves shell redirections untouched.

use std::path::PathBuf;

pub mod attach;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logger;
#[cfg(target_os = "windows")]
pub mod win;

pub use attach::{BufferGeometry, Buffering, ConsoleAttacher, ConsolePlatform, RedirectionState, StdStream};
pub use config::ConsoleConfig;
pub use diagnostics::{DiagnosticLogger, Diagnostics};
pub use error::ConsoleError;
pub use logger::setup_logger;

/// Runs the console setup once, logging failures to `consoleLog.txt` in the
/// working directory.
///
/// The failure log is closed again when this returns. Callers that want it to
/// stay open for the rest of the process own a [`DiagnosticLogger`] and use
/// [`initialize_with`] instead.
pub fn initialize() {
    let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = ConsoleConfig::default();
    let mut logger = DiagnosticLogger::new(dir, &config.log_file);
    initialize_with(&mut logger, &config)
}

/// Same as [`initialize`], reporting failures to a logger the caller keeps alive.
#[cfg(target_os = "windows")]
pub fn initialize_with(logger: &mut DiagnosticLogger, config: &ConsoleConfig) {
    ConsoleAttacher::with_config(win::WinConsole, logger, config.clone()).initialize();
}

#[cfg(not(target_os = "windows"))]
pub fn initialize_with(_logger: &mut DiagnosticLogger, _config: &ConsoleConfig) {
    log::debug!("Console attachment is only needed on Windows");
}
