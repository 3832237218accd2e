#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::io::Write;
use log::{info, warn};
use conattach::config::{app_data_dir, ConsoleConfig};
use conattach::DiagnosticLogger;

const APP: &str = "console-attach";
const DEFAULT_ROWS: usize = 1000;

fn main() {
    let data_dir = app_data_dir(APP);
    let (config, config_error) = match ConsoleConfig::load(data_dir.join("console.json")) {
        Ok(config) => (config, None),
        Err(err) => (ConsoleConfig::default(), Some(err)),
    };

    // Lives as long as the process so later failures append to the same file
    let mut console_log = DiagnosticLogger::new(&data_dir, &config.log_file);
    conattach::initialize_with(&mut console_log, &config);

    #[cfg(target_os = "windows")]
    let virtual_terminal = colored::control::set_virtual_terminal(true);

    if let Err(err) = conattach::setup_logger(&data_dir, "launcher", cfg!(debug_assertions)) {
        eprintln!("Unable to set up logging: {}", err);
    }
    #[cfg(target_os = "windows")]
    if virtual_terminal.is_err() {
        log::debug!("Console has no virtual terminal support, colors are disabled");
    }
    if let Some(err) = config_error {
        warn!("{}, using defaults", err);
    }

    let rows = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(DEFAULT_ROWS);
    info!("Printing {} rows", rows);

    if let Err(err) = print_table(rows) {
        warn!("Table output failed: {}", err);
    }
}

fn print_table(rows: usize) -> std::io::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{:>6}  {:<24}{:>10}{:>10}", "#", "name", "width", "height")?;
    for row in 0..rows {
        let name = format!("row-{:04}", row);
        writeln!(out, "{:>6}  {:<24}{:>10}{:>10}", row, name, 80 + row % 40, 25 + row % 725)?;
    }
    out.flush()
}
