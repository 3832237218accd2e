use std::path::Path;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Installs the process logger: colored lines on stdout plus `<dir>/<name>.log`.
///
/// Call this after the console was initialized, stdout isn't usable before.
pub fn setup_logger(dir: &Path, name: &str, debug: bool) -> Result<(), fern::InitError> {
    std::fs::create_dir_all(dir)?;

    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::BrightBlack)
        .trace(Color::BrightBlack);

    let level = if debug { LevelFilter::Debug } else { LevelFilter::Info };

    let console = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stdout());

    let file = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(fern::log_file(dir.join(format!("{}.log", name)))?);

    fern::Dispatch::new()
        .level(level)
        .chain(console)
        .chain(file)
        .apply()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::info;
    use tempfile::TempDir;

    #[test]
    fn records_reach_the_log_file() {
        let dir = TempDir::new().unwrap();
        setup_logger(dir.path(), "test", true).unwrap();
        info!(target: "conattach", "console ready");
        log::logger().flush();
        let text = std::fs::read_to_string(dir.path().join("test.log")).unwrap();
        assert!(text.contains("[INFO][conattach] console ready"));
    }
}
