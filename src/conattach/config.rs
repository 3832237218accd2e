use std::path::{Path, PathBuf};
use serde_derive::{Serialize, Deserialize};

pub const MIN_BUFFER_LINES: i16 = 750;
pub const STDOUT_BUFFER: usize = 4096;
pub const STDERR_BUFFER: usize = 1024;
pub const LOG_FILE: &str = "consoleLog.txt";

/// `setvbuf` sizes the CRT accepts without raising its invalid parameter handler.
pub const STREAM_BUFFER_RANGE: std::ops::RangeInclusive<usize> = 2..=i32::MAX as usize;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Scroll-back height the console buffer is grown to. Larger buffers are left alone.
    pub min_buffer_lines: i16,
    pub stdout_buffer: usize,
    pub stderr_buffer: usize,
    pub log_file: String
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleConfig {
            min_buffer_lines: MIN_BUFFER_LINES,
            stdout_buffer: STDOUT_BUFFER,
            stderr_buffer: STDERR_BUFFER,
            log_file: String::from(LOG_FILE)
        }
    }
}

impl ConsoleConfig {
    /// Reads a JSON config, falling back to defaults when the file doesn't exist.
    pub fn load<P>(path: P) -> Result<ConsoleConfig, ConfigError> where P: AsRef<Path> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(ConsoleConfig::default());
        }
        let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: ConsoleConfig = serde_json::from_str(&text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the C runtime or the resize would choke on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_buffer_lines < 1 {
            return Err(ConfigError::Invalid("min_buffer_lines", self.min_buffer_lines as i64));
        }
        if !STREAM_BUFFER_RANGE.contains(&self.stdout_buffer) {
            return Err(ConfigError::Invalid("stdout_buffer", self.stdout_buffer as i64));
        }
        if !STREAM_BUFFER_RANGE.contains(&self.stderr_buffer) {
            return Err(ConfigError::Invalid("stderr_buffer", self.stderr_buffer as i64));
        }
        Ok(())
    }
}

/// Per-application data directory, or the working directory if the platform has none.
pub fn app_data_dir(app: &str) -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join(app),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(&'static str, i64)
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => f.write_fmt(format_args!("Unable to read config: {}", err)),
            ConfigError::Parse(err) => f.write_fmt(format_args!("Malformed config: {}", err)),
            ConfigError::Invalid(field, value) => f.write_fmt(format_args!("Config value {} = {} is out of range", field, value)),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid(..) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConsoleConfig::load(dir.path().join("console.json")).unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.min_buffer_lines, 750);
        assert_eq!(config.log_file, "consoleLog.txt");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("console.json");
        std::fs::write(&path, r#"{ "min_buffer_lines": 2000 }"#).unwrap();
        let config = ConsoleConfig::load(&path).unwrap();
        assert_eq!(config.min_buffer_lines, 2000);
        assert_eq!(config.stdout_buffer, 4096);
        assert_eq!(config.stderr_buffer, 1024);
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("console.json");
        std::fs::write(&path, "{ min_buffer_lines").unwrap();
        match ConsoleConfig::load(&path) {
            Err(ConfigError::Parse(_)) => {}
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    fn load_json(json: &str) -> Result<ConsoleConfig, ConfigError> {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("console.json");
        std::fs::write(&path, json).unwrap();
        ConsoleConfig::load(&path)
    }

    fn assert_rejected(json: &str, field: &str) {
        match load_json(json) {
            Err(ConfigError::Invalid(name, _)) => assert_eq!(name, field),
            other => panic!("expected {} to be rejected, got {:?}", field, other),
        }
    }

    #[test]
    fn undersized_stream_buffers_are_rejected() {
        assert_rejected(r#"{ "stdout_buffer": 0 }"#, "stdout_buffer");
        assert_rejected(r#"{ "stdout_buffer": 1 }"#, "stdout_buffer");
        assert_rejected(r#"{ "stderr_buffer": 0 }"#, "stderr_buffer");
        assert_rejected(r#"{ "stderr_buffer": 1 }"#, "stderr_buffer");
    }

    #[test]
    fn oversized_stream_buffers_are_rejected() {
        let too_big = i32::MAX as u64 + 1;
        assert_rejected(&format!(r#"{{ "stdout_buffer": {} }}"#, too_big), "stdout_buffer");
        assert_rejected(&format!(r#"{{ "stderr_buffer": {} }}"#, too_big), "stderr_buffer");
    }

    #[test]
    fn non_positive_buffer_lines_are_rejected() {
        assert_rejected(r#"{ "min_buffer_lines": 0 }"#, "min_buffer_lines");
        assert_rejected(r#"{ "min_buffer_lines": -5 }"#, "min_buffer_lines");
        assert_rejected(r#"{ "stdout_buffer": 0, "stderr_buffer": 1, "min_buffer_lines": -5 }"#, "min_buffer_lines");
    }

    #[test]
    fn range_edges_are_accepted() {
        let config = load_json(&format!(
            r#"{{ "min_buffer_lines": 1, "stdout_buffer": 2, "stderr_buffer": {} }}"#,
            i32::MAX
        )).unwrap();
        assert_eq!(config.min_buffer_lines, 1);
        assert_eq!(config.stdout_buffer, 2);
        assert_eq!(config.stderr_buffer, i32::MAX as usize);
        assert!(ConsoleConfig::default().validate().is_ok());
    }
}
