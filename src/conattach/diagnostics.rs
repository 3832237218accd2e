use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use log::warn;

/// Where the console routine reports failures it can't print.
pub trait Diagnostics {
    fn write_line(&mut self, line: &str);
}

impl<D> Diagnostics for &mut D where D: Diagnostics + ?Sized {
    fn write_line(&mut self, line: &str) {
        (**self).write_line(line)
    }
}

/// Append-only log file in the application's data directory.
///
/// The file is opened on the first write and then stays open for as long as
/// the logger lives, so repeated failures land in the same file handle.
#[derive(Debug)]
pub struct DiagnosticLogger {
    dir: PathBuf,
    name: String,
    file: Option<File>
}

impl DiagnosticLogger {
    pub fn new<P>(dir: P, name: &str) -> DiagnosticLogger where P: Into<PathBuf> {
        DiagnosticLogger {
            dir: dir.into(),
            name: name.to_string(),
            file: None
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn open_append_log(&mut self) -> std::io::Result<&mut File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => {
                std::fs::create_dir_all(&self.dir)?;
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(self.path())?
            }
        };
        Ok(self.file.insert(file))
    }

    fn append(&mut self, line: &str) -> std::io::Result<()> {
        let file = self.open_append_log()?;
        file.write_all(line.as_bytes())?;
        if !line.ends_with('\n') {
            file.write_all(b"\n")?;
        }
        file.flush()
    }
}

impl Diagnostics for DiagnosticLogger {
    fn write_line(&mut self, line: &str) {
        if let Err(err) = self.append(line) {
            warn!("Unable to write {}: {}", self.path().display(), err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn nothing_is_created_until_first_write() {
        let dir = TempDir::new().unwrap();
        let logger = DiagnosticLogger::new(dir.path(), "consoleLog.txt");
        assert!(!logger.is_open());
        assert!(!dir.path().join("consoleLog.txt").exists());
    }

    #[test]
    fn lines_are_appended_and_terminated() {
        let dir = TempDir::new().unwrap();
        let mut logger = DiagnosticLogger::new(dir.path(), "consoleLog.txt");
        logger.write_line("Failed to initialize console: Access is denied.\n");
        logger.write_line("second");
        assert!(logger.is_open());
        let text = std::fs::read_to_string(dir.path().join("consoleLog.txt")).unwrap();
        assert_eq!(text, "Failed to initialize console: Access is denied.\nsecond\n");
    }

    #[test]
    fn existing_log_is_kept() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("consoleLog.txt"), "earlier\n").unwrap();
        let mut logger = DiagnosticLogger::new(dir.path(), "consoleLog.txt");
        logger.write_line("later");
        let text = std::fs::read_to_string(logger.path()).unwrap();
        assert_eq!(text, "earlier\nlater\n");
    }

    #[test]
    fn missing_directory_is_created() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("app").join("data");
        let mut logger = DiagnosticLogger::new(&nested, "consoleLog.txt");
        logger.write_line("line");
        assert!(nested.join("consoleLog.txt").exists());
    }

    #[test]
    fn unwritable_location_is_swallowed() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();
        // A regular file where the directory should be.
        let mut logger = DiagnosticLogger::new(&blocker, "consoleLog.txt");
        logger.write_line("lost");
        assert!(!logger.is_open());
    }
}
