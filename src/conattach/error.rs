use crate::attach::ConsolePlatform;

pub const FORMAT_FALLBACK: &str = "Failed to format message.";

/// A failed console setup step, carrying the platform's last error code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleError {
    /// Neither the parent console could be attached nor a new one allocated.
    Attach(u32),
    /// `CONOUT$` couldn't be opened.
    OpenOutput(u32)
}

impl ConsoleError {
    pub fn code(&self) -> u32 {
        match self {
            ConsoleError::Attach(code) | ConsoleError::OpenOutput(code) => *code,
        }
    }
}

impl std::fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConsoleError::Attach(code) => f.write_fmt(format_args!("Console attach failed with code 0x{:08X}", code)),
            ConsoleError::OpenOutput(code) => f.write_fmt(format_args!("Console output open failed with code 0x{:08X}", code)),
        }
    }
}

impl std::error::Error for ConsoleError {}

/// Translates an error code through the platform message table. Never fails.
pub fn format_error<P>(platform: &P, code: u32) -> String where P: ConsolePlatform + ?Sized {
    clean_message(platform.format_message(code).as_deref())
}

/// Drops every CR so the system's CRLF endings don't turn into CRCRLF once written out.
pub fn clean_message(message: Option<&str>) -> String {
    match message {
        Some(message) if !message.is_empty() => message.chars().filter(|&c| c != '\r').collect(),
        _ => String::from(FORMAT_FALLBACK),
    }
}
