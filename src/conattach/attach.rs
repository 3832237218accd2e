use log::{debug, warn};

use crate::config::ConsoleConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{ConsoleError, format_error};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StdStream {
    Output,
    Error
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Buffering {
    /// Flushed when the buffer of the given size fills up.
    Full(usize),
    /// Flushed on every newline.
    Line(usize)
}

/// Screen buffer size in character cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BufferGeometry {
    pub width: i16,
    pub height: i16
}

/// The native console calls the attach routine is built from.
///
/// Fallible calls report failure with `false`/`None`, the reason is then
/// available through [`ConsolePlatform::last_error`].
pub trait ConsolePlatform {
    /// Console output device. Dropping it releases the native handle.
    type Output;

    /// Whether the stream has no usable descriptor behind it.
    fn is_detached(&self, stream: StdStream) -> bool;

    fn attach_parent(&mut self) -> bool;

    fn alloc(&mut self) -> bool;

    fn open_output(&mut self) -> Option<Self::Output>;

    fn buffer_size(&self, output: &Self::Output) -> Option<BufferGeometry>;

    fn set_buffer_size(&mut self, output: &Self::Output, size: BufferGeometry) -> bool;

    /// Reopens the stream against the console output device with the given buffering.
    fn reopen(&mut self, stream: StdStream, buffering: Buffering) -> bool;

    fn last_error(&self) -> u32;

    /// Raw system message for the error code, if the platform has one.
    fn format_message(&self, code: u32) -> Option<String>;
}

/// Which standard streams still have to be bound to the console.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RedirectionState {
    pub stdout: bool,
    pub stderr: bool
}

impl RedirectionState {
    pub fn detect<P>(platform: &P) -> RedirectionState where P: ConsolePlatform + ?Sized {
        RedirectionState {
            stdout: platform.is_detached(StdStream::Output),
            stderr: platform.is_detached(StdStream::Error)
        }
    }

    pub fn any(&self) -> bool {
        self.stdout || self.stderr
    }
}

pub struct ConsoleAttacher<P, D> {
    platform: P,
    diagnostics: D,
    config: ConsoleConfig
}

impl<P, D> ConsoleAttacher<P, D> where P: ConsolePlatform, D: Diagnostics {
    pub fn new(platform: P, diagnostics: D) -> ConsoleAttacher<P, D> {
        ConsoleAttacher::with_config(platform, diagnostics, ConsoleConfig::default())
    }

    pub fn with_config(platform: P, diagnostics: D, config: ConsoleConfig) -> ConsoleAttacher<P, D> {
        ConsoleAttacher { platform, diagnostics, config }
    }

    /// Binds stdout/stderr to the launching terminal, or to a new console if
    /// there is none. Streams redirected at the command line are left alone.
    ///
    /// Failures end up in the diagnostics log and are never propagated.
    pub fn initialize(&mut self) {
        let state = RedirectionState::detect(&self.platform);

        // Everything is being redirected at the command line
        if !state.any() {
            return;
        }

        if let Err(err) = self.attach(state) {
            warn!("{}", err);
            let message = format_error(&self.platform, err.code());
            self.diagnostics.write_line(&format!("Failed to initialize console: {}", message));
        }
    }

    fn attach(&mut self, mut state: RedirectionState) -> Result<(), ConsoleError> {
        if self.platform.attach_parent() {
            debug!("Attached to parent console");
        } else if self.platform.alloc() {
            // A fresh console comes with its own working streams
            debug!("No parent console, allocated a new one");
            state = RedirectionState::default();
        } else {
            return Err(ConsoleError::Attach(self.platform.last_error()));
        }

        self.grow_buffer()?;

        if state.stdout {
            self.rebind(StdStream::Output, Buffering::Full(self.config.stdout_buffer));
        }
        if state.stderr {
            self.rebind(StdStream::Error, Buffering::Line(self.config.stderr_buffer));
        }
        Ok(())
    }

    fn grow_buffer(&mut self) -> Result<(), ConsoleError> {
        let output = match self.platform.open_output() {
            Some(output) => output,
            None => return Err(ConsoleError::OpenOutput(self.platform.last_error())),
        };

        let min_lines = self.config.min_buffer_lines;
        match self.platform.buffer_size(&output) {
            Some(size) if size.height < min_lines => {
                let grown = BufferGeometry { height: min_lines, ..size };
                if self.platform.set_buffer_size(&output, grown) {
                    debug!("Console buffer grown from {} to {} lines", size.height, min_lines);
                } else {
                    warn!("Unable to resize console buffer: 0x{:08X}", self.platform.last_error());
                }
            }
            Some(_) => {}
            None => warn!("Unable to read console buffer size: 0x{:08X}", self.platform.last_error()),
        }
        Ok(())
    }

    fn rebind(&mut self, stream: StdStream, buffering: Buffering) {
        if self.platform.reopen(stream, buffering) {
            debug!("Redirected {:?} to console ({:?})", stream, buffering);
        } else {
            warn!("Unable to redirect {:?} to console: 0x{:08X}", stream, self.platform.last_error());
        }
    }
}
