//! C runtime side of the standard streams.
//!
//! Rust's own `stdout()`/`stderr()` write through the Win32 standard handles,
//! C code linked into the process writes through the CRT `FILE`s. Rebinding a
//! stream updates both.

use std::ptr::null_mut;
use log::warn;
use libc::{c_char, c_int, c_uint, FILE};
use winapi::shared::minwindef::{DWORD, TRUE};
use winapi::um::handleapi::INVALID_HANDLE_VALUE;
use winapi::um::processenv::SetStdHandle;
use winapi::um::winbase::{STD_ERROR_HANDLE, STD_OUTPUT_HANDLE};
use winapi::um::winnt::HANDLE;

use crate::attach::{Buffering, StdStream};
use super::handle::CONOUT;

/// `_fileno` result of a stream that was never connected (`_NO_CONSOLE_FILENO`).
pub const NO_CONSOLE_FILENO: c_int = -2;

extern "C" {
    fn __acrt_iob_func(index: c_uint) -> *mut FILE;
}

fn file(stream: StdStream) -> *mut FILE {
    let index = match stream {
        StdStream::Output => 1,
        StdStream::Error => 2,
    };
    unsafe { __acrt_iob_func(index) }
}

fn std_handle_id(stream: StdStream) -> DWORD {
    match stream {
        StdStream::Output => STD_OUTPUT_HANDLE,
        StdStream::Error => STD_ERROR_HANDLE,
    }
}

pub fn is_detached(stream: StdStream) -> bool {
    unsafe { libc::fileno(file(stream)) == NO_CONSOLE_FILENO }
}

pub fn reopen(stream: StdStream, buffering: Buffering) -> bool {
    let file = file(stream);
    let reopened = unsafe {
        libc::freopen(CONOUT.as_ptr() as *const c_char, b"w\0".as_ptr() as *const c_char, file)
    };
    if reopened.is_null() {
        return false;
    }

    // The stream already points at the console, a buffering failure only
    // leaves the CRT default in place.
    let (mode, size) = buffering_mode(buffering);
    if unsafe { libc::setvbuf(file, null_mut(), mode, size) } != 0 {
        warn!("Unable to set {:?} buffering on {:?}", buffering, stream);
    }

    bind_std_handle(stream, file)
}

fn buffering_mode(buffering: Buffering) -> (c_int, usize) {
    match buffering {
        Buffering::Full(size) => (libc::_IOFBF, size),
        Buffering::Line(size) => (libc::_IOLBF, size),
    }
}

/// Points the Win32 standard handle at the CRT descriptor, which keeps owning it.
fn bind_std_handle(stream: StdStream, file: *mut FILE) -> bool {
    let handle = unsafe { libc::get_osfhandle(libc::fileno(file)) } as HANDLE;
    if handle == INVALID_HANDLE_VALUE {
        return false;
    }
    unsafe { SetStdHandle(std_handle_id(stream), handle) == TRUE }
}
