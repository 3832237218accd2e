use std::ptr::{null, null_mut};
use winapi::shared::minwindef::{DWORD, FALSE, HLOCAL};
use winapi::um::consoleapi::AllocConsole;
use winapi::um::errhandlingapi::GetLastError;
use winapi::um::winbase::{
    FORMAT_MESSAGE_ALLOCATE_BUFFER, FORMAT_MESSAGE_FROM_SYSTEM, FORMAT_MESSAGE_IGNORE_INSERTS,
    FormatMessageA, LocalFree,
};
use winapi::um::wincon::{ATTACH_PARENT_PROCESS, AttachConsole};
use winapi::um::winnt::{LANG_NEUTRAL, LPSTR, MAKELANGID, SUBLANG_DEFAULT};

use crate::attach::{BufferGeometry, Buffering, ConsolePlatform, StdStream};

pub mod crt;
pub mod handle;

pub use handle::ConsoleHandle;

/// The process's real console, as seen through kernel32 and the C runtime.
#[derive(Clone, Copy, Debug, Default)]
pub struct WinConsole;

impl ConsolePlatform for WinConsole {
    type Output = ConsoleHandle;

    fn is_detached(&self, stream: StdStream) -> bool {
        crt::is_detached(stream)
    }

    fn attach_parent(&mut self) -> bool {
        unsafe { AttachConsole(ATTACH_PARENT_PROCESS) != FALSE }
    }

    fn alloc(&mut self) -> bool {
        unsafe { AllocConsole() != FALSE }
    }

    fn open_output(&mut self) -> Option<ConsoleHandle> {
        ConsoleHandle::open_output()
    }

    fn buffer_size(&self, output: &ConsoleHandle) -> Option<BufferGeometry> {
        output.get_screen_buffer_size()
    }

    fn set_buffer_size(&mut self, output: &ConsoleHandle, size: BufferGeometry) -> bool {
        output.set_screen_buffer_size(size)
    }

    fn reopen(&mut self, stream: StdStream, buffering: Buffering) -> bool {
        crt::reopen(stream, buffering)
    }

    fn last_error(&self) -> u32 {
        unsafe { GetLastError() }
    }

    fn format_message(&self, code: u32) -> Option<String> {
        format_message(code)
    }
}

/// System message table text for `code`, exactly as the system returns it.
pub fn format_message(code: DWORD) -> Option<String> {
    let mut buffer: LPSTR = null_mut();
    let len = unsafe {
        FormatMessageA(
            FORMAT_MESSAGE_ALLOCATE_BUFFER | FORMAT_MESSAGE_FROM_SYSTEM | FORMAT_MESSAGE_IGNORE_INSERTS,
            null(),
            code,
            MAKELANGID(LANG_NEUTRAL, SUBLANG_DEFAULT) as DWORD,
            (&mut buffer as *mut LPSTR) as LPSTR,
            0,
            null_mut()
        )
    };
    if buffer.is_null() {
        return None;
    }
    let message = unsafe {
        let bytes = std::slice::from_raw_parts(buffer as *const u8, len as usize);
        let message = String::from_utf8_lossy(bytes).into_owned();
        LocalFree(buffer as HLOCAL);
        message
    };
    Some(message)
}
