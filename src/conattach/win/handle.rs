use std::ptr::null_mut;
use winapi::shared::minwindef::TRUE;
use winapi::um::fileapi::{CreateFileA, OPEN_EXISTING};
use winapi::um::handleapi::{CloseHandle, INVALID_HANDLE_VALUE};
use winapi::um::wincon::{CONSOLE_SCREEN_BUFFER_INFO, GetConsoleScreenBufferInfo, SetConsoleScreenBufferSize};
use winapi::um::wincontypes::COORD;
use winapi::um::winnt::{FILE_SHARE_READ, FILE_SHARE_WRITE, GENERIC_READ, GENERIC_WRITE, HANDLE};

use crate::attach::BufferGeometry;

pub(crate) const CONOUT: &[u8] = b"CONOUT$\0";

/// Owned handle to the active console screen buffer, closed on drop.
pub struct ConsoleHandle {
    inner: HANDLE
}

impl ConsoleHandle {
    pub fn open_output() -> Option<ConsoleHandle> {
        let inner = unsafe {
            CreateFileA(
                CONOUT.as_ptr() as _,
                GENERIC_READ | GENERIC_WRITE,
                FILE_SHARE_READ | FILE_SHARE_WRITE,
                null_mut(),
                OPEN_EXISTING,
                0,
                null_mut()
            )
        };
        if inner == INVALID_HANDLE_VALUE {
            None
        } else {
            Some(ConsoleHandle { inner })
        }
    }

    pub fn get_screen_buffer_size(&self) -> Option<BufferGeometry> {
        let mut info: CONSOLE_SCREEN_BUFFER_INFO = unsafe { std::mem::zeroed() };
        if unsafe { GetConsoleScreenBufferInfo(self.inner, &mut info) } == TRUE {
            Some(BufferGeometry { width: info.dwSize.X, height: info.dwSize.Y })
        } else {
            None
        }
    }

    pub fn set_screen_buffer_size(&self, size: BufferGeometry) -> bool {
        let size = COORD { X: size.width, Y: size.height };
        unsafe { SetConsoleScreenBufferSize(self.inner, size) == TRUE }
    }
}

impl Drop for ConsoleHandle {
    fn drop(&mut self) {
        unsafe { CloseHandle(self.inner) };
    }
}
