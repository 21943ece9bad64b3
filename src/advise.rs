//! Access-pattern hints for mapped files.

use crate::errors::{MapFileError, Result};
use crate::mapped::MappedFile;

/// Memory access pattern advice for the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapAdvice {
    /// Normal access pattern (default).
    Normal,
    /// Random access pattern.
    Random,
    /// Sequential access pattern.
    Sequential,
    /// Will need the mapping soon.
    WillNeed,
    /// Won't need the mapping soon; pages are re-read from the file on access.
    DontNeed,
}

impl MappedFile {
    /// Advise the OS about how the whole mapping will be read.
    ///
    /// The advice is a hint and may be ignored. Empty handles, empty files
    /// and non-Unix targets accept any advice without doing anything.
    ///
    /// # Errors
    ///
    /// Returns `MapFileError::AdviceFailed` if the system call fails.
    pub fn advise(&self, advice: MapAdvice) -> Result<()> {
        let bytes = self.as_bytes();
        if bytes.is_empty() {
            return Ok(());
        }

        #[cfg(unix)]
        {
            use libc::{madvise, MADV_DONTNEED, MADV_NORMAL, MADV_RANDOM, MADV_SEQUENTIAL, MADV_WILLNEED};

            let advice_flag = match advice {
                MapAdvice::Normal => MADV_NORMAL,
                MapAdvice::Random => MADV_RANDOM,
                MapAdvice::Sequential => MADV_SEQUENTIAL,
                MapAdvice::WillNeed => MADV_WILLNEED,
                MapAdvice::DontNeed => MADV_DONTNEED,
            };

            // SAFETY: the range is exactly the live, page-aligned mapping.
            let result = unsafe { madvise(bytes.as_ptr() as *mut libc::c_void, bytes.len(), advice_flag) };

            if result != 0 {
                let err = std::io::Error::last_os_error();
                return Err(MapFileError::AdviceFailed(format!("madvise failed: {err}")));
            }
        }

        #[cfg(not(unix))]
        {
            let _ = advice;
        }

        Ok(())
    }
}
