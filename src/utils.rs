//! Size helpers shared by the bulk transfer and mapping code.

use std::io;
use std::mem::size_of;

use crate::errors::{MapFileError, Result};

/// Number of bytes of a `file_size`-byte file that hold whole elements of
/// `element_size` bytes.
///
/// Byte-granular elements (size 0 or 1) never truncate; larger elements drop
/// the trailing partial element.
#[must_use]
pub fn effective_length(file_size: u64, element_size: usize) -> u64 {
    if element_size > 1 {
        file_size - file_size % element_size as u64
    } else {
        file_size
    }
}

/// Size of `T` in bytes, rejecting zero-sized types.
///
/// # Errors
///
/// Returns `MapFileError::UnsupportedElement` if `T` is zero-sized.
pub fn element_size<T>() -> Result<usize> {
    match size_of::<T>() {
        0 => Err(MapFileError::UnsupportedElement),
        n => Ok(n),
    }
}

/// Convert a file size reported by the OS into an in-memory length.
///
/// # Errors
///
/// Returns `MapFileError::SizeQuery` if the size does not fit the address space.
pub fn to_usize(size: u64) -> Result<usize> {
    usize::try_from(size).map_err(|_| {
        MapFileError::SizeQuery(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("file size {size} exceeds the address space"),
        ))
    })
}
