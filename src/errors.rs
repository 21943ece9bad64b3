//! Crate-specific error types for mapfile-io.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for mapfile-io operations.
pub type Result<T> = std::result::Result<T, MapFileError>;

/// Error type covering opening, sizing, mapping and transfer failures.
///
/// Every variant is reported after any resource acquired by the failing
/// operation has already been released.
#[derive(Debug, Error)]
pub enum MapFileError {
    /// The path could not be opened (not found, permission denied, ...).
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        /// Path passed by the caller.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The size of the file could not be determined.
    #[error("cannot query file size: {0}")]
    SizeQuery(#[source] io::Error),

    /// The OS rejected the mapping call.
    #[error("mapping failed: {0}")]
    Map(#[source] io::Error),

    /// A read or write moved fewer bytes than requested.
    #[error("short transfer: {transferred} of {expected} bytes")]
    ShortTransfer {
        /// Bytes the operation had to move.
        expected: u64,
        /// Bytes actually moved before it stopped.
        transferred: u64,
        /// OS error that ended the transfer, if any.
        #[source]
        source: Option<io::Error>,
    },

    /// Closing the descriptor failed during an explicit `close`.
    #[error("close failed: {0}")]
    Close(#[source] io::Error),

    /// The element type has no size and cannot describe file contents.
    #[error("zero-sized element types cannot be read from a file")]
    UnsupportedElement,

    /// The mapped bytes cannot be reinterpreted as the requested element type.
    #[error("mapped bytes cannot be viewed as the requested type: {0:?}")]
    Layout(bytemuck::PodCastError),

    /// Error when an access-advice hint is rejected.
    #[error("advice operation failed: {0}")]
    AdviceFailed(String),
}
