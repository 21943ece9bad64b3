//! # mapfile-io: whole-file buffers and read-only memory-mapped files
//!
//! This crate provides two small file-access primitives:
//!
//! - **Whole-file transfer**: [`read_whole_file`] and [`write_whole_file`] move
//!   a typed buffer of plain-old-data elements to or from a file in one go.
//! - **Mapped files**: [`MappedFile`] is a move-only handle owning an open
//!   descriptor and a read-only mapping of the file, exposed as `&[u8]`.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mapfile_io::{read_whole_file, write_whole_file, MappedFile};
//!
//! write_whole_file("t.bin", &[1u8, 2, 3, 4])?;
//!
//! let words: Vec<u16> = read_whole_file("t.bin")?;
//! assert_eq!(words.len(), 2);
//!
//! let mapped = MappedFile::open("t.bin")?;
//! assert_eq!(&mapped[..], &[1, 2, 3, 4]);
//! # Ok::<(), mapfile_io::MapFileError>(())
//! ```
//!
//! ## Modules
//!
//! - [`errors`]: Error type shared by all operations
//! - [`utils`]: Truncation policy and size helpers
//! - [`whole_file`]: Whole-file typed reads and writes
//! - [`mapped`]: The `MappedFile` handle
//!
//! ## Feature Flags
//!
//! - `advise` (default): `MappedFile::advise` access hints

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(missing_docs)]

pub mod errors;
pub mod utils;
pub mod whole_file;
pub mod mapped;

#[cfg(feature = "advise")]
pub mod advise;

pub use errors::{MapFileError, Result};
pub use mapped::MappedFile;
pub use whole_file::{read_whole_file, write_whole_file};

#[cfg(feature = "advise")]
pub use advise::MapAdvice;
