//! Move-only, read-only memory-mapped file handle.

use std::{
    fs::{File, OpenOptions},
    io,
    ops::Deref,
    path::Path,
};

#[cfg(unix)]
use std::os::unix::io::{FromRawFd, OwnedFd, RawFd};

use bytemuck::Pod;
use log::{debug, warn};
use memmap2::{Mmap, MmapOptions};

use crate::errors::{MapFileError, Result};
use crate::utils::{effective_length, element_size, to_usize};

enum State {
    Empty,
    Mapped {
        // `None` for files that were empty at mapping time.
        map: Option<Mmap>,
        file: File,
    },
}

/// Owning handle over an open file and a read-only mapping of its contents.
///
/// A handle is either *empty* (default-constructed or moved out of with
/// [`MappedFile::take`]) or *mapped*, in which case it exclusively owns the
/// descriptor and the mapping. Dropping a mapped handle unmaps the region and
/// then closes the descriptor; failures at that point are logged and
/// swallowed. Use [`MappedFile::close`] to observe them instead.
///
/// The type is deliberately not `Clone`.
///
/// # Examples
///
/// ```no_run
/// use mapfile_io::MappedFile;
///
/// let mapped = MappedFile::open("model.bin")?;
/// let header = &mapped[..16];
/// # let _ = header;
/// # Ok::<(), mapfile_io::MapFileError>(())
/// ```
///
/// The byte view borrows from the handle, so it can never outlive it. Other
/// processes must not modify the file while it is mapped; the view's contents
/// are unspecified if they do.
pub struct MappedFile {
    state: State,
}

impl Default for MappedFile {
    fn default() -> Self {
        Self { state: State::Empty }
    }
}

impl std::fmt::Debug for MappedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedFile")
            .field("open", &self.is_open())
            .field("len", &self.len())
            .finish()
    }
}

impl MappedFile {
    /// Open `path` read-only and map its entire contents.
    ///
    /// An empty file yields a handle with a zero-length view; no mapping is
    /// attempted for it.
    ///
    /// # Errors
    ///
    /// Returns `MapFileError::Open` if the file cannot be opened,
    /// `MapFileError::SizeQuery` if it cannot be stat'ed and
    /// `MapFileError::Map` if the mapping fails. No descriptor is held after
    /// an error.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .open(path_ref)
            .map_err(|source| MapFileError::Open {
                path: path_ref.to_path_buf(),
                source,
            })?;
        debug!("mapping {}", path_ref.display());
        Self::from_file(file)
    }

    /// Take ownership of an already-open, readable file and map it.
    ///
    /// # Errors
    ///
    /// Returns `MapFileError::SizeQuery` or `MapFileError::Map`. The file is
    /// closed before the error is returned.
    pub fn from_file(file: File) -> Result<Self> {
        let map = map_whole(&file)?;
        debug!("mapped {} bytes", map.as_ref().map_or(0, |m| m.len()));
        Ok(Self {
            state: State::Mapped { map, file },
        })
    }

    /// Take ownership of a raw descriptor and map the file behind it.
    ///
    /// # Safety
    ///
    /// `fd` must be an open, readable descriptor that nothing else owns or
    /// closes afterwards.
    ///
    /// # Errors
    ///
    /// Same as [`MappedFile::from_file`]; `fd` is closed on error.
    #[cfg(unix)]
    pub unsafe fn from_raw_fd(fd: RawFd) -> Result<Self> {
        Self::from_file(File::from_raw_fd(fd))
    }

    /// Whether the handle currently owns a descriptor.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Mapped { .. })
    }

    /// The mapped bytes. Empty for empty handles and empty files.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match &self.state {
            State::Mapped { map: Some(map), .. } => &map[..],
            _ => &[],
        }
    }

    /// Length of the mapped view in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Whether the mapped view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// View the mapping as a slice of `T`, dropping any trailing partial
    /// element the same way [`crate::read_whole_file`] does.
    ///
    /// # Errors
    ///
    /// Returns `MapFileError::UnsupportedElement` for zero-sized `T` and
    /// `MapFileError::Layout` if the mapping is not suitably aligned for `T`.
    pub fn as_slice_of<T: Pod>(&self) -> Result<&[T]> {
        let elem = element_size::<T>()?;
        let bytes = self.as_bytes();
        let usable = to_usize(effective_length(bytes.len() as u64, elem))?;
        if usable == 0 {
            return Ok(&[]);
        }
        bytemuck::try_cast_slice(&bytes[..usable]).map_err(MapFileError::Layout)
    }

    /// Move the resource out, leaving this handle empty.
    #[must_use]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Unmap and close, reporting a failing close instead of swallowing it.
    ///
    /// Closing an empty handle is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `MapFileError::Close` if the OS reports an error while closing
    /// the descriptor. The descriptor is released either way.
    pub fn close(mut self) -> Result<()> {
        release(std::mem::replace(&mut self.state, State::Empty)).map_err(MapFileError::Close)
    }
}

impl Drop for MappedFile {
    fn drop(&mut self) {
        if let Err(err) = release(std::mem::replace(&mut self.state, State::Empty)) {
            warn!("failed to release mapped file: {err}");
        }
    }
}

impl Deref for MappedFile {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for MappedFile {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

#[cfg(unix)]
impl TryFrom<OwnedFd> for MappedFile {
    type Error = MapFileError;

    fn try_from(fd: OwnedFd) -> Result<Self> {
        Self::from_file(File::from(fd))
    }
}

fn map_whole(file: &File) -> Result<Option<Mmap>> {
    let len = file.metadata().map_err(MapFileError::SizeQuery)?.len();
    if len == 0 {
        return Ok(None);
    }
    let len = to_usize(len)?;
    // SAFETY: the mapping is read-only and owned alongside `file`; concurrent
    // modification by other writers is outside this type's contract.
    let map = unsafe { MmapOptions::new().len(len).map(file) }.map_err(MapFileError::Map)?;
    Ok(Some(map))
}

fn release(state: State) -> io::Result<()> {
    match state {
        State::Empty => Ok(()),
        State::Mapped { map, file } => {
            let len = map.as_ref().map_or(0, |m| m.len());
            // Unmap strictly before the descriptor goes away.
            drop(map);
            let closed = close_descriptor(file);
            debug!("released mapping of {len} bytes");
            closed
        }
    }
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        fn close_descriptor(file: File) -> io::Result<()> {
            use std::os::unix::io::IntoRawFd;

            let fd = file.into_raw_fd();
            // SAFETY: `fd` came out of an owned `File` and is closed exactly once.
            if unsafe { libc::close(fd) } == 0 {
                Ok(())
            } else {
                Err(io::Error::last_os_error())
            }
        }
    } else {
        fn close_descriptor(file: File) -> io::Result<()> {
            drop(file);
            Ok(())
        }
    }
}
