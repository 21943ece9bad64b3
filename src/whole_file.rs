//! Whole-file transfer of typed buffers.
//!
//! Both functions move the entire file in one logical transfer and are
//! all-or-nothing on the read side: a failed read never hands back a
//! partially filled buffer.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use bytemuck::Pod;
use log::trace;

use crate::errors::{MapFileError, Result};
use crate::utils::{effective_length, element_size, to_usize};

/// Read the whole file at `path` as a vector of `T`.
///
/// The result holds `file_size / size_of::<T>()` elements; trailing bytes
/// that do not form a complete element are dropped.
///
/// # Examples
///
/// ```no_run
/// use mapfile_io::read_whole_file;
///
/// let samples: Vec<f32> = read_whole_file("samples.bin")?;
/// # Ok::<(), mapfile_io::MapFileError>(())
/// ```
///
/// # Errors
///
/// Returns `MapFileError::Open` if the file cannot be opened,
/// `MapFileError::SizeQuery` if its size cannot be determined,
/// `MapFileError::ShortTransfer` if the read does not complete and
/// `MapFileError::UnsupportedElement` for zero-sized `T`.
pub fn read_whole_file<T: Pod, P: AsRef<Path>>(path: P) -> Result<Vec<T>> {
    let path = path.as_ref();
    let elem = element_size::<T>()?;
    let mut file = File::open(path).map_err(|source| MapFileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let file_size = file.metadata().map_err(MapFileError::SizeQuery)?.len();
    let byte_len = to_usize(effective_length(file_size, elem))?;

    let mut elements = vec![T::zeroed(); byte_len / elem];
    read_full(&mut file, bytemuck::cast_slice_mut(&mut elements))?;
    trace!(
        "read {} bytes ({} elements) from {}",
        byte_len,
        elements.len(),
        path.display()
    );
    Ok(elements)
}

/// Create or truncate the file at `path` and write `data` to it verbatim.
///
/// The file ends up holding exactly `data.len() * size_of::<T>()` bytes with
/// no header or padding. The write is not atomic: on error the file may be
/// left truncated or partially written.
///
/// # Errors
///
/// Returns `MapFileError::Open` if the file cannot be created and
/// `MapFileError::ShortTransfer` if the write does not complete.
pub fn write_whole_file<T: Pod, P: AsRef<Path>>(path: P, data: &[T]) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path).map_err(|source| MapFileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let bytes: &[u8] = bytemuck::cast_slice(data);
    write_full(&mut file, bytes)?;
    trace!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

// `read_exact`/`write_all` discard the byte count on failure; these keep it.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let expected = buf.len();
    let mut done = 0;
    while done < expected {
        match reader.read(&mut buf[done..]) {
            Ok(0) => return Err(short(expected, done, None)),
            Ok(n) => done += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(short(expected, done, Some(e))),
        }
    }
    Ok(())
}

fn write_full<W: Write>(writer: &mut W, buf: &[u8]) -> Result<()> {
    let expected = buf.len();
    let mut done = 0;
    while done < expected {
        match writer.write(&buf[done..]) {
            Ok(0) => return Err(short(expected, done, None)),
            Ok(n) => done += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(short(expected, done, Some(e))),
        }
    }
    Ok(())
}

fn short(expected: usize, transferred: usize, source: Option<io::Error>) -> MapFileError {
    MapFileError::ShortTransfer {
        expected: expected as u64,
        transferred: transferred as u64,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    struct Full {
        capacity: usize,
    }

    impl Write for Full {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.capacity == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "no space left"));
            }
            let n = buf.len().min(self.capacity);
            self.capacity -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn read_full_collects_partial_reads() {
        let mut src = Trickle { data: b"abcdefgh", step: 3 };
        let mut buf = [0u8; 8];
        read_full(&mut src, &mut buf).unwrap();
        assert_eq!(&buf, b"abcdefgh");
    }

    #[test]
    fn read_full_reports_exhausted_source() {
        let mut src = Trickle { data: b"abc", step: 2 };
        let mut buf = [0u8; 5];
        match read_full(&mut src, &mut buf) {
            Err(MapFileError::ShortTransfer {
                expected,
                transferred,
                source,
            }) => {
                assert_eq!(expected, 5);
                assert_eq!(transferred, 3);
                assert!(source.is_none());
            }
            other => panic!("expected ShortTransfer, got {other:?}"),
        }
    }

    #[test]
    fn write_full_reports_disk_full() {
        let mut sink = Full { capacity: 6 };
        match write_full(&mut sink, &[0u8; 10]) {
            Err(MapFileError::ShortTransfer {
                expected,
                transferred,
                source,
            }) => {
                assert_eq!(expected, 10);
                assert_eq!(transferred, 6);
                assert!(source.is_some());
            }
            other => panic!("expected ShortTransfer, got {other:?}"),
        }
    }
}
