//! Minimal streaming contract shared with collaborator codecs.
//!
//! Codecs in this crate work on whole in-memory buffers. Anything that
//! supplies or consumes bytes incrementally (files, sockets, external
//! decoders) talks to the crate through [`ByteSource`] and [`ByteSink`];
//! [`read_all`] and [`crate::decode_from_source`] bridge the two worlds.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::DecodeError;
use crate::limits::Limits;

const READ_CHUNK: usize = 8 * 1024;

/// Errors raised by stream implementations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StreamError {
    #[error("stream does not support {0}")]
    Unsupported(&'static str),

    #[error("seek to {0} is out of range")]
    OutOfRange(i128),

    #[error("source reported {reported} bytes read into a {capacity}-byte buffer")]
    InvalidRead { reported: usize, capacity: usize },

    #[error("sink accepted zero bytes")]
    WriteZero,

    #[error("I/O error: {0}")]
    Io(String),
}

#[cfg(feature = "std")]
impl From<std::io::Error> for StreamError {
    fn from(e: std::io::Error) -> Self {
        StreamError::Io(alloc::string::ToString::to_string(&e))
    }
}

/// Seek origin, mirroring `std::io::SeekFrom` for `no_std` builds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeekFrom {
    Start(u64),
    End(i64),
    Current(i64),
}

/// A readable byte stream.
///
/// Only [`read`](ByteSource::read) is required. Sources that can report
/// their size should implement [`total_length`](ByteSource::total_length)
/// so that [`read_all`] can allocate once.
pub trait ByteSource {
    /// Read up to `buf.len()` bytes, returning how many were read. Zero means
    /// end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StreamError>;

    fn seek(&mut self, _pos: SeekFrom) -> Result<u64, StreamError> {
        Err(StreamError::Unsupported("seek"))
    }

    fn tell(&mut self) -> Result<u64, StreamError> {
        Err(StreamError::Unsupported("tell"))
    }

    /// Total stream length in bytes, if known.
    fn total_length(&mut self) -> Option<u64> {
        None
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        (**self).read(buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, StreamError> {
        (**self).seek(pos)
    }

    fn tell(&mut self) -> Result<u64, StreamError> {
        (**self).tell()
    }

    fn total_length(&mut self) -> Option<u64> {
        (**self).total_length()
    }
}

/// A writable byte stream.
pub trait ByteSink {
    /// Write up to `buf.len()` bytes, returning how many were accepted.
    fn write(&mut self, buf: &[u8]) -> Result<usize, StreamError>;

    fn write_all(&mut self, mut buf: &[u8]) -> Result<(), StreamError> {
        while !buf.is_empty() {
            let n = self.write(buf)?;
            if n == 0 {
                return Err(StreamError::WriteZero);
            }
            buf = buf.get(n..).unwrap_or_default();
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StreamError> {
        Ok(())
    }
}

impl ByteSink for Vec<u8> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, StreamError> {
        self.extend_from_slice(buf);
        Ok(buf.len())
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write(&mut self, buf: &[u8]) -> Result<usize, StreamError> {
        (**self).write(buf)
    }

    fn flush(&mut self) -> Result<(), StreamError> {
        (**self).flush()
    }
}

/// Seekable source over a borrowed byte slice.
#[derive(Clone, Debug)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes not yet read.
    pub fn remaining(&self) -> &'a [u8] {
        self.data.get(self.pos..).unwrap_or_default()
    }
}

impl ByteSource for SliceSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        let rest = self.remaining();
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, StreamError> {
        let target: i128 = match pos {
            SeekFrom::Start(p) => i128::from(p),
            SeekFrom::End(d) => self.data.len() as i128 + i128::from(d),
            SeekFrom::Current(d) => self.pos as i128 + i128::from(d),
        };
        if target < 0 || target > self.data.len() as i128 {
            return Err(StreamError::OutOfRange(target));
        }
        self.pos = target as usize;
        Ok(self.pos as u64)
    }

    fn tell(&mut self) -> Result<u64, StreamError> {
        Ok(self.pos as u64)
    }

    fn total_length(&mut self) -> Option<u64> {
        Some(self.data.len() as u64)
    }
}

/// Adapter exposing a `std::io` reader as a [`ByteSource`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSource<R>(pub R);

#[cfg(feature = "std")]
impl<R: std::io::Read + std::io::Seek> ByteSource for IoSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        loop {
            match self.0.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, StreamError> {
        let pos = match pos {
            SeekFrom::Start(p) => std::io::SeekFrom::Start(p),
            SeekFrom::End(d) => std::io::SeekFrom::End(d),
            SeekFrom::Current(d) => std::io::SeekFrom::Current(d),
        };
        Ok(self.0.seek(pos)?)
    }

    fn tell(&mut self) -> Result<u64, StreamError> {
        Ok(self.0.stream_position()?)
    }

    fn total_length(&mut self) -> Option<u64> {
        let current = self.0.stream_position().ok()?;
        let end = self.0.seek(std::io::SeekFrom::End(0)).ok()?;
        self.0.seek(std::io::SeekFrom::Start(current)).ok()?;
        Some(end)
    }
}

/// Adapter exposing a `std::io` writer as a [`ByteSink`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSink<W>(pub W);

#[cfg(feature = "std")]
impl<W: std::io::Write> ByteSink for IoSink<W> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, StreamError> {
        Ok(self.0.write(buf)?)
    }

    fn flush(&mut self) -> Result<(), StreamError> {
        Ok(self.0.flush()?)
    }
}

/// Drain `source` into a freshly allocated buffer.
///
/// Honors [`Limits::max_input_bytes`] both up front (when the source knows
/// its length) and while reading.
pub fn read_all<S: ByteSource + ?Sized>(
    source: &mut S,
    limits: Option<&Limits>,
) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::new();

    if let Some(total) = source.total_length() {
        let remaining = match source.tell() {
            Ok(pos) => total.saturating_sub(pos),
            Err(_) => total,
        };
        if let Some(limits) = limits {
            limits.check_input(remaining)?;
        }
        let hint = usize::try_from(remaining).map_err(|_| DecodeError::OutOfMemory(usize::MAX))?;
        out.try_reserve_exact(hint)
            .map_err(|_| DecodeError::OutOfMemory(hint))?;
    }

    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let n = source.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        let filled = chunk.get(..n).ok_or(StreamError::InvalidRead {
            reported: n,
            capacity: READ_CHUNK,
        })?;
        let new_len = out.len().saturating_add(n);
        if let Some(limits) = limits {
            limits.check_input(new_len as u64)?;
        }
        out.try_reserve(n)
            .map_err(|_| DecodeError::OutOfMemory(new_len))?;
        out.extend_from_slice(filled);
    }

    log::trace!("drained {} bytes from source", out.len());
    Ok(out)
}
