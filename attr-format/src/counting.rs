//! Counting reader and writer wrappers for tracking bytes transferred.
//!
//! Both adapters latch the first error they see: every operation after a
//! failure returns that same error and transfers nothing, so a caller may
//! chain several steps and only inspect the outcome at the end.

use std::convert::TryFrom;
use std::io::{ErrorKind, Read, Write};

use crate::error::{Error, Result};
use crate::primitive::Number;
use crate::string::ByteString;

/// Upper bound on capacity reserved from an untrusted length prefix.
pub(crate) const MAX_PREALLOC: usize = 4096;

const CHUNK_SIZE: usize = 8192;

/// A reader wrapper that counts bytes read through it.
#[derive(Debug)]
pub struct CountingReader<R> {
    inner: R,
    bytes_read: u64,
    failure: Option<Error>,
}

impl<R> CountingReader<R> {
    /// Create a new counting reader wrapping the given reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bytes_read: 0,
            failure: None,
        }
    }

    /// Get the total number of bytes successfully read through this reader.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// The first error this reader encountered, if any.
    pub fn failure(&self) -> Option<&Error> {
        self.failure.as_ref()
    }

    /// Total bytes read, or the latched error.
    pub fn finish(&self) -> Result<u64> {
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(self.bytes_read),
        }
    }

    /// Consume this wrapper and return the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn latch<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.failure = Some(e.clone());
        }
        result
    }
}

impl<R: Read> CountingReader<R> {
    /// Read exactly `buf.len()` bytes.
    pub fn bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        self.check()?;
        let result = self.fill(buf);
        self.latch(result)
    }

    /// Read a fixed-width little-endian number.
    pub fn number<T: Number>(&mut self) -> Result<T> {
        let mut buf = [0u8; 8];
        let buf = &mut buf[..T::WIDTH];
        self.bytes(buf)?;
        Ok(T::read_le(buf))
    }

    /// Read a 32-bit length prefix followed by that many bytes.
    pub fn string(&mut self) -> Result<ByteString> {
        let len = self.number::<u32>()? as usize;
        self.byte_vec(len).map(ByteString::from)
    }

    /// Read `len` bytes into a new vector without trusting `len` for the
    /// initial allocation.
    pub fn byte_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        self.check()?;
        let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
        let mut got = 0;
        while got < len {
            let step = (len - got).min(CHUNK_SIZE);
            buf.resize(got + step, 0);
            let result = match self.fill(&mut buf[got..]) {
                Err(Error::ShortRead { got: partial, .. }) => Err(Error::ShortRead {
                    wanted: len,
                    got: got + partial,
                }),
                other => other,
            };
            self.latch(result)?;
            got += step;
        }
        Ok(buf)
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        let wanted = buf.len();
        let mut got = 0;
        while got < wanted {
            match self.inner.read(&mut buf[got..]) {
                Ok(0) => return Err(Error::ShortRead { wanted, got }),
                Ok(n) => {
                    got += n;
                    self.bytes_read += n as u64;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.check()?;
        match self.inner.read(buf) {
            Ok(n) => {
                self.bytes_read += n as u64;
                Ok(n)
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => Err(e),
            Err(e) => {
                let e = Error::from(e);
                self.failure = Some(e.clone());
                Err(e.into())
            }
        }
    }
}

/// A writer wrapper that counts bytes written through it.
#[derive(Debug)]
pub struct CountingWriter<W> {
    inner: W,
    bytes_written: u64,
    failure: Option<Error>,
}

impl<W> CountingWriter<W> {
    /// Create a new counting writer wrapping the given writer.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bytes_written: 0,
            failure: None,
        }
    }

    /// Get the total number of bytes written through this writer.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// The first error this writer encountered, if any.
    pub fn failure(&self) -> Option<&Error> {
        self.failure.as_ref()
    }

    /// Total bytes written, or the latched error.
    pub fn finish(&self) -> Result<u64> {
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(self.bytes_written),
        }
    }

    /// Consume this wrapper and return the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn latch<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.failure = Some(e.clone());
        }
        result
    }
}

impl<W: Write> CountingWriter<W> {
    /// Write all of `buf`.
    pub fn bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.check()?;
        let result = self.drain(buf);
        self.latch(result)
    }

    /// Write a fixed-width little-endian number.
    pub fn number<T: Number>(&mut self, value: T) -> Result<()> {
        let mut buf = [0u8; 8];
        let buf = &mut buf[..T::WIDTH];
        value.write_le(buf);
        self.bytes(buf)
    }

    /// Write a 32-bit length or element count.
    pub fn length(&mut self, len: usize) -> Result<()> {
        self.check()?;
        let result = u32::try_from(len).map_err(|_| Error::TooLong { len });
        let len = self.latch(result)?;
        self.number(len)
    }

    /// Write a 32-bit length prefix followed by `s`.
    pub fn string(&mut self, s: &[u8]) -> Result<()> {
        self.length(s.len())?;
        self.bytes(s)
    }

    fn drain(&mut self, buf: &[u8]) -> Result<()> {
        let wanted = buf.len();
        let mut written = 0;
        while written < wanted {
            match self.inner.write(&buf[written..]) {
                Ok(0) => return Err(Error::ShortWrite { wanted, written }),
                Ok(n) => {
                    written += n;
                    self.bytes_written += n as u64;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.check()?;
        match self.inner.write(buf) {
            Ok(n) => {
                self.bytes_written += n as u64;
                Ok(n)
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => Err(e),
            Err(e) => {
                let e = Error::from(e);
                self.failure = Some(e.clone());
                Err(e.into())
            }
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.check()?;
        let result = self.inner.flush().map_err(Error::from);
        self.latch(result).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts at most `limit` bytes, then reports a full sink.
    struct Limited {
        buf: Vec<u8>,
        limit: usize,
    }

    impl Write for Limited {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let n = buf.len().min(self.limit - self.buf.len());
            self.buf.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_counting_writer() {
        let mut buf = Vec::new();
        let mut writer = CountingWriter::new(&mut buf);

        writer.bytes(b"hello").unwrap();
        assert_eq!(writer.bytes_written(), 5);

        writer.string(b" world").unwrap();
        assert_eq!(writer.bytes_written(), 15);

        writer.number(0x0102_0304u32).unwrap();
        assert_eq!(writer.finish().unwrap(), 19);
        assert_eq!(
            writer.into_inner().as_slice(),
            b"hello\x06\0\0\0 world\x04\x03\x02\x01"
        );
    }

    #[test]
    fn test_counting_reader() {
        let data = b"\x05\0\0\0hello\xff\x00\x80\x3f";
        let mut reader = CountingReader::new(&data[..]);

        assert_eq!(reader.string().unwrap(), "hello");
        assert_eq!(reader.bytes_read(), 9);
        assert_eq!(reader.number::<i8>().unwrap(), -1);
        assert_eq!(reader.number::<u8>().unwrap(), 0);
        assert_eq!(reader.number::<u16>().unwrap(), 0x3f80);
        assert_eq!(reader.finish().unwrap(), data.len() as u64);
    }

    #[test]
    fn short_read_is_latched() {
        let data = [1u8, 2, 3];
        let mut reader = CountingReader::new(&data[..]);

        let err = reader.number::<u32>().unwrap_err();
        assert!(matches!(err, Error::ShortRead { wanted: 4, got: 3 }));
        assert_eq!(reader.bytes_read(), 3);

        // Later operations do nothing and report the first failure.
        let err = reader.number::<u8>().unwrap_err();
        assert!(matches!(err, Error::ShortRead { wanted: 4, got: 3 }));
        assert!(reader.string().is_err());
        assert_eq!(reader.bytes_read(), 3);
        assert!(reader.finish().is_err());
    }

    #[test]
    fn short_string_reports_total_length() {
        let data = b"\x0a\0\0\0abc";
        let mut reader = CountingReader::new(&data[..]);

        let err = reader.string().unwrap_err();
        assert!(matches!(err, Error::ShortRead { wanted: 10, got: 3 }));
        assert_eq!(reader.bytes_read(), 7);
    }

    #[test]
    fn huge_length_prefix_fails_without_allocating() {
        let data = b"\xff\xff\xff\xffab";
        let mut reader = CountingReader::new(&data[..]);

        let err = reader.string().unwrap_err();
        assert!(matches!(
            err,
            Error::ShortRead {
                wanted: 0xffff_ffff,
                got: 2
            }
        ));
    }

    #[test]
    fn non_utf8_string_is_kept() {
        let data = b"\x02\0\0\0\xc3\x28";
        let mut reader = CountingReader::new(&data[..]);
        let s = reader.string().unwrap();
        assert_eq!(s.as_bytes(), b"\xc3\x28");
        assert_eq!(reader.bytes_read(), 6);

        let mut writer = CountingWriter::new(Vec::new());
        writer.string(&s).unwrap();
        assert_eq!(writer.into_inner(), &data[..]);
    }

    #[test]
    fn short_write_is_latched() {
        let mut writer = CountingWriter::new(Limited {
            buf: Vec::new(),
            limit: 6,
        });

        writer.number(7u32).unwrap();
        let err = writer.number(8u32).unwrap_err();
        assert!(matches!(
            err,
            Error::ShortWrite {
                wanted: 4,
                written: 2
            }
        ));
        assert_eq!(writer.bytes_written(), 6);

        assert!(writer.bytes(b"x").is_err());
        assert_eq!(writer.bytes_written(), 6);
        assert_eq!(writer.into_inner().buf, vec![7, 0, 0, 0, 8, 0]);
    }

    /// Fails the first read, then serves `data`.
    struct FlakyReader {
        failed: bool,
        data: &'static [u8],
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.failed {
                self.failed = true;
                return Err(std::io::Error::new(ErrorKind::ConnectionReset, "reset"));
            }
            self.data.read(buf)
        }
    }

    #[test]
    fn io_read_error_is_latched() {
        let mut reader = CountingReader::new(FlakyReader {
            failed: false,
            data: b"abcd",
        });
        let mut buf = [0u8; 4];

        let err = reader.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConnectionReset);

        // The inner reader would succeed now, but the adapter stays failed.
        let err = reader.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConnectionReset);
        assert!(matches!(reader.failure(), Some(Error::Io(_))));
        assert!(reader.number::<u8>().is_err());
        assert_eq!(reader.bytes_read(), 0);
    }

    #[test]
    fn io_write_error_is_latched() {
        struct FlakyWriter {
            failed: bool,
            buf: Vec<u8>,
        }

        impl Write for FlakyWriter {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                if !self.failed {
                    self.failed = true;
                    return Err(std::io::Error::new(ErrorKind::BrokenPipe, "pipe"));
                }
                self.buf.write(buf)
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = CountingWriter::new(FlakyWriter {
            failed: false,
            buf: Vec::new(),
        });

        assert_eq!(writer.write(b"ab").unwrap_err().kind(), ErrorKind::BrokenPipe);
        assert_eq!(writer.write(b"ab").unwrap_err().kind(), ErrorKind::BrokenPipe);
        assert!(writer.flush().is_err());
        assert!(writer.finish().is_err());
        assert_eq!(writer.bytes_written(), 0);
        assert!(writer.into_inner().buf.is_empty());
    }

    #[test]
    fn io_errors_propagate() {
        struct Broken;

        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(ErrorKind::PermissionDenied, "nope"))
            }
        }

        let mut reader = CountingReader::new(Broken);
        match reader.number::<u8>() {
            Err(Error::Io(e)) => assert_eq!(e.kind(), ErrorKind::PermissionDenied),
            other => panic!("unexpected {:?}", other),
        }
    }
}
