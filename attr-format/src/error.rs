use std::fmt;
use std::sync::Arc;

use crate::string::ByteString;

pub type Result<T> = std::result::Result<T, Error>;

/// Which part of a dictionary entry was being processed when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPart {
    Name,
    Type,
    Value,
}

impl fmt::Display for EntryPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntryPart::Name => "name",
            EntryPart::Type => "type",
            EntryPart::Value => "value",
        })
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("unexpected end of input: wanted {wanted} bytes, got {got}")]
    ShortRead { wanted: usize, got: usize },

    #[error("short write: wanted {wanted} bytes, wrote {written}")]
    ShortWrite { wanted: usize, written: usize },

    #[error("unknown value type 0x{0:02X}")]
    UnknownType(u8),

    #[error("length {len} does not fit a 32-bit length prefix")]
    TooLong { len: usize },

    #[error(transparent)]
    Io(Arc<std::io::Error>),

    #[error("{field}")]
    Field {
        field: &'static str,
        #[source]
        source: Box<Error>,
    },

    #[error("[{index}]")]
    Index {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("entry {index} ({name:?}) {part}")]
    Entry {
        index: usize,
        name: ByteString,
        part: EntryPart,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Follows the context wrappers down to the error that caused them.
    pub fn root(&self) -> &Error {
        match self {
            Error::Field { source, .. }
            | Error::Index { source, .. }
            | Error::Entry { source, .. } => source.root(),
            e => e,
        }
    }

    #[inline]
    pub fn is_short_read(&self) -> bool {
        matches!(self.root(), Error::ShortRead { .. })
    }

    #[inline]
    pub fn is_unknown_type(&self) -> bool {
        matches!(self.root(), Error::UnknownType(_))
    }

    /// Renders the context path and root cause on one line, e.g.
    /// `entry 0 ("Size") value: Dim2.x: Dim.scale: unexpected end of input: ...`.
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut cur = self;
        while let Error::Field { source, .. }
        | Error::Index { source, .. }
        | Error::Entry { source, .. } = cur
        {
            out.push_str(": ");
            out.push_str(&source.to_string());
            cur = &**source;
        }
        out
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(Arc::new(e))
    }
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> Self {
        use std::io::ErrorKind;

        let kind = match e.root() {
            Error::ShortRead { .. } => ErrorKind::UnexpectedEof,
            Error::ShortWrite { .. } => ErrorKind::WriteZero,
            Error::Io(io) => io.kind(),
            _ => ErrorKind::InvalidData,
        };
        std::io::Error::new(kind, e)
    }
}

/// Attaches positional context to a failed codec step.
pub(crate) trait Context<T> {
    fn field(self, field: &'static str) -> Result<T>;
    fn index(self, index: usize) -> Result<T>;
    fn entry(self, index: usize, name: &ByteString, part: EntryPart) -> Result<T>;
}

impl<T> Context<T> for Result<T> {
    #[inline]
    fn field(self, field: &'static str) -> Result<T> {
        self.map_err(|e| Error::Field {
            field,
            source: Box::new(e),
        })
    }

    #[inline]
    fn index(self, index: usize) -> Result<T> {
        self.map_err(|e| Error::Index {
            index,
            source: Box::new(e),
        })
    }

    #[inline]
    fn entry(self, index: usize, name: &ByteString, part: EntryPart) -> Result<T> {
        self.map_err(|e| Error::Entry {
            index,
            name: name.clone(),
            part,
            source: Box::new(e),
        })
    }
}
