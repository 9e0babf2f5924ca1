#[cfg(feature = "reader")]
use std::io::Read;
#[cfg(feature = "writer")]
use std::io::Write;

#[cfg(feature = "reader")]
use crate::{counting::CountingReader, de::Decode};
#[cfg(feature = "writer")]
use crate::{counting::CountingWriter, ser::Encode};
use crate::{Dictionary, Error};

/// A decode or encode failure, with the number of bytes transferred before it.
#[derive(Debug, Clone, thiserror::Error)]
#[error("attribute format error after {bytes} bytes")]
pub struct ModelError {
    pub bytes: u64,
    #[source]
    pub source: Error,
}

impl From<ModelError> for std::io::Error {
    fn from(e: ModelError) -> Self {
        let kind = std::io::Error::from(e.source.clone()).kind();
        std::io::Error::new(kind, e)
    }
}

/// Root of an encoded attribute blob: a single dictionary, no header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub value: Dictionary,
}

impl Model {
    pub fn new(value: Dictionary) -> Model {
        Model { value }
    }

    /// Decode a model from `reader`, returning it with the number of bytes
    /// consumed. Bytes after the dictionary are left unread.
    #[cfg(feature = "reader")]
    pub fn read_from<R: Read>(reader: R) -> Result<(Model, u64), ModelError> {
        let mut reader = CountingReader::new(reader);
        match Dictionary::decode(&mut reader) {
            Ok(value) => {
                let bytes = reader.bytes_read();
                tracing::debug!(bytes, entries = value.len(), "decoded attributes");
                Ok((Model { value }, bytes))
            }
            Err(source) => Err(ModelError {
                bytes: reader.bytes_read(),
                source,
            }),
        }
    }

    /// Encode this model into `writer`, returning the number of bytes written.
    #[cfg(feature = "writer")]
    pub fn write_to<W: Write>(&self, writer: W) -> Result<u64, ModelError> {
        let mut writer = CountingWriter::new(writer);
        match self.value.encode(&mut writer) {
            Ok(()) => {
                let bytes = writer.bytes_written();
                tracing::debug!(bytes, entries = self.value.len(), "encoded attributes");
                Ok(bytes)
            }
            Err(source) => Err(ModelError {
                bytes: writer.bytes_written(),
                source,
            }),
        }
    }

    #[cfg(feature = "reader")]
    pub fn from_slice(data: &[u8]) -> Result<(Model, u64), ModelError> {
        Model::read_from(data)
    }

    #[cfg(feature = "writer")]
    pub fn to_vec(&self) -> Result<Vec<u8>, ModelError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }
}

impl From<Dictionary> for Model {
    fn from(value: Dictionary) -> Self {
        Model { value }
    }
}

/// Decode an attribute blob. See [`Model::read_from`].
#[cfg(feature = "reader")]
pub fn decode<R: Read>(reader: R) -> Result<(Model, u64), ModelError> {
    Model::read_from(reader)
}

/// Encode an attribute blob. See [`Model::write_to`].
#[cfg(feature = "writer")]
pub fn encode<W: Write>(model: &Model, writer: W) -> Result<u64, ModelError> {
    model.write_to(writer)
}

#[cfg(all(test, feature = "writer"))]
mod tests {
    use super::*;
    use crate::{Dim, Dim2, Value};

    const SIZE_AND_POSITION: [u8; 58] = [
        0x02, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x53, 0x69, 0x7a, 0x65, 0x0a, 0x00, 0x00,
        0x00, 0x3f, 0x64, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x3f, 0x64, 0x00, 0x00, 0x00, 0x08,
        0x00, 0x00, 0x00, 0x50, 0x6f, 0x73, 0x69, 0x74, 0x69, 0x6f, 0x6e, 0x0a, 0x00, 0x00, 0x80,
        0x3e, 0xce, 0xff, 0xff, 0xff, 0x00, 0x00, 0x80, 0x3e, 0xce, 0xff, 0xff, 0xff,
    ];

    fn size_and_position() -> Model {
        let dim2 = |scale, offset| {
            Value::Dim2(Dim2 {
                x: Dim { scale, offset },
                y: Dim { scale, offset },
            })
        };
        Model::new(
            vec![("Size", dim2(0.5, 100)), ("Position", dim2(0.25, -50))]
                .into_iter()
                .collect(),
        )
    }

    #[test]
    fn read_from_counts_bytes() {
        let (model, n) = decode(&SIZE_AND_POSITION[..]).unwrap();
        assert_eq!(n, 58);
        assert_eq!(model, size_and_position());
    }

    #[test]
    fn write_to_reproduces_bytes() {
        let mut buf = Vec::new();
        let n = encode(&size_and_position(), &mut buf).unwrap();
        assert_eq!(n, 58);
        assert_eq!(buf, &SIZE_AND_POSITION[..]);
    }

    #[test]
    fn trailing_bytes_are_not_consumed() {
        let mut data = SIZE_AND_POSITION.to_vec();
        data.extend_from_slice(b"trailing");
        let (_, n) = Model::from_slice(&data).unwrap();
        assert_eq!(n, 58);
    }

    #[test]
    fn error_reports_progress() {
        let err = Model::from_slice(&SIZE_AND_POSITION[..30]).unwrap_err();
        assert_eq!(err.bytes, 30);
        assert!(err.source.is_short_read());

        let io: std::io::Error = err.into();
        assert_eq!(io.kind(), std::io::ErrorKind::UnexpectedEof);
    }
}
