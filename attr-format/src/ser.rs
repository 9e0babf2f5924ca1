use std::io::Write;

use crate::counting::CountingWriter;
use crate::error::{Context, EntryPart, Result};
use crate::{
    Color3, ColorKeypoint, Dictionary, Dim, Dim2, Entry, NumberKeypoint, NumberRange, Rect, Value,
    Vector2, Vector3,
};

/// A type that can be encoded into the attribute format.
pub trait Encode {
    fn encode<W: Write>(&self, writer: &mut CountingWriter<W>) -> Result<()>;
}

impl Encode for Dim {
    fn encode<W: Write>(&self, writer: &mut CountingWriter<W>) -> Result<()> {
        self.scale.encode(writer).field("Dim.scale")?;
        self.offset.encode(writer).field("Dim.offset")
    }
}

impl Encode for Dim2 {
    fn encode<W: Write>(&self, writer: &mut CountingWriter<W>) -> Result<()> {
        self.x.encode(writer).field("Dim2.x")?;
        self.y.encode(writer).field("Dim2.y")
    }
}

impl Encode for Color3 {
    fn encode<W: Write>(&self, writer: &mut CountingWriter<W>) -> Result<()> {
        self.r.encode(writer).field("Color3.r")?;
        self.g.encode(writer).field("Color3.g")?;
        self.b.encode(writer).field("Color3.b")
    }
}

impl Encode for Vector2 {
    fn encode<W: Write>(&self, writer: &mut CountingWriter<W>) -> Result<()> {
        self.x.encode(writer).field("Vector2.x")?;
        self.y.encode(writer).field("Vector2.y")
    }
}

impl Encode for Vector3 {
    fn encode<W: Write>(&self, writer: &mut CountingWriter<W>) -> Result<()> {
        self.x.encode(writer).field("Vector3.x")?;
        self.y.encode(writer).field("Vector3.y")?;
        self.z.encode(writer).field("Vector3.z")
    }
}

impl Encode for NumberKeypoint {
    fn encode<W: Write>(&self, writer: &mut CountingWriter<W>) -> Result<()> {
        self.envelope
            .encode(writer)
            .field("NumberKeypoint.envelope")?;
        self.time.encode(writer).field("NumberKeypoint.time")?;
        self.value.encode(writer).field("NumberKeypoint.value")
    }
}

impl Encode for ColorKeypoint {
    fn encode<W: Write>(&self, writer: &mut CountingWriter<W>) -> Result<()> {
        self.envelope
            .encode(writer)
            .field("ColorKeypoint.envelope")?;
        self.time.encode(writer).field("ColorKeypoint.time")?;
        self.value.encode(writer).field("ColorKeypoint.value")
    }
}

impl Encode for NumberRange {
    fn encode<W: Write>(&self, writer: &mut CountingWriter<W>) -> Result<()> {
        self.min.encode(writer).field("NumberRange.min")?;
        self.max.encode(writer).field("NumberRange.max")
    }
}

impl Encode for Rect {
    fn encode<W: Write>(&self, writer: &mut CountingWriter<W>) -> Result<()> {
        self.min.encode(writer).field("Rect.min")?;
        self.max.encode(writer).field("Rect.max")
    }
}

fn encode_seq<T: Encode, W: Write>(
    items: &[T],
    writer: &mut CountingWriter<W>,
    len_field: &'static str,
    item_field: &'static str,
) -> Result<()> {
    let start = writer.bytes_written();
    writer.length(items.len()).field(len_field)?;
    for (i, item) in items.iter().enumerate() {
        item.encode(writer).index(i).field(item_field)?;
    }
    let end = writer.bytes_written();
    tracing::debug!(
        start = format_args!("{:#x}", start),
        end = format_args!("{:#x}", end),
        bytes = end - start,
        count = items.len(),
        ty = item_field,
        "serialized sequence"
    );
    Ok(())
}

impl Value {
    /// Write the body of this value. The tag is written by the caller.
    pub fn encode_body<W: Write>(&self, writer: &mut CountingWriter<W>) -> Result<()> {
        match self {
            Value::Text(v) => v.encode(writer).field("Text"),
            Value::Bool(v) => (*v as u8).encode(writer).field("Bool"),
            Value::Float(v) => v.encode(writer).field("Float"),
            Value::Double(v) => v.encode(writer).field("Double"),
            Value::Dim(v) => v.encode(writer),
            Value::Dim2(v) => v.encode(writer),
            Value::PaletteColor(v) => v.encode(writer).field("PaletteColor"),
            Value::Color3(v) => v.encode(writer),
            Value::Vector2(v) => v.encode(writer),
            Value::Vector3(v) => v.encode(writer),
            Value::NumberSequence(v) => {
                encode_seq(v, writer, "NumberSequence.len", "NumberSequence")
            }
            Value::ColorSequence(v) => encode_seq(v, writer, "ColorSequence.len", "ColorSequence"),
            Value::NumberRange(v) => v.encode(writer),
            Value::Rect(v) => v.encode(writer),
        }
    }
}

fn encode_entry<W: Write>(
    entry: &Entry,
    index: usize,
    writer: &mut CountingWriter<W>,
) -> Result<()> {
    let start = writer.bytes_written();
    let ty = entry.value.value_type();
    writer
        .string(&entry.name)
        .entry(index, &entry.name, EntryPart::Name)?;
    ty.tag()
        .encode(writer)
        .entry(index, &entry.name, EntryPart::Type)?;
    entry
        .value
        .encode_body(writer)
        .entry(index, &entry.name, EntryPart::Value)?;

    let end = writer.bytes_written();
    tracing::debug!(
        start = format_args!("{:#x}", start),
        end = format_args!("{:#x}", end),
        bytes = end - start,
        index,
        name = %entry.name,
        ty = %ty,
        "serialized Entry"
    );
    Ok(())
}

impl Encode for Dictionary {
    fn encode<W: Write>(&self, writer: &mut CountingWriter<W>) -> Result<()> {
        let start = writer.bytes_written();
        writer.length(self.len()).field("Dictionary.len")?;
        for (index, entry) in self.iter().enumerate() {
            encode_entry(entry, index, writer)?;
        }
        let end = writer.bytes_written();
        tracing::debug!(
            start = format_args!("{:#x}", start),
            end = format_args!("{:#x}", end),
            bytes = end - start,
            count = self.len(),
            "serialized Dictionary"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn encoded<T: Encode>(value: &T) -> Vec<u8> {
        let mut writer = CountingWriter::new(Vec::new());
        value.encode(&mut writer).unwrap();
        assert_eq!(writer.bytes_written(), writer.finish().unwrap());
        let n = writer.bytes_written() as usize;
        let buf = writer.into_inner();
        assert_eq!(buf.len(), n);
        buf
    }

    fn body(value: &Value) -> Vec<u8> {
        let mut writer = CountingWriter::new(Vec::new());
        value.encode_body(&mut writer).unwrap();
        writer.into_inner()
    }

    #[test]
    fn fixed_sizes() {
        let sizes = [
            (Value::Bool(true), 1),
            (Value::Float(1.0), 4),
            (Value::Double(1.0), 8),
            (Value::Dim(Dim::default()), 8),
            (Value::Dim2(Dim2::default()), 16),
            (Value::PaletteColor(194), 4),
            (Value::Color3(Color3::default()), 12),
            (Value::Vector2(Vector2::default()), 8),
            (Value::Vector3(Vector3::default()), 12),
            (Value::NumberRange(NumberRange::default()), 8),
            (Value::Rect(Rect::default()), 16),
        ];
        for (value, size) in sizes.iter() {
            assert_eq!(body(value).len(), *size, "{:?}", value.value_type());
        }
    }

    #[test]
    fn bool_encodes_one_or_zero() {
        assert_eq!(body(&Value::Bool(true)), [1]);
        assert_eq!(body(&Value::Bool(false)), [0]);
    }

    #[test]
    fn text_is_length_prefixed() {
        assert_eq!(body(&Value::from("foobar")), b"\x06\0\0\0foobar");
        assert_eq!(body(&Value::from("")), [0, 0, 0, 0]);
    }

    #[test]
    fn number_sequence_of_three() {
        let keys = vec![
            NumberKeypoint {
                envelope: 0.0,
                time: 0.0,
                value: 1.0,
            },
            NumberKeypoint {
                envelope: 0.0,
                time: 0.5,
                value: 2.0,
            },
            NumberKeypoint {
                envelope: 0.0,
                time: 1.0,
                value: 3.0,
            },
        ];
        let buf = body(&Value::NumberSequence(keys));
        assert_eq!(buf.len(), 4 + 3 * 12);
        assert_eq!(&buf[..4], &[3, 0, 0, 0]);
        assert_eq!(&buf[12..16], &1.0f32.to_le_bytes());
    }

    #[test]
    fn color_keypoint_layout() {
        let key = ColorKeypoint {
            envelope: 0.0,
            time: 1.0,
            value: Color3 {
                r: 0.25,
                g: 0.5,
                b: 1.0,
            },
        };
        let buf = encoded(&key);
        assert_eq!(buf.len(), 20);
        assert_eq!(&buf[4..8], &1.0f32.to_le_bytes());
        assert_eq!(&buf[8..12], &0.25f32.to_le_bytes());
    }

    #[test]
    fn dictionary_layout() {
        let dict: Dictionary = vec![Entry::new("A", Value::PaletteColor(194))]
            .into_iter()
            .collect();
        assert_eq!(
            encoded(&dict),
            [1, 0, 0, 0, 1, 0, 0, 0, b'A', 0x0e, 194, 0, 0, 0]
        );
        assert_eq!(encoded(&Dictionary::new()), [0, 0, 0, 0]);
    }

    #[test]
    fn duplicates_are_written_in_order() {
        let dict: Dictionary = vec![
            Entry::new("X", Value::Bool(true)),
            Entry::new("X", Value::Bool(false)),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            encoded(&dict),
            [2, 0, 0, 0, 1, 0, 0, 0, b'X', 0x03, 1, 1, 0, 0, 0, b'X', 0x03, 0]
        );
    }

    #[test]
    fn write_failure_has_entry_context() {
        struct Full;

        impl Write for Full {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let dict: Dictionary = vec![Entry::new("A", 1.0f32)].into_iter().collect();
        let mut writer = CountingWriter::new(Full);
        let err = dict.encode(&mut writer).unwrap_err();
        assert!(matches!(
            err.root(),
            Error::ShortWrite {
                wanted: 4,
                written: 0
            }
        ));
        assert_eq!(writer.bytes_written(), 0);
    }
}
