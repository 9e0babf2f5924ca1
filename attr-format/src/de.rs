use std::io::Read;

use crate::counting::{CountingReader, MAX_PREALLOC};
use crate::error::{Context, EntryPart, Result};
use crate::string::ByteString;
use crate::{
    Color3, ColorKeypoint, Dictionary, Dim, Dim2, Entry, NumberKeypoint, NumberRange, Rect, Value,
    Vector2, Vector3,
};

/// A type that can be decoded from the attribute format.
///
/// A failed decode leaves the reader latched and yields no value; callers
/// discard whatever they were building.
pub trait Decode: Sized {
    fn decode<R: Read>(reader: &mut CountingReader<R>) -> Result<Self>;
}

impl Decode for Dim {
    fn decode<R: Read>(reader: &mut CountingReader<R>) -> Result<Self> {
        Ok(Dim {
            scale: f32::decode(reader).field("Dim.scale")?,
            offset: i32::decode(reader).field("Dim.offset")?,
        })
    }
}

impl Decode for Dim2 {
    fn decode<R: Read>(reader: &mut CountingReader<R>) -> Result<Self> {
        Ok(Dim2 {
            x: Dim::decode(reader).field("Dim2.x")?,
            y: Dim::decode(reader).field("Dim2.y")?,
        })
    }
}

impl Decode for Color3 {
    fn decode<R: Read>(reader: &mut CountingReader<R>) -> Result<Self> {
        Ok(Color3 {
            r: f32::decode(reader).field("Color3.r")?,
            g: f32::decode(reader).field("Color3.g")?,
            b: f32::decode(reader).field("Color3.b")?,
        })
    }
}

impl Decode for Vector2 {
    fn decode<R: Read>(reader: &mut CountingReader<R>) -> Result<Self> {
        Ok(Vector2 {
            x: f32::decode(reader).field("Vector2.x")?,
            y: f32::decode(reader).field("Vector2.y")?,
        })
    }
}

impl Decode for Vector3 {
    fn decode<R: Read>(reader: &mut CountingReader<R>) -> Result<Self> {
        Ok(Vector3 {
            x: f32::decode(reader).field("Vector3.x")?,
            y: f32::decode(reader).field("Vector3.y")?,
            z: f32::decode(reader).field("Vector3.z")?,
        })
    }
}

impl Decode for NumberKeypoint {
    fn decode<R: Read>(reader: &mut CountingReader<R>) -> Result<Self> {
        Ok(NumberKeypoint {
            envelope: f32::decode(reader).field("NumberKeypoint.envelope")?,
            time: f32::decode(reader).field("NumberKeypoint.time")?,
            value: f32::decode(reader).field("NumberKeypoint.value")?,
        })
    }
}

impl Decode for ColorKeypoint {
    fn decode<R: Read>(reader: &mut CountingReader<R>) -> Result<Self> {
        Ok(ColorKeypoint {
            envelope: f32::decode(reader).field("ColorKeypoint.envelope")?,
            time: f32::decode(reader).field("ColorKeypoint.time")?,
            value: Color3::decode(reader).field("ColorKeypoint.value")?,
        })
    }
}

impl Decode for NumberRange {
    fn decode<R: Read>(reader: &mut CountingReader<R>) -> Result<Self> {
        Ok(NumberRange {
            min: f32::decode(reader).field("NumberRange.min")?,
            max: f32::decode(reader).field("NumberRange.max")?,
        })
    }
}

impl Decode for Rect {
    fn decode<R: Read>(reader: &mut CountingReader<R>) -> Result<Self> {
        Ok(Rect {
            min: Vector2::decode(reader).field("Rect.min")?,
            max: Vector2::decode(reader).field("Rect.max")?,
        })
    }
}

/// Counted sequence: a u32 element count followed by that many elements.
fn decode_seq<T: Decode, R: Read>(
    reader: &mut CountingReader<R>,
    len_field: &'static str,
    item_field: &'static str,
) -> Result<Vec<T>> {
    let start = reader.bytes_read();
    let len = u32::decode(reader).field(len_field)? as usize;
    let mut items = Vec::with_capacity(len.min(MAX_PREALLOC));
    for i in 0..len {
        items.push(T::decode(reader).index(i).field(item_field)?);
    }
    let end = reader.bytes_read();
    tracing::debug!(
        start = format_args!("{:#x}", start),
        end = format_args!("{:#x}", end),
        bytes = end - start,
        count = len,
        ty = item_field,
        "deserialized sequence"
    );
    Ok(items)
}

impl Value {
    /// Fill in this value from its encoded body. The variant already chosen
    /// decides the layout; the tag itself is not read here.
    pub fn decode_body<R: Read>(&mut self, reader: &mut CountingReader<R>) -> Result<()> {
        match self {
            Value::Text(v) => *v = ByteString::decode(reader).field("Text")?,
            Value::Bool(v) => *v = u8::decode(reader).field("Bool")? != 0,
            Value::Float(v) => *v = f32::decode(reader).field("Float")?,
            Value::Double(v) => *v = f64::decode(reader).field("Double")?,
            Value::Dim(v) => *v = Dim::decode(reader)?,
            Value::Dim2(v) => *v = Dim2::decode(reader)?,
            Value::PaletteColor(v) => *v = u32::decode(reader).field("PaletteColor")?,
            Value::Color3(v) => *v = Color3::decode(reader)?,
            Value::Vector2(v) => *v = Vector2::decode(reader)?,
            Value::Vector3(v) => *v = Vector3::decode(reader)?,
            Value::NumberSequence(v) => {
                *v = decode_seq(reader, "NumberSequence.len", "NumberSequence")?
            }
            Value::ColorSequence(v) => {
                *v = decode_seq(reader, "ColorSequence.len", "ColorSequence")?
            }
            Value::NumberRange(v) => *v = NumberRange::decode(reader)?,
            Value::Rect(v) => *v = Rect::decode(reader)?,
        }
        Ok(())
    }
}

fn decode_entry<R: Read>(reader: &mut CountingReader<R>, index: usize) -> Result<Entry> {
    let start = reader.bytes_read();
    let name = ByteString::decode(reader).entry(index, &ByteString::new(), EntryPart::Name)?;
    let tag = u8::decode(reader).entry(index, &name, EntryPart::Type)?;
    let mut value = Value::from_tag(tag).entry(index, &name, EntryPart::Type)?;
    value
        .decode_body(reader)
        .entry(index, &name, EntryPart::Value)?;

    let end = reader.bytes_read();
    tracing::debug!(
        start = format_args!("{:#x}", start),
        end = format_args!("{:#x}", end),
        bytes = end - start,
        index,
        %name,
        ty = %value.value_type(),
        "deserialized Entry"
    );

    Ok(Entry { name, value })
}

impl Decode for Dictionary {
    fn decode<R: Read>(reader: &mut CountingReader<R>) -> Result<Self> {
        let start = reader.bytes_read();
        let len = u32::decode(reader).field("Dictionary.len")? as usize;
        let mut entries = Vec::with_capacity(len.min(MAX_PREALLOC));
        for index in 0..len {
            entries.push(decode_entry(reader, index)?);
        }
        let end = reader.bytes_read();
        tracing::debug!(
            start = format_args!("{:#x}", start),
            end = format_args!("{:#x}", end),
            bytes = end - start,
            count = len,
            "deserialized Dictionary"
        );
        Ok(Dictionary::from(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn decode_all<T: Decode>(data: &[u8]) -> (Result<T>, u64) {
        let mut reader = CountingReader::new(data);
        let result = T::decode(&mut reader);
        (result, reader.bytes_read())
    }

    fn single_entry(tag: u8, body: &[u8]) -> Vec<u8> {
        let mut data = vec![1, 0, 0, 0, 1, 0, 0, 0, b'A', tag];
        data.extend_from_slice(body);
        data
    }

    #[test]
    fn decode_size_and_position() {
        let data: &[u8] = &[
            0x02, 0x00, 0x00, 0x00, // 2 entries
            0x04, 0x00, 0x00, 0x00, b'S', b'i', b'z', b'e', 0x0a, // Dim2
            0x00, 0x00, 0x00, 0x3f, 0x64, 0x00, 0x00, 0x00, // {0.5, 100}
            0x00, 0x00, 0x00, 0x3f, 0x64, 0x00, 0x00, 0x00, // {0.5, 100}
            0x08, 0x00, 0x00, 0x00, b'P', b'o', b's', b'i', b't', b'i', b'o', b'n', 0x0a, // Dim2
            0x00, 0x00, 0x80, 0x3e, 0xce, 0xff, 0xff, 0xff, // {0.25, -50}
            0x00, 0x00, 0x80, 0x3e, 0xce, 0xff, 0xff, 0xff, // {0.25, -50}
        ];
        assert_eq!(data.len(), 58);

        let (dict, n) = decode_all::<Dictionary>(data);
        let dict = dict.unwrap();
        assert_eq!(n, 58);
        assert_eq!(dict.len(), 2);

        let size = Dim {
            scale: 0.5,
            offset: 100,
        };
        let position = Dim {
            scale: 0.25,
            offset: -50,
        };
        assert_eq!(
            dict.get("Size"),
            Some(&Value::Dim2(Dim2 { x: size, y: size }))
        );
        assert_eq!(
            dict.get("Position"),
            Some(&Value::Dim2(Dim2 {
                x: position,
                y: position
            }))
        );
    }

    #[test]
    fn bool_is_nonzero() {
        for (byte, expected) in [(0u8, false), (1, true), (0x80, true)].iter() {
            let (dict, _) = decode_all::<Dictionary>(&single_entry(0x03, &[*byte]));
            assert_eq!(dict.unwrap().get("A"), Some(&Value::Bool(*expected)));
        }
    }

    #[test]
    fn number_sequence_keeps_order() {
        let mut body = vec![3, 0, 0, 0];
        for i in 0..3u8 {
            body.extend_from_slice(&0f32.to_le_bytes());
            body.extend_from_slice(&(i as f32 / 2.0).to_le_bytes());
            body.extend_from_slice(&(i as f32 * 10.0).to_le_bytes());
        }
        let (dict, n) = decode_all::<Dictionary>(&single_entry(0x17, &body));
        assert_eq!(n, 10 + 40);

        match dict.unwrap().get("A") {
            Some(Value::NumberSequence(keys)) => {
                assert_eq!(keys.len(), 3);
                assert_eq!(
                    keys.iter().map(|k| k.time).collect::<Vec<_>>(),
                    vec![0.0, 0.5, 1.0]
                );
                assert_eq!(keys[2].value, 20.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn empty_sequences() {
        let (dict, n) = decode_all::<Dictionary>(&single_entry(0x19, &[0, 0, 0, 0]));
        assert_eq!(dict.unwrap().get("A"), Some(&Value::ColorSequence(vec![])));
        assert_eq!(n, 14);
    }

    #[test]
    fn sequence_count_must_match_elements() {
        // Claims two keypoints but carries one.
        let mut body = vec![2, 0, 0, 0];
        body.extend_from_slice(&[0u8; 12]);
        let (dict, n) = decode_all::<Dictionary>(&single_entry(0x17, &body));
        let err = dict.unwrap_err();
        assert!(err.is_short_read());
        assert_eq!(n, 10 + 4 + 12);
        assert_eq!(
            err.chain(),
            "entry 0 (\"A\") value: NumberSequence: [1]: NumberKeypoint.envelope: \
             unexpected end of input: wanted 4 bytes, got 0"
        );
    }

    #[test]
    fn unknown_tag_stops_after_tag() {
        // 0x04 is a reserved integer type, followed by what would be its body.
        let data = single_entry(0x04, &[1, 0, 0, 0]);
        let (dict, n) = decode_all::<Dictionary>(&data);
        let err = dict.unwrap_err();

        assert!(matches!(err.root(), Error::UnknownType(0x04)));
        assert!(matches!(
            err,
            Error::Entry {
                index: 0,
                part: EntryPart::Type,
                ..
            }
        ));
        assert_eq!(n, 10);
    }

    #[test]
    fn nested_field_context() {
        // Rect cut off inside max.y
        let data = single_entry(0x1c, &[0u8; 14]);
        let (dict, _) = decode_all::<Dictionary>(&data);
        assert_eq!(
            dict.unwrap_err().chain(),
            "entry 0 (\"A\") value: Rect.max: Vector2.y: \
             unexpected end of input: wanted 4 bytes, got 2"
        );
    }

    #[test]
    fn names_and_text_are_raw_bytes() {
        let data = [1, 0, 0, 0, 1, 0, 0, 0, 0xff, 0x03, 1];
        let (dict, n) = decode_all::<Dictionary>(&data);
        let dict = dict.unwrap();
        assert_eq!(n, 11);
        assert_eq!(dict.entries()[0].name.as_bytes(), [0xff]);
        assert_eq!(dict.get(&[0xffu8][..]), Some(&Value::Bool(true)));

        let (dict, _) = decode_all::<Dictionary>(&single_entry(0x02, b"\x02\0\0\0\xc3\x28"));
        match dict.unwrap().get("A") {
            Some(Value::Text(text)) => assert_eq!(text.as_bytes(), b"\xc3\x28"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn missing_count() {
        let (dict, n) = decode_all::<Dictionary>(&[1, 0]);
        let err = dict.unwrap_err();
        assert!(matches!(
            err,
            Error::Field {
                field: "Dictionary.len",
                ..
            }
        ));
        assert_eq!(n, 2);
    }

    #[test]
    fn empty_dictionary() {
        let (dict, n) = decode_all::<Dictionary>(&[0, 0, 0, 0]);
        assert!(dict.unwrap().is_empty());
        assert_eq!(n, 4);
    }
}
