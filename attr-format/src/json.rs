//! JSON view of attribute values.
//!
//! Entries become `{"name": ..., "type": ..., "value": ...}` objects where
//! `type` is the [`ValueType`] name. Float fields that are not finite are
//! written as `null` and read back as NaN. Names and text that are not valid
//! UTF-8 are written as arrays of byte values.

use std::convert::TryFrom;

use serde_json::{json, Map, Value as Json};

use crate::string::ByteString;
use crate::value::ParseValueTypeError;
use crate::{
    Color3, ColorKeypoint, Dictionary, Dim, Dim2, Entry, NumberKeypoint, NumberRange, Rect, Value,
    ValueType, Vector2, Vector3,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JsonError {
    #[error("expected {expected} for {ty} value")]
    Invalid {
        ty: ValueType,
        expected: &'static str,
    },

    #[error("missing field `{field}` for {ty} value")]
    MissingField { ty: ValueType, field: &'static str },

    #[error(transparent)]
    UnknownType(#[from] ParseValueTypeError),

    #[error("expected {0}")]
    Shape(&'static str),

    #[error("entry {index}")]
    Entry {
        index: usize,
        #[source]
        source: Box<JsonError>,
    },
}

type Result<T> = std::result::Result<T, JsonError>;

fn float(n: f32) -> Json {
    json!(n)
}

fn as_f32(json: &Json, ty: ValueType) -> Result<f32> {
    match json {
        Json::Null => Ok(f32::NAN),
        json => json.as_f64().map(|n| n as f32).ok_or(JsonError::Invalid {
            ty,
            expected: "a number",
        }),
    }
}

fn string(s: &ByteString) -> Json {
    match s.to_str() {
        Some(text) => Json::String(text.to_string()),
        None => Json::Array(s.iter().map(|&b| json!(b)).collect()),
    }
}

fn as_string(json: &Json) -> Option<ByteString> {
    match json {
        Json::String(text) => Some(text.as_str().into()),
        Json::Array(items) => items
            .iter()
            .map(|b| b.as_u64().and_then(|n| u8::try_from(n).ok()))
            .collect::<Option<Vec<u8>>>()
            .map(ByteString::from),
        _ => None,
    }
}

fn field<'a>(obj: &'a Json, ty: ValueType, name: &'static str) -> Result<&'a Json> {
    obj.as_object()
        .ok_or(JsonError::Invalid {
            ty,
            expected: "an object",
        })?
        .get(name)
        .ok_or(JsonError::MissingField { ty, field: name })
}

fn f32_field(obj: &Json, ty: ValueType, name: &'static str) -> Result<f32> {
    as_f32(field(obj, ty, name)?, ty)
}

fn array(json: &Json, ty: ValueType) -> Result<&Vec<Json>> {
    json.as_array().ok_or(JsonError::Invalid {
        ty,
        expected: "an array",
    })
}

impl Dim {
    fn to_json(self) -> Json {
        json!({ "scale": float(self.scale), "offset": self.offset })
    }

    fn from_json(json: &Json) -> Result<Dim> {
        let ty = ValueType::Dim;
        let offset = field(json, ty, "offset")?
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or(JsonError::Invalid {
                ty,
                expected: "a 32-bit signed integer offset",
            })?;
        Ok(Dim {
            scale: f32_field(json, ty, "scale")?,
            offset,
        })
    }
}

impl Color3 {
    fn to_json(self) -> Json {
        json!({ "r": float(self.r), "g": float(self.g), "b": float(self.b) })
    }

    fn from_json(json: &Json) -> Result<Color3> {
        let ty = ValueType::Color3;
        Ok(Color3 {
            r: f32_field(json, ty, "r")?,
            g: f32_field(json, ty, "g")?,
            b: f32_field(json, ty, "b")?,
        })
    }
}

impl Vector2 {
    fn to_json(self) -> Json {
        json!({ "x": float(self.x), "y": float(self.y) })
    }

    fn from_json(json: &Json) -> Result<Vector2> {
        let ty = ValueType::Vector2;
        Ok(Vector2 {
            x: f32_field(json, ty, "x")?,
            y: f32_field(json, ty, "y")?,
        })
    }
}

impl Value {
    pub fn to_json(&self) -> Json {
        match self {
            Value::Text(v) => string(v),
            Value::Bool(v) => Json::Bool(*v),
            Value::Float(v) => float(*v),
            Value::Double(v) => json!(v),
            Value::Dim(v) => v.to_json(),
            Value::Dim2(v) => json!({ "x": v.x.to_json(), "y": v.y.to_json() }),
            Value::PaletteColor(v) => json!(v),
            Value::Color3(v) => v.to_json(),
            Value::Vector2(v) => v.to_json(),
            Value::Vector3(v) => json!({ "x": float(v.x), "y": float(v.y), "z": float(v.z) }),
            Value::NumberSequence(keys) => Json::Array(
                keys.iter()
                    .map(|k| {
                        json!({
                            "envelope": float(k.envelope),
                            "time": float(k.time),
                            "value": float(k.value),
                        })
                    })
                    .collect(),
            ),
            Value::ColorSequence(keys) => Json::Array(
                keys.iter()
                    .map(|k| {
                        json!({
                            "envelope": float(k.envelope),
                            "time": float(k.time),
                            "value": k.value.to_json(),
                        })
                    })
                    .collect(),
            ),
            Value::NumberRange(v) => json!({ "min": float(v.min), "max": float(v.max) }),
            Value::Rect(v) => json!({ "min": v.min.to_json(), "max": v.max.to_json() }),
        }
    }

    pub fn from_json(ty: ValueType, json: &Json) -> Result<Value> {
        let value = match ty {
            ValueType::Text => Value::Text(as_string(json).ok_or(JsonError::Invalid {
                ty,
                expected: "a string or an array of bytes",
            })?),
            ValueType::Bool => Value::Bool(json.as_bool().ok_or(JsonError::Invalid {
                ty,
                expected: "a boolean",
            })?),
            ValueType::Float => Value::Float(as_f32(json, ty)?),
            ValueType::Double => Value::Double(match json {
                Json::Null => f64::NAN,
                json => json.as_f64().ok_or(JsonError::Invalid {
                    ty,
                    expected: "a number",
                })?,
            }),
            ValueType::Dim => Value::Dim(Dim::from_json(json)?),
            ValueType::Dim2 => Value::Dim2(Dim2 {
                x: Dim::from_json(field(json, ty, "x")?)?,
                y: Dim::from_json(field(json, ty, "y")?)?,
            }),
            ValueType::PaletteColor => Value::PaletteColor(
                json.as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or(JsonError::Invalid {
                        ty,
                        expected: "a 32-bit unsigned integer",
                    })?,
            ),
            ValueType::Color3 => Value::Color3(Color3::from_json(json)?),
            ValueType::Vector2 => Value::Vector2(Vector2::from_json(json)?),
            ValueType::Vector3 => Value::Vector3(Vector3 {
                x: f32_field(json, ty, "x")?,
                y: f32_field(json, ty, "y")?,
                z: f32_field(json, ty, "z")?,
            }),
            ValueType::NumberSequence => Value::NumberSequence(
                array(json, ty)?
                    .iter()
                    .map(|k| {
                        Ok(NumberKeypoint {
                            envelope: f32_field(k, ty, "envelope")?,
                            time: f32_field(k, ty, "time")?,
                            value: f32_field(k, ty, "value")?,
                        })
                    })
                    .collect::<Result<_>>()?,
            ),
            ValueType::ColorSequence => Value::ColorSequence(
                array(json, ty)?
                    .iter()
                    .map(|k| {
                        Ok(ColorKeypoint {
                            envelope: f32_field(k, ty, "envelope")?,
                            time: f32_field(k, ty, "time")?,
                            value: Color3::from_json(field(k, ty, "value")?)?,
                        })
                    })
                    .collect::<Result<_>>()?,
            ),
            ValueType::NumberRange => Value::NumberRange(NumberRange {
                min: f32_field(json, ty, "min")?,
                max: f32_field(json, ty, "max")?,
            }),
            ValueType::Rect => Value::Rect(Rect {
                min: Vector2::from_json(field(json, ty, "min")?)?,
                max: Vector2::from_json(field(json, ty, "max")?)?,
            }),
        };
        Ok(value)
    }
}

impl Entry {
    pub fn to_json(&self) -> Json {
        json!({
            "name": string(&self.name),
            "type": self.value.value_type().name(),
            "value": self.value.to_json(),
        })
    }

    pub fn from_json(json: &Json) -> Result<Entry> {
        const SHAPE: &str = "an object with `name`, `type` and `value`";

        let obj = json.as_object().ok_or(JsonError::Shape(SHAPE))?;
        let name = obj
            .get("name")
            .and_then(as_string)
            .ok_or(JsonError::Shape(SHAPE))?;
        let ty: ValueType = obj
            .get("type")
            .and_then(Json::as_str)
            .ok_or(JsonError::Shape(SHAPE))?
            .parse()?;
        let value = obj.get("value").ok_or(JsonError::Shape(SHAPE))?;

        Ok(Entry {
            name,
            value: Value::from_json(ty, value)?,
        })
    }
}

impl Dictionary {
    /// Every entry in order, duplicates included.
    pub fn to_json(&self) -> Json {
        Json::Array(self.iter().map(Entry::to_json).collect())
    }

    /// Name → `{"type", "value"}` object; the first entry with a name wins.
    /// Keys are names decoded lossily as UTF-8.
    pub fn to_json_map(&self) -> Json {
        let mut map = Map::new();
        for entry in self.iter() {
            let key = entry.name.to_string_lossy().into_owned();
            if map.contains_key(&key) {
                continue;
            }
            map.insert(
                key,
                json!({
                    "type": entry.value.value_type().name(),
                    "value": entry.value.to_json(),
                }),
            );
        }
        Json::Object(map)
    }

    /// Inverse of [`Dictionary::to_json`].
    pub fn from_json(json: &Json) -> Result<Dictionary> {
        json.as_array()
            .ok_or(JsonError::Shape("an array of entries"))?
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                Entry::from_json(entry).map_err(|e| JsonError::Entry {
                    index,
                    source: Box::new(e),
                })
            })
            .collect()
    }
}
