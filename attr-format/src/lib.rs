//! Herein lies the codec for binary attribute dictionaries.
//!
//! A blob is a single [Dictionary][Dictionary] of named, typed [Value][Value]s
//! with no header or version. Use [decode][decode] and [encode][encode], or
//! [Model][Model] directly, to convert between bytes and values.
//!
//! ```
//! use attr_format::{Dictionary, Model, Value, Vector3};
//!
//! let mut value = Dictionary::new();
//! value.push("Speed", 16.0f32);
//! value.push("Offset", Vector3 { x: 0.0, y: 2.5, z: 0.0 });
//!
//! let bytes = Model::new(value).to_vec().unwrap();
//! let (model, n) = Model::from_slice(&bytes).unwrap();
//! assert_eq!(n as usize, bytes.len());
//! assert_eq!(model.value.get("Speed"), Some(&Value::Float(16.0)));
//! ```

mod counting;
#[cfg(feature = "reader")]
mod de;
mod dict;
mod error;
mod json;
mod model;
pub mod names;
mod primitive;
#[cfg(feature = "writer")]
mod ser;
mod string;
mod value;

pub use counting::{CountingReader, CountingWriter};
#[cfg(feature = "reader")]
pub use de::Decode;
pub use dict::{Dictionary, Entry};
pub use error::{EntryPart, Error, Result};
pub use json::JsonError;
#[cfg(feature = "reader")]
pub use model::decode;
#[cfg(feature = "writer")]
pub use model::encode;
pub use model::{Model, ModelError};
pub use names::{validate_name, NameError};
pub use primitive::Number;
#[cfg(feature = "writer")]
pub use ser::Encode;
pub use string::ByteString;
pub use value::{
    Color3, ColorKeypoint, Dim, Dim2, NumberKeypoint, NumberRange, ParseValueTypeError, Rect,
    Value, ValueType, Vector2, Vector3,
};
