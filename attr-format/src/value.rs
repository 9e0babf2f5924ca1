use std::fmt;

use crate::error::{Error, Result};
use crate::string::ByteString;

/// Attribute type tag stored before each value.
///
/// Tags missing from this enum are either unused or belong to types the
/// format does not support yet, and must fail to decode:
///
/// | Tag | Type |
/// |---|---|
/// | 0x00 | null |
/// | 0x01 | empty |
/// | 0x04 | int |
/// | 0x07 | array |
/// | 0x08 | dictionary |
/// | 0x0B | ray |
/// | 0x0C | faces |
/// | 0x0D | axes |
/// | 0x12 | 2D int16 vector |
/// | 0x13 | 3D int16 vector |
/// | 0x14 | coordinate frame |
/// | 0x15 | enum item |
/// | 0x16 | unknown |
/// | 0x18 | number keyframe |
/// | 0x1A | color keyframe |
/// | 0x1D | physical properties |
/// | 0x1E | unknown |
/// | 0x1F | region |
/// | 0x20 | int16 region |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueType {
    /// Length-prefixed text
    Text = 0x02,
    /// Single byte, nonzero is true
    Bool = 0x03,
    /// 32-bit float
    Float = 0x05,
    /// 64-bit float
    Double = 0x06,
    /// Scale and pixel offset along one axis
    Dim = 0x09,
    /// Two [`Dim`]s
    Dim2 = 0x0A,
    /// Index into the host's color palette
    PaletteColor = 0x0E,
    /// RGB color, three 32-bit floats
    Color3 = 0x0F,
    Vector2 = 0x10,
    Vector3 = 0x11,
    /// Counted list of number keyframes
    NumberSequence = 0x17,
    /// Counted list of color keyframes
    ColorSequence = 0x19,
    NumberRange = 0x1B,
    Rect = 0x1C,
}

impl ValueType {
    /// Every supported type, in tag order.
    pub const ALL: [ValueType; 14] = [
        ValueType::Text,
        ValueType::Bool,
        ValueType::Float,
        ValueType::Double,
        ValueType::Dim,
        ValueType::Dim2,
        ValueType::PaletteColor,
        ValueType::Color3,
        ValueType::Vector2,
        ValueType::Vector3,
        ValueType::NumberSequence,
        ValueType::ColorSequence,
        ValueType::NumberRange,
        ValueType::Rect,
    ];

    /// Convert from u8 tag value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x02 => Some(Self::Text),
            0x03 => Some(Self::Bool),
            0x05 => Some(Self::Float),
            0x06 => Some(Self::Double),
            0x09 => Some(Self::Dim),
            0x0A => Some(Self::Dim2),
            0x0E => Some(Self::PaletteColor),
            0x0F => Some(Self::Color3),
            0x10 => Some(Self::Vector2),
            0x11 => Some(Self::Vector3),
            0x17 => Some(Self::NumberSequence),
            0x19 => Some(Self::ColorSequence),
            0x1B => Some(Self::NumberRange),
            0x1C => Some(Self::Rect),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueType::Text => "Text",
            ValueType::Bool => "Bool",
            ValueType::Float => "Float",
            ValueType::Double => "Double",
            ValueType::Dim => "Dim",
            ValueType::Dim2 => "Dim2",
            ValueType::PaletteColor => "PaletteColor",
            ValueType::Color3 => "Color3",
            ValueType::Vector2 => "Vector2",
            ValueType::Vector3 => "Vector3",
            ValueType::NumberSequence => "NumberSequence",
            ValueType::ColorSequence => "ColorSequence",
            ValueType::NumberRange => "NumberRange",
            ValueType::Rect => "Rect",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value type name `{0}`")]
pub struct ParseValueTypeError(pub String);

impl std::str::FromStr for ValueType {
    type Err = ParseValueTypeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ValueType::ALL
            .iter()
            .copied()
            .find(|ty| ty.name() == s)
            .ok_or_else(|| ParseValueTypeError(s.to_string()))
    }
}

/// One axis of a size or position: a fraction of the parent plus an offset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dim {
    pub scale: f32,
    pub offset: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dim2 {
    pub x: Dim,
    pub y: Dim,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Color3 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumberKeypoint {
    pub envelope: f32,
    pub time: f32,
    pub value: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorKeypoint {
    pub envelope: f32,
    pub time: f32,
    pub value: Color3,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumberRange {
    pub min: f32,
    pub max: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub min: Vector2,
    pub max: Vector2,
}

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(ByteString),
    Bool(bool),
    Float(f32),
    Double(f64),
    Dim(Dim),
    Dim2(Dim2),
    /// Palette index. Unknown indices are left for the caller to map to a default.
    PaletteColor(u32),
    Color3(Color3),
    Vector2(Vector2),
    Vector3(Vector3),
    NumberSequence(Vec<NumberKeypoint>),
    ColorSequence(Vec<ColorKeypoint>),
    NumberRange(NumberRange),
    Rect(Rect),
}

impl Value {
    /// Get the ValueType for this value
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Text(_) => ValueType::Text,
            Value::Bool(_) => ValueType::Bool,
            Value::Float(_) => ValueType::Float,
            Value::Double(_) => ValueType::Double,
            Value::Dim(_) => ValueType::Dim,
            Value::Dim2(_) => ValueType::Dim2,
            Value::PaletteColor(_) => ValueType::PaletteColor,
            Value::Color3(_) => ValueType::Color3,
            Value::Vector2(_) => ValueType::Vector2,
            Value::Vector3(_) => ValueType::Vector3,
            Value::NumberSequence(_) => ValueType::NumberSequence,
            Value::ColorSequence(_) => ValueType::ColorSequence,
            Value::NumberRange(_) => ValueType::NumberRange,
            Value::Rect(_) => ValueType::Rect,
        }
    }

    /// A zero value of the given type, ready to be filled in by a decoder.
    pub fn empty(ty: ValueType) -> Value {
        match ty {
            ValueType::Text => Value::Text(ByteString::new()),
            ValueType::Bool => Value::Bool(false),
            ValueType::Float => Value::Float(0.0),
            ValueType::Double => Value::Double(0.0),
            ValueType::Dim => Value::Dim(Dim::default()),
            ValueType::Dim2 => Value::Dim2(Dim2::default()),
            ValueType::PaletteColor => Value::PaletteColor(0),
            ValueType::Color3 => Value::Color3(Color3::default()),
            ValueType::Vector2 => Value::Vector2(Vector2::default()),
            ValueType::Vector3 => Value::Vector3(Vector3::default()),
            ValueType::NumberSequence => Value::NumberSequence(Vec::new()),
            ValueType::ColorSequence => Value::ColorSequence(Vec::new()),
            ValueType::NumberRange => Value::NumberRange(NumberRange::default()),
            ValueType::Rect => Value::Rect(Rect::default()),
        }
    }

    /// A zero value for a raw tag byte, or [`Error::UnknownType`].
    pub fn from_tag(tag: u8) -> Result<Value> {
        ValueType::from_u8(tag)
            .map(Value::empty)
            .ok_or(Error::UnknownType(tag))
    }

    /// Picks [`Value::Float`] when `n` survives a round trip through `f32`,
    /// otherwise [`Value::Double`].
    pub fn from_number(n: f64) -> Value {
        let narrowed = n as f32;
        if (narrowed as f64).to_bits() == n.to_bits() || (n.is_nan() && narrowed.is_nan()) {
            Value::Float(narrowed)
        } else {
            Value::Double(n)
        }
    }

    pub fn as_text(&self) -> Option<&ByteString> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The numeric value of a `Float` or `Double`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n as f64),
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<ByteString> for Value {
    fn from(s: ByteString) -> Self {
        Value::Text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s.into())
    }
}

impl<'a> From<&'a str> for Value {
    fn from(s: &'a str) -> Self {
        Value::Text(s.into())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<Dim> for Value {
    fn from(v: Dim) -> Self {
        Value::Dim(v)
    }
}

impl From<Dim2> for Value {
    fn from(v: Dim2) -> Self {
        Value::Dim2(v)
    }
}

impl From<Color3> for Value {
    fn from(v: Color3) -> Self {
        Value::Color3(v)
    }
}

impl From<Vector2> for Value {
    fn from(v: Vector2) -> Self {
        Value::Vector2(v)
    }
}

impl From<Vector3> for Value {
    fn from(v: Vector3) -> Self {
        Value::Vector3(v)
    }
}

impl From<Vec<NumberKeypoint>> for Value {
    fn from(v: Vec<NumberKeypoint>) -> Self {
        Value::NumberSequence(v)
    }
}

impl From<Vec<ColorKeypoint>> for Value {
    fn from(v: Vec<ColorKeypoint>) -> Self {
        Value::ColorSequence(v)
    }
}

impl From<NumberRange> for Value {
    fn from(v: NumberRange) -> Self {
        Value::NumberRange(v)
    }
}

impl From<Rect> for Value {
    fn from(v: Rect) -> Self {
        Value::Rect(v)
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.scale, self.offset)
    }
}

impl fmt::Display for Color3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(v) => write!(f, "{:?}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Dim(v) => write!(f, "{}", v),
            Value::Dim2(v) => write!(f, "{{{}, {}}}", v.x, v.y),
            Value::PaletteColor(v) => write!(f, "#{}", v),
            Value::Color3(v) => write!(f, "{}", v),
            Value::Vector2(v) => write!(f, "{}", v),
            Value::Vector3(v) => write!(f, "{}, {}, {}", v.x, v.y, v.z),
            Value::NumberSequence(keys) => {
                let mut keys = keys.iter();
                if let Some(k) = keys.next() {
                    write!(f, "{} {} {}", k.time, k.value, k.envelope)?;
                }
                for k in keys {
                    write!(f, " {} {} {}", k.time, k.value, k.envelope)?;
                }
                Ok(())
            }
            Value::ColorSequence(keys) => {
                let mut keys = keys.iter();
                if let Some(k) = keys.next() {
                    write!(f, "{} [{}] {}", k.time, k.value, k.envelope)?;
                }
                for k in keys {
                    write!(f, " {} [{}] {}", k.time, k.value, k.envelope)?;
                }
                Ok(())
            }
            Value::NumberRange(v) => write!(f, "{} {}", v.min, v.max),
            Value::Rect(v) => write!(f, "{}, {}", v.min, v.max),
        }
    }
}
