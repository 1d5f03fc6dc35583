//! Dynamically typed Wire Values for the command line.
//!
//! The wire carries no type information, so every argument is given as
//! `TYPE:VALUE` and the return type is named with `--returns`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use wirecall_codec::{Codec, CodecError, Decode, Encode};

/// A type name as accepted on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
    Bool,
    Char,
    Str,
    Unit,
    Vec(Box<WireType>),
}

impl FromStr for WireType {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if let Some(inner) = input
            .strip_prefix("vec<")
            .and_then(|rest| rest.strip_suffix('>'))
            .or_else(|| input.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')))
        {
            return Ok(Self::Vec(Box::new(inner.parse()?)));
        }

        Ok(match input {
            "u8" => Self::U8,
            "i8" => Self::I8,
            "u16" => Self::U16,
            "i16" => Self::I16,
            "u32" => Self::U32,
            "i32" => Self::I32,
            "u64" => Self::U64,
            "i64" => Self::I64,
            "f32" => Self::F32,
            "f64" => Self::F64,
            "bool" => Self::Bool,
            "char" => Self::Char,
            "str" | "string" => Self::Str,
            "unit" | "void" | "()" => Self::Unit,
            other => return Err(format!("unknown type: {other}")),
        })
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::U8 => "u8",
            Self::I8 => "i8",
            Self::U16 => "u16",
            Self::I16 => "i16",
            Self::U32 => "u32",
            Self::I32 => "i32",
            Self::U64 => "u64",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Str => "str",
            Self::Unit => "unit",
            Self::Vec(inner) => return write!(f, "vec<{inner}>"),
        };
        f.write_str(name)
    }
}

impl WireType {
    /// Parse a command-line literal of this type.
    ///
    /// Lists are comma separated; an empty literal is an empty list.
    pub fn parse_value(&self, raw: &str) -> Result<ArgValue, String> {
        fn num<T: FromStr>(ty: &WireType, raw: &str) -> Result<T, String> {
            raw.trim()
                .parse()
                .map_err(|_| format!("invalid {ty} literal: {raw:?}"))
        }

        Ok(match self {
            Self::U8 => ArgValue::U8(num(self, raw)?),
            Self::I8 => ArgValue::I8(num(self, raw)?),
            Self::U16 => ArgValue::U16(num(self, raw)?),
            Self::I16 => ArgValue::I16(num(self, raw)?),
            Self::U32 => ArgValue::U32(num(self, raw)?),
            Self::I32 => ArgValue::I32(num(self, raw)?),
            Self::U64 => ArgValue::U64(num(self, raw)?),
            Self::I64 => ArgValue::I64(num(self, raw)?),
            Self::F32 => ArgValue::F32(num(self, raw)?),
            Self::F64 => ArgValue::F64(num(self, raw)?),
            Self::Bool => ArgValue::Bool(num(self, raw)?),
            Self::Char => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => ArgValue::Char(c),
                    _ => return Err(format!("invalid char literal: {raw:?}")),
                }
            }
            Self::Str => ArgValue::Str(raw.to_string()),
            Self::Unit => ArgValue::Unit,
            Self::Vec(inner) => {
                if matches!(**inner, Self::Vec(_)) {
                    return Err("nested lists cannot be given on the command line".to_string());
                }
                if raw.is_empty() {
                    ArgValue::List(Vec::new())
                } else {
                    ArgValue::List(
                        raw.split(',')
                            .map(|item| inner.parse_value(item))
                            .collect::<Result<_, _>>()?,
                    )
                }
            }
        })
    }

    /// Decode the next Wire Value of this type.
    pub fn decode(&self, codec: &mut Codec) -> Result<ArgValue, CodecError> {
        Ok(match self {
            Self::U8 => ArgValue::U8(codec.decode()?),
            Self::I8 => ArgValue::I8(codec.decode()?),
            Self::U16 => ArgValue::U16(codec.decode()?),
            Self::I16 => ArgValue::I16(codec.decode()?),
            Self::U32 => ArgValue::U32(codec.decode()?),
            Self::I32 => ArgValue::I32(codec.decode()?),
            Self::U64 => ArgValue::U64(codec.decode()?),
            Self::I64 => ArgValue::I64(codec.decode()?),
            Self::F32 => ArgValue::F32(codec.decode()?),
            Self::F64 => ArgValue::F64(codec.decode()?),
            Self::Bool => ArgValue::Bool(codec.decode()?),
            Self::Char => ArgValue::Char(codec.decode()?),
            Self::Str => ArgValue::Str(codec.decode()?),
            Self::Unit => {
                codec.decode::<()>()?;
                ArgValue::Unit
            }
            Self::Vec(inner) => {
                let count = codec.take_len()?;
                let mut items = Vec::with_capacity(count.min(codec.remaining()));
                for _ in 0..count {
                    items.push(inner.decode(codec)?);
                }
                ArgValue::List(items)
            }
        })
    }
}

/// A value whose type was chosen at run time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Char(char),
    Str(String),
    Unit,
    List(Vec<ArgValue>),
}

impl Encode for ArgValue {
    fn encode(&self, codec: &mut Codec) -> wirecall_codec::Result<()> {
        match self {
            Self::U8(v) => v.encode(codec),
            Self::I8(v) => v.encode(codec),
            Self::U16(v) => v.encode(codec),
            Self::I16(v) => v.encode(codec),
            Self::U32(v) => v.encode(codec),
            Self::I32(v) => v.encode(codec),
            Self::U64(v) => v.encode(codec),
            Self::I64(v) => v.encode(codec),
            Self::F32(v) => v.encode(codec),
            Self::F64(v) => v.encode(codec),
            Self::Bool(v) => v.encode(codec),
            Self::Char(v) => v.encode(codec),
            Self::Str(v) => v.encode(codec),
            Self::Unit => ().encode(codec),
            Self::List(items) => items.encode(codec),
        }
    }
}

impl FromStr for ArgValue {
    type Err = String;

    /// Parse `TYPE:VALUE`. `unit` may be given without a value.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (ty, raw) = match input.split_once(':') {
            Some((ty, raw)) => (ty, raw),
            None => (input, ""),
        };
        let ty: WireType = ty.parse()?;
        if input.split_once(':').is_none() && ty != WireType::Unit {
            return Err(format!("expected TYPE:VALUE, got {input:?}"));
        }
        ty.parse_value(raw)
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U8(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v:?}"),
            Self::Str(v) => write!(f, "{v:?}"),
            Self::Unit => f.write_str("()"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// The undecoded value bytes of a response, kept until the caller knows
/// what type to read them as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue(Vec<u8>);

impl RawValue {
    /// Read the bytes as one value of type `ty`. Returns the value and the
    /// number of bytes left over.
    pub fn read_as(&self, ty: &WireType) -> Result<(ArgValue, usize), CodecError> {
        let mut codec = Codec::from_slice(&self.0);
        let value = ty.decode(&mut codec)?;
        Ok((value, codec.remaining()))
    }
}

impl Decode for RawValue {
    fn decode(codec: &mut Codec) -> wirecall_codec::Result<Self> {
        let len = codec.remaining();
        Ok(Self(codec.take_raw(len)?.to_vec()))
    }
}
