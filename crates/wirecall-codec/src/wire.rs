//! Per-type Wire Value rules.
//!
//! Scalars are written at their native width in big-endian order. Strings
//! and sequences carry a 2-byte big-endian count followed by the payload.
//! Nothing else is on the wire: the reader must know what it expects.

use std::sync::Arc;

use crate::codec::Codec;
use crate::error::{CodecError, Result};

/// A type with an outbound Wire Value.
pub trait Encode {
    fn encode(&self, codec: &mut Codec) -> Result<()>;
}

/// A type that can be reconstructed from its Wire Value.
pub trait Decode: Sized {
    fn decode(codec: &mut Codec) -> Result<Self>;
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Encode for $ty {
                fn encode(&self, codec: &mut Codec) -> Result<()> {
                    codec.put_raw(&self.to_be_bytes());
                    Ok(())
                }
            }

            impl Decode for $ty {
                fn decode(codec: &mut Codec) -> Result<Self> {
                    Ok(<$ty>::from_be_bytes(codec.take_array()?))
                }
            }
        )*
    };
}

// usize/isize are left out: their width depends on the host.
impl_scalar!(u8, i8, u16, i16, u32, i32, u64, i64, u128, i128, f32, f64);

impl Encode for bool {
    fn encode(&self, codec: &mut Codec) -> Result<()> {
        codec.put_raw(&[u8::from(*self)]);
        Ok(())
    }
}

impl Decode for bool {
    fn decode(codec: &mut Codec) -> Result<Self> {
        match u8::decode(codec)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::InvalidBool(other)),
        }
    }
}

impl Encode for char {
    fn encode(&self, codec: &mut Codec) -> Result<()> {
        u32::from(*self).encode(codec)
    }
}

impl Decode for char {
    fn decode(codec: &mut Codec) -> Result<Self> {
        let scalar = u32::decode(codec)?;
        char::from_u32(scalar).ok_or(CodecError::InvalidChar(scalar))
    }
}

/// The void placeholder: one zero byte.
impl Encode for () {
    fn encode(&self, codec: &mut Codec) -> Result<()> {
        codec.put_raw(&[0]);
        Ok(())
    }
}

impl Decode for () {
    fn decode(codec: &mut Codec) -> Result<Self> {
        codec.take_raw(1)?;
        Ok(())
    }
}

impl Encode for str {
    fn encode(&self, codec: &mut Codec) -> Result<()> {
        codec.put_len(self.len())?;
        codec.put_raw(self.as_bytes());
        Ok(())
    }
}

impl Encode for String {
    fn encode(&self, codec: &mut Codec) -> Result<()> {
        self.as_str().encode(codec)
    }
}

impl Decode for String {
    fn decode(codec: &mut Codec) -> Result<Self> {
        let len = codec.take_len()?;
        let raw = codec.take_raw(len)?.to_vec();
        Ok(String::from_utf8(raw)?)
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self, codec: &mut Codec) -> Result<()> {
        codec.put_len(self.len())?;
        for item in self {
            item.encode(codec)?;
        }
        Ok(())
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, codec: &mut Codec) -> Result<()> {
        self.as_slice().encode(codec)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(codec: &mut Codec) -> Result<Self> {
        let count = codec.take_len()?;
        // Every element occupies at least one byte.
        let mut items = Vec::with_capacity(count.min(codec.remaining()));
        for _ in 0..count {
            items.push(T::decode(codec)?);
        }
        Ok(items)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, codec: &mut Codec) -> Result<()> {
        (**self).encode(codec)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, codec: &mut Codec) -> Result<()> {
        (**self).encode(codec)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(codec: &mut Codec) -> Result<Self> {
        T::decode(codec).map(Box::new)
    }
}

impl<T: Encode + ?Sized> Encode for Arc<T> {
    fn encode(&self, codec: &mut Codec) -> Result<()> {
        (**self).encode(codec)
    }
}

impl<T: Decode> Decode for Arc<T> {
    fn decode(codec: &mut Codec) -> Result<Self> {
        T::decode(codec).map(Arc::new)
    }
}
