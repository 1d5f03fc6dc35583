//! Positional argument lists.
//!
//! An argument list is the concatenation of each argument's Wire Value in
//! call order. There is no count, name or tag: the receiver reconstructs
//! the list from the handler's parameter types alone.

use crate::codec::Codec;
use crate::error::Result;
use crate::wire::{Decode, Encode};

/// An ordered argument list that can be appended to a Call Frame.
pub trait Pack {
    fn pack(&self, codec: &mut Codec) -> Result<()>;
}

/// An ordered argument list that can be rebuilt from a Call Frame.
pub trait Unpack: Sized {
    fn unpack(codec: &mut Codec) -> Result<Self>;
}

macro_rules! impl_args {
    ($($name:ident),*) => {
        impl<$($name: Encode),*> Pack for ($($name,)*) {
            #[allow(non_snake_case, unused_variables)]
            fn pack(&self, codec: &mut Codec) -> Result<()> {
                let ($($name,)*) = self;
                $( $name.encode(codec)?; )*
                Ok(())
            }
        }

        impl<$($name: Decode),*> Unpack for ($($name,)*) {
            #[allow(unused_variables)]
            fn unpack(codec: &mut Codec) -> Result<Self> {
                Ok(($($name::decode(codec)?,)*))
            }
        }
    };
}

impl_args!();
impl_args!(A);
impl_args!(A, B);
impl_args!(A, B, C);
impl_args!(A, B, C, D);
impl_args!(A, B, C, D, E);
impl_args!(A, B, C, D, E, F);
impl_args!(A, B, C, D, E, F, G);
impl_args!(A, B, C, D, E, F, G, H);

/// A homogeneous list packs element by element, without a count.
impl<T: Encode> Pack for [T] {
    fn pack(&self, codec: &mut Codec) -> Result<()> {
        for arg in self {
            arg.encode(codec)?;
        }
        Ok(())
    }
}

impl<T: Encode> Pack for Vec<T> {
    fn pack(&self, codec: &mut Codec) -> Result<()> {
        self.as_slice().pack(codec)
    }
}

impl<P: Pack + ?Sized> Pack for &P {
    fn pack(&self, codec: &mut Codec) -> Result<()> {
        (**self).pack(codec)
    }
}

/// Append every argument of `args` to `codec`.
pub fn pack<P: Pack + ?Sized>(codec: &mut Codec, args: &P) -> Result<()> {
    args.pack(codec)
}

/// Rebuild an argument tuple from `codec`.
pub fn unpack<U: Unpack>(codec: &mut Codec) -> Result<U> {
    U::unpack(codec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodecError;

    #[test]
    fn empty_list_writes_nothing() {
        let mut codec = Codec::new();
        pack(&mut codec, &()).unwrap();
        assert_eq!(codec.remaining(), 0);
        let () = unpack(&mut codec).unwrap();
    }

    #[test]
    fn tuple_packs_in_order_without_a_count() {
        let mut codec = Codec::new();
        pack(&mut codec, &(3i32, "x", true)).unwrap();
        assert_eq!(codec.unread(), &[0, 0, 0, 3, 0, 1, b'x', 1]);

        let (a, b, c): (i32, String, bool) = unpack(&mut codec).unwrap();
        assert_eq!((a, b.as_str(), c), (3, "x", true));
    }

    #[test]
    fn slice_packs_like_the_equivalent_tuple() {
        let mut from_slice = Codec::new();
        pack(&mut from_slice, &[1i64, 2, 3][..]).unwrap();
        let mut from_tuple = Codec::new();
        pack(&mut from_tuple, &(1i64, 2i64, 3i64)).unwrap();
        assert_eq!(from_slice.unread(), from_tuple.unread());
    }

    #[test]
    fn short_frame_fails_to_unpack() {
        let mut codec = Codec::new();
        pack(&mut codec, &(1i32,)).unwrap();
        let err = unpack::<(i32, i32)>(&mut codec).unwrap_err();
        assert_eq!(
            err,
            CodecError::Underflow {
                needed: 4,
                remaining: 0
            }
        );
    }
}
