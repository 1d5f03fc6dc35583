//! Type-directed binary codec for wirecall.
//!
//! Values are serialized by static type into a [`ByteBuffer`]: fixed-width
//! scalars in big-endian order, strings and sequences behind a 2-byte
//! big-endian count. Argument lists are packed positionally with [`pack`]
//! and rebuilt with [`unpack`].

pub mod args;
pub mod buffer;
pub mod codec;
pub mod error;
mod macros;
pub mod wire;

pub use args::{pack, unpack, Pack, Unpack};
pub use buffer::ByteBuffer;
pub use codec::{Codec, MAX_SEQUENCE_LEN};
pub use error::{CodecError, Result};
pub use wire::{Decode, Encode};
