use bytes::Bytes;

use crate::buffer::ByteBuffer;
use crate::error::{CodecError, Result};
use crate::wire::{Decode, Encode};

/// Largest count a length prefix can carry.
pub const MAX_SEQUENCE_LEN: usize = u16::MAX as usize;

/// Type-directed serializer over one [`ByteBuffer`].
///
/// `encode` appends Wire Values at the end of the buffer; `decode` consumes
/// them from the cursor. Which rule applies is chosen by the static type:
/// nothing on the wire says what a value is.
///
/// ```
/// use wirecall_codec::Codec;
///
/// let mut codec = Codec::new();
/// codec.encode(&3i32)?.encode("even")?;
///
/// assert_eq!(codec.decode::<i32>()?, 3);
/// assert_eq!(codec.decode::<String>()?, "even");
/// # Ok::<(), wirecall_codec::CodecError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Codec {
    buf: ByteBuffer,
}

impl Codec {
    /// An empty codec for building an outbound message.
    pub fn new() -> Self {
        Self::default()
    }

    /// A codec reading an inbound message.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            buf: ByteBuffer::from_slice(bytes),
        }
    }

    /// Wrap an existing buffer.
    pub fn from_buffer(buf: ByteBuffer) -> Self {
        Self { buf }
    }

    /// Append the Wire Value of `value`.
    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        value.encode(self)?;
        Ok(self)
    }

    /// Consume the next Wire Value as a `T`.
    pub fn decode<T: Decode>(&mut self) -> Result<T> {
        T::decode(self)
    }

    /// Append raw bytes with no transformation.
    pub fn put_raw(&mut self, bytes: &[u8]) {
        self.buf.append(bytes);
    }

    /// Consume exactly `n` raw bytes.
    pub fn take_raw(&mut self, n: usize) -> Result<&[u8]> {
        self.buf.take(n)
    }

    /// Consume exactly `N` raw bytes into an array.
    pub fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.buf.take(N)?);
        Ok(out)
    }

    /// Write a 2-byte big-endian length prefix.
    pub fn put_len(&mut self, len: usize) -> Result<()> {
        let len = u16::try_from(len).map_err(|_| CodecError::LengthOverflow {
            len,
            max: MAX_SEQUENCE_LEN,
        })?;
        self.put_raw(&len.to_be_bytes());
        Ok(())
    }

    /// Read a 2-byte big-endian length prefix.
    pub fn take_len(&mut self) -> Result<usize> {
        Ok(u16::from_be_bytes(self.take_array()?) as usize)
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// The unread bytes.
    pub fn unread(&self) -> &[u8] {
        self.buf.peek()
    }

    /// The underlying buffer, including the consumed prefix.
    pub fn buffer(&self) -> &ByteBuffer {
        &self.buf
    }

    /// Unwrap into the unread bytes, ready to hand to a transport.
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chained_encode_preserves_order() -> Result<()> {
        let mut codec = Codec::new();
        codec.encode(&1u8)?.encode(&2u16)?.encode("z")?;
        assert_eq!(codec.unread(), &[1, 0, 2, 0, 1, b'z']);
        Ok(())
    }

    #[test]
    fn length_prefix_bounds() {
        let mut codec = Codec::new();
        codec.put_len(MAX_SEQUENCE_LEN).unwrap();
        assert_eq!(codec.unread(), &[0xFF, 0xFF]);
        assert_eq!(codec.take_len().unwrap(), MAX_SEQUENCE_LEN);

        let err = codec.put_len(MAX_SEQUENCE_LEN + 1).unwrap_err();
        assert!(matches!(err, CodecError::LengthOverflow { len: 65536, .. }));
    }

    #[test]
    fn take_array_underflow() {
        let mut codec = Codec::from_slice(&[1, 2, 3]);
        let err = codec.take_array::<4>().unwrap_err();
        assert_eq!(
            err,
            CodecError::Underflow {
                needed: 4,
                remaining: 3
            }
        );
        assert_eq!(codec.remaining(), 3);
    }

    #[test]
    fn into_bytes_drops_consumed_prefix() {
        let mut codec = Codec::new();
        codec.encode("name").unwrap().encode(&7i32).unwrap();
        let _: String = codec.decode().unwrap();
        assert_eq!(codec.into_bytes().as_ref(), &[0, 0, 0, 7]);
    }

    #[test]
    fn codec_over_an_existing_buffer() -> Result<()> {
        let mut buf = ByteBuffer::new();
        buf.append(&[0, 2, b'o', b'k']);
        buf.append(&[0x12, 0x34]);

        let mut codec = Codec::from_buffer(buf);
        assert_eq!(codec.decode::<String>()?, "ok");
        assert_eq!(codec.buffer().position(), 4);
        assert_eq!(codec.buffer().len(), 6);
        assert_eq!(codec.decode::<u16>()?, 0x1234);
        assert_eq!(codec.remaining(), 0);
        Ok(())
    }
}
