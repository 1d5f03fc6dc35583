/// Declare a struct whose Wire Value is its fields in declaration order.
///
/// ```
/// wirecall_codec::wire_struct! {
///     #[derive(Debug, PartialEq)]
///     pub struct Point {
///         pub x: i32,
///         pub y: i32,
///     }
/// }
///
/// let mut codec = wirecall_codec::Codec::new();
/// codec.encode(&Point { x: 1, y: -1 })?;
/// assert_eq!(codec.decode::<Point>()?, Point { x: 1, y: -1 });
/// # Ok::<(), wirecall_codec::CodecError>(())
/// ```
///
/// For a struct declared elsewhere, list every field in wire order:
/// `wire_struct!(impl Point { x, y });`.
#[macro_export]
macro_rules! wire_struct {
    (impl $name:path { $($field:ident),* $(,)? }) => {
        impl $crate::Encode for $name {
            #[allow(unused_variables)]
            fn encode(&self, codec: &mut $crate::Codec) -> $crate::Result<()> {
                $( $crate::Encode::encode(&self.$field, codec)?; )*
                Ok(())
            }
        }

        impl $crate::Decode for $name {
            #[allow(unused_variables)]
            fn decode(codec: &mut $crate::Codec) -> $crate::Result<Self> {
                Ok(Self {
                    $( $field: $crate::Decode::decode(codec)?, )*
                })
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        $crate::wire_struct!(impl $name { $($field),* });
    };
}

#[cfg(test)]
mod tests {
    use crate::{Codec, CodecError};

    crate::wire_struct! {
        #[derive(Debug, Clone, PartialEq)]
        struct Reading {
            sensor: String,
            value: f64,
            flags: Vec<u8>,
        }
    }

    crate::wire_struct! {
        #[derive(Debug, PartialEq)]
        struct Empty {}
    }

    #[derive(Debug, PartialEq)]
    struct Foreign {
        id: u32,
        tag: char,
    }

    crate::wire_struct!(impl Foreign { id, tag });

    #[test]
    fn fields_are_written_in_declaration_order() {
        let reading = Reading {
            sensor: "t0".into(),
            value: 0.5,
            flags: vec![1],
        };
        let mut codec = Codec::new();
        codec.encode(&reading).unwrap();
        assert_eq!(&codec.unread()[..4], &[0, 2, b't', b'0']);
        assert_eq!(codec.remaining(), 4 + 8 + 3);
        assert_eq!(codec.decode::<Reading>().unwrap(), reading);
    }

    #[test]
    fn empty_struct_has_no_bytes() {
        let mut codec = Codec::new();
        codec.encode(&Empty {}).unwrap();
        assert_eq!(codec.remaining(), 0);
        assert_eq!(codec.decode::<Empty>().unwrap(), Empty {});
    }

    #[test]
    fn truncated_aggregate_underflows() {
        let mut codec = Codec::from_slice(&[0, 1, b'a', 0x3F]);
        let err = codec.decode::<Reading>().unwrap_err();
        assert!(matches!(err, CodecError::Underflow { needed: 8, .. }));
    }

    #[test]
    fn existing_struct_can_opt_in() {
        let mut codec = Codec::new();
        codec.encode(&Foreign { id: 7, tag: 'k' }).unwrap();
        assert_eq!(codec.unread(), &[0, 0, 0, 7, 0, 0, 0, b'k']);
        assert_eq!(codec.decode::<Foreign>().unwrap(), Foreign { id: 7, tag: 'k' });
    }
}
