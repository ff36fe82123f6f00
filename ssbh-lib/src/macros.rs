//! Declarative schema macros
//!
//! `ssbh_record!` declares a record struct together with its static field
//! table and the encode/decode walks over those fields. `ssbh_enum!`
//! declares an enumeration stored inline with the width of its repr type.

/// Declare a record whose fields are encoded in declaration order.
///
/// Every field type must implement [`SsbhField`](crate::codec::SsbhField).
macro_rules! ssbh_record {
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
        #[derive(Debug, Clone, PartialEq, serde::Serialize)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $name {
            /// Binary layout of this record, in encode order
            pub const FIELDS: &'static [$crate::codec::FieldDescriptor] = &[
                $(
                    $crate::codec::FieldDescriptor {
                        name: stringify!($field),
                        kind: <$ty as $crate::codec::SsbhField>::KIND,
                        size: <$ty as $crate::codec::SsbhField>::SIZE,
                    },
                )*
            ];
        }

        impl $crate::codec::SsbhWrite for $name {
            fn write_fields<'a>(
                &'a self,
                ctx: &mut $crate::codec::EncodeContext<'a>,
            ) -> $crate::Result<()> {
                $( $crate::codec::SsbhField::write_field(&self.$field, ctx)?; )*
                Ok(())
            }
        }

        impl $crate::codec::SsbhRead for $name {
            fn read_fields(ctx: &mut $crate::codec::DecodeContext<'_>) -> $crate::Result<Self> {
                Ok(Self {
                    $( $field: <$ty as $crate::codec::SsbhField>::read_field(ctx)?, )*
                })
            }
        }

        impl $crate::codec::SsbhField for $name {
            const KIND: $crate::codec::FieldKind = $crate::codec::FieldKind::Record;
            const SIZE: usize = 0 $( + <$ty as $crate::codec::SsbhField>::SIZE )*;

            fn write_field<'a>(
                &'a self,
                ctx: &mut $crate::codec::EncodeContext<'a>,
            ) -> $crate::Result<()> {
                $crate::codec::SsbhWrite::write_fields(self, ctx)?;
                $crate::codec::SsbhWrite::post_write(self, ctx)
            }

            fn read_field(ctx: &mut $crate::codec::DecodeContext<'_>) -> $crate::Result<Self> {
                <Self as $crate::codec::SsbhRead>::read_fields(ctx)
            }
        }
    };
}

/// Declare an enumeration stored inline as its repr integer.
///
/// Decoding a value with no matching variant is a format error.
macro_rules! ssbh_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $repr:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
        #[repr($repr)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant = $value,
            )*
        }

        impl $name {
            pub fn value(self) -> $repr {
                self as $repr
            }

            pub fn from_value(value: $repr) -> Option<Self> {
                match value {
                    $( v if v == $value => Some(Self::$variant), )*
                    _ => None,
                }
            }
        }

        impl $crate::codec::SsbhField for $name {
            const KIND: $crate::codec::FieldKind = $crate::codec::FieldKind::Enum;
            const SIZE: usize = std::mem::size_of::<$repr>();

            fn write_field<'a>(
                &'a self,
                ctx: &mut $crate::codec::EncodeContext<'a>,
            ) -> $crate::Result<()> {
                $crate::codec::Scalar::write_scalar(self.value(), ctx.writer())
            }

            fn read_field(ctx: &mut $crate::codec::DecodeContext<'_>) -> $crate::Result<Self> {
                let position = ctx.reader().position();
                let value = <$repr as $crate::codec::Scalar>::read_scalar(ctx.reader())?;
                Self::from_value(value).ok_or_else(|| {
                    $crate::SsbhError::Format(format!(
                        "unknown {} value {} at 0x{:X}",
                        stringify!($name),
                        value,
                        position
                    ))
                })
            }
        }
    };
}
