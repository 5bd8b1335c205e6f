//! Helper macro for declaring driven-port error enums.
//!
//! Every variant carries named fields; the macro derives `thiserror::Error`
//! and emits one snake-case constructor per variant whose parameters accept
//! anything convertible into the field type.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),+ $(,)? } => $message:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field: $ty),+ },
            )+
        }

        impl $name {
            $(
                ::paste::paste! {
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                        Self::$variant { $($field: $field.into()),+ }
                    }
                }
            )+
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Constructor generation coverage.

    define_port_error! {
        pub enum SamplePortError {
            Unreachable { message: String } => "unreachable: {message}",
            Timeout { attempts: u32 } => "timed out after {attempts} attempts",
            Rejected { message: String, attempts: u32 } => "rejected: {message} ({attempts})",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        let err = SamplePortError::unreachable("db down");
        assert_eq!(err.to_string(), "unreachable: db down");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        assert_eq!(
            SamplePortError::timeout(3_u32),
            SamplePortError::Timeout { attempts: 3 }
        );
    }

    #[test]
    fn multi_field_variants_format_all_fields() {
        let err = SamplePortError::rejected("busy", 2_u32);
        assert_eq!(err.to_string(), "rejected: busy (2)");
    }
}
