macro_rules! quantity {
    ($(#[$meta:meta])* $name:ident, unit: $unit:literal, decimals: $decimals:literal) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(
            ::derive_more::Add,
            ::derive_more::AddAssign,
            ::derive_more::From,
            ::derive_more::Sum,
            ::serde::Deserialize,
            ::serde::Serialize,
            ::std::clone::Clone,
            ::std::marker::Copy,
            ::std::cmp::PartialEq,
            ::std::cmp::PartialOrd,
            ::std::default::Default,
        )]
        pub struct $name(pub f64);

        impl $name {
            /// Round to the precision the output documents carry.
            #[must_use]
            pub fn round(self) -> Self {
                Self($crate::quantity::round_to(self.0, $decimals))
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, formatter: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(formatter, "{:.*}", $decimals, self.0)?;
                if !$unit.is_empty() {
                    write!(formatter, " {}", $unit)?;
                }
                Ok(())
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, formatter: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Debug::fmt(&self.0, formatter)?;
                write!(formatter, "{}", $unit)
            }
        }
    };
}
