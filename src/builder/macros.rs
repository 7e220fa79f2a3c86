//! Macros for declaring signal enumerations.

/// Declare a fieldless, `Copy` signal enumeration.
///
/// The generated type derives the usual value traits plus serde support and
/// gains:
///
/// - `ALL`: every variant in declaration order
/// - `name()`: the variant name as a static string
/// - `ordinal()`: the declaration index, usable for fixed-size table lookups
/// - a `Display` impl printing the variant name
///
/// # Example
///
/// ```
/// use crossing::signal_enum;
///
/// signal_enum! {
///     pub enum Lamp {
///         Off,
///         On,
///     }
/// }
///
/// assert_eq!(Lamp::ALL, &[Lamp::Off, Lamp::On]);
/// assert_eq!(Lamp::On.name(), "On");
/// assert_eq!(Lamp::On.ordinal(), 1);
/// assert_eq!(Lamp::Off.to_string(), "Off");
/// ```
#[macro_export]
macro_rules! signal_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Debug,
            serde::Serialize,
            serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),*];

            /// The variant name.
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            /// Declaration index of the variant.
            pub const fn ordinal(self) -> usize {
                self as usize
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}
