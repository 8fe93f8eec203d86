//! Macros for declaring closed state sets.

/// Generate a `State` implementation for a fieldless enum.
///
/// Every declared variant becomes a member of the closed set returned by
/// `State::variants`.
///
/// # Example
///
/// ```
/// use framekit::core::State;
/// use framekit::state_enum;
///
/// state_enum! {
///     pub enum Door {
///         Open,
///         Closed,
///         Broken,
///     }
///     final: [Broken]
/// }
///
/// assert_eq!(Door::variants(), &[Door::Open, Door::Closed, Door::Broken]);
/// assert!(Door::Broken.is_final());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn variants() -> &'static [Self] {
                &[$(Self::$variant),*]
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }
        }
    };
}
