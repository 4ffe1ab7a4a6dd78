//! Macros for declaring lesson markers.

/// Declare a marker enum and derive its `Marker` implementation.
///
/// Markers are ordered by declaration position, so the enum must be
/// fieldless and must not assign explicit discriminants.
///
/// # Example
///
/// ```
/// use guidepost::core::Marker;
/// use guidepost::marker_enum;
///
/// marker_enum! {
///     /// Steps of the distance stage.
///     pub enum DistanceStep {
///         AngSiz1,
///         AngSiz2,
///         EstDis1,
///     }
/// }
///
/// assert_eq!(DistanceStep::EstDis1.index(), 2);
/// assert_eq!(DistanceStep::AngSiz2.name(), "AngSiz2");
/// assert_eq!(DistanceStep::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! marker_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),+
        }

        impl $crate::core::Marker for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn index(&self) -> usize {
                *self as usize
            }

            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }
        }
    };
}
