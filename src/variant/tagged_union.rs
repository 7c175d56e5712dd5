use std::fmt::Debug;

/// A labelled sum type: an enum whose cases are described by a companion tag enum.
///
/// Implemented by [`tagged_union!`](crate::tagged_union), which generates both enums. Cases are
/// made with the union's own variant constructors and taken apart with a native `match`, which
/// the compiler checks for exhaustiveness.
pub trait TaggedUnion {
    /// The fieldless enum of case labels.
    type Tag: Copy + Eq + Debug + 'static;

    /// Every label, in declaration order. The position of a label is its index.
    const TAGS: &'static [Self::Tag];

    /// Returns the label of the active case.
    fn tag(&self) -> Self::Tag;

    /// Returns the index of the active case, in declaration order.
    fn index(&self) -> usize;
}

/// Declares a tagged union: an enum with one case per label, a fieldless tag enum with the same
/// labels, and an implementation of [`TaggedUnion`](crate::variant::TaggedUnion) connecting the
/// two.
///
/// Each case holds at most one value. The union gets `is_<case>()` predicates, and the tag enum
/// gets `name`, `index` and `from_index`, as well as a `Display` implementation
/// printing the label.
///
/// # Examples
/// ```
/// use stowage::tagged_union;
/// use stowage::variant::TaggedUnion;
///
/// tagged_union! {
///     #[derive(Debug, Clone, PartialEq)]
///     pub enum Shape: ShapeTag {
///         Circle(f64),
///         Square(f64),
///         Point,
///     }
/// }
///
/// let shape = Shape::Square(2.0);
/// assert_eq!(shape.tag(), ShapeTag::Square);
/// assert_eq!(shape.tag().name(), "Square");
/// assert_eq!(shape.index(), 1);
/// assert!(shape.is_square());
///
/// let area = match shape {
///     Shape::Circle(r) => std::f64::consts::PI * r * r,
///     Shape::Square(side) => side * side,
///     Shape::Point => 0.0,
/// };
/// assert_eq!(area, 4.0);
///
/// assert_eq!(Shape::TAGS, &[ShapeTag::Circle, ShapeTag::Square, ShapeTag::Point]);
/// assert_eq!(ShapeTag::from_index(2), Some(ShapeTag::Point));
/// assert_eq!(ShapeTag::from_index(3), None);
/// ```
#[macro_export]
macro_rules! tagged_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident: $tag:ident {
            $($case:ident $(($ty:ty))?),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive($crate::__private::derive_more::IsVariant)]
        $vis enum $name {
            $($case $(($ty))?),+
        }

        #[doc = concat!("The case labels of [`", stringify!($name), "`].")]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $tag {
            $($case),+
        }

        impl $tag {
            /// Every label, in declaration order.
            pub const ALL: &'static [$tag] = &[$($tag::$case),+];

            /// Returns the label as written in the declaration.
            pub const fn name(self) -> &'static str {
                match self {
                    $($tag::$case => stringify!($case)),+
                }
            }

            pub const fn index(self) -> usize {
                self as usize
            }

            /// Returns the label at `index`, or None if there are fewer cases.
            pub const fn from_index(index: usize) -> Option<$tag> {
                if index < Self::ALL.len() {
                    Some(Self::ALL[index])
                } else {
                    None
                }
            }
        }

        impl ::core::fmt::Display for $tag {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl $crate::variant::TaggedUnion for $name {
            type Tag = $tag;

            const TAGS: &'static [$tag] = $tag::ALL;

            fn tag(&self) -> $tag {
                match self {
                    $($name::$case { .. } => $tag::$case),+
                }
            }

            fn index(&self) -> usize {
                self.tag().index()
            }
        }
    };
}
