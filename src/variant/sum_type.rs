use std::mem;

use derive_more::IsVariant;

use crate::error::WrongVariant;
use crate::util::option::OptionExtension;
use crate::util::result::ResultExtension;

/// Typed access to the case at index `I` of a sum type.
///
/// Each `SumTypeN` implements `Variant<I>` for every `I` below `N`, which lets the index-based
/// methods ([`SumType2::make`], [`SumType2::get`] and friends) resolve the type of a case at
/// compile time. An index that doesn't name a case is a compile error rather than a runtime one.
pub trait Variant<const I: usize>: Sized {
    /// The type stored in this case.
    type Type;

    /// Creates a cell holding `value` in this case.
    fn make(value: Self::Type) -> Self;

    /// Returns the value if this case is the active one.
    fn get(&self) -> Option<&Self::Type>;

    fn get_mut(&mut self) -> Option<&mut Self::Type>;

    /// Moves the value out if this case is the active one, otherwise gives the cell back.
    fn into_inner(self) -> Result<Self::Type, Self>;
}

macro_rules! sum_type {
    (@variants $name:ident $generics:tt $($index:literal $case:ident $ty:ident)+) => {
        $(sum_type!(@variant $name $generics $index $case $ty);)+
    };
    (@variant $name:ident [$($T:ident),+] $index:literal $case:ident $ty:ident) => {
        impl<$($T),+> Variant<$index> for $name<$($T),+> {
            type Type = $ty;

            fn make(value: $ty) -> Self {
                $name::$case(value)
            }

            fn get(&self) -> Option<&$ty> {
                match self {
                    $name::$case(value) => Some(value),
                    _ => None,
                }
            }

            fn get_mut(&mut self) -> Option<&mut $ty> {
                match self {
                    $name::$case(value) => Some(value),
                    _ => None,
                }
            }

            fn into_inner(self) -> Result<$ty, Self> {
                match self {
                    $name::$case(value) => Ok(value),
                    other => Err(other),
                }
            }
        }
    };
    (
        $(#[$meta:meta])*
        $name:ident<$($T:ident),+> { $($index:literal => $case:ident($ty:ident)),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IsVariant)]
        pub enum $name<$($T),+> {
            /// No case is active.
            Empty,
            $($case($ty)),+
        }

        impl<$($T),+> $name<$($T),+> {
            /// Creates an empty cell.
            pub const fn new() -> Self {
                $name::Empty
            }

            /// Creates a cell holding `value` in case `I`.
            pub fn make<const I: usize>(value: <Self as Variant<I>>::Type) -> Self
            where
                Self: Variant<I>,
            {
                <Self as Variant<I>>::make(value)
            }

            /// Returns the index of the active case, or None if the cell is empty.
            pub const fn index(&self) -> Option<usize> {
                match self {
                    $name::Empty => None,
                    $($name::$case(_) => Some($index)),+
                }
            }

            /// Returns a reference to the value of case `I`, or None if another case is active.
            pub fn get<const I: usize>(&self) -> Option<&<Self as Variant<I>>::Type>
            where
                Self: Variant<I>,
            {
                <Self as Variant<I>>::get(self)
            }

            pub fn get_mut<const I: usize>(&mut self) -> Option<&mut <Self as Variant<I>>::Type>
            where
                Self: Variant<I>,
            {
                <Self as Variant<I>>::get_mut(self)
            }

            /// Returns a reference to the value of case `I`.
            ///
            /// # Panics
            /// Panics if case `I` isn't the active one.
            #[track_caller]
            pub fn value<const I: usize>(&self) -> &<Self as Variant<I>>::Type
            where
                Self: Variant<I>,
            {
                let found = self.index();
                <Self as Variant<I>>::get(self)
                    .ok_or(WrongVariant { expected: I, found })
                    .throw()
            }

            /// Returns a mutable reference to the value of case `I`.
            ///
            /// # Panics
            /// Panics if case `I` isn't the active one.
            #[track_caller]
            pub fn value_mut<const I: usize>(&mut self) -> &mut <Self as Variant<I>>::Type
            where
                Self: Variant<I>,
            {
                let found = self.index();
                <Self as Variant<I>>::get_mut(self)
                    .ok_or(WrongVariant { expected: I, found })
                    .throw()
            }

            /// Replaces the contents of the cell with `value` in case `I`, dropping the previous
            /// value first, and returns a reference to the new value.
            pub fn emplace<const I: usize>(
                &mut self,
                value: <Self as Variant<I>>::Type,
            ) -> &mut <Self as Variant<I>>::Type
            where
                Self: Variant<I>,
            {
                // Drop the old value before the new one moves in.
                self.reset();
                *self = <Self as Variant<I>>::make(value);
                // SAFETY: Case I was made on the line above.
                unsafe { <Self as Variant<I>>::get_mut(self).unreachable() }
            }

            /// Moves the value of case `I` out, leaving the cell empty. Returns None and leaves
            /// the cell untouched if another case is active.
            pub fn take_value<const I: usize>(&mut self) -> Option<<Self as Variant<I>>::Type>
            where
                Self: Variant<I>,
            {
                if <Self as Variant<I>>::get(self).is_some() {
                    <Self as Variant<I>>::into_inner(self.take()).ok()
                } else {
                    None
                }
            }

            /// Drops the active value, if any, leaving the cell empty.
            pub fn reset(&mut self) {
                *self = $name::Empty;
            }

            /// Moves the contents out, leaving the cell empty.
            pub fn take(&mut self) -> Self {
                mem::replace(self, $name::Empty)
            }

            /// Exchanges the contents of two cells, whichever cases are active.
            pub fn swap(&mut self, other: &mut Self) {
                mem::swap(self, other);
            }
        }

        impl<$($T),+> Default for $name<$($T),+> {
            fn default() -> Self {
                $name::Empty
            }
        }

        sum_type!(@variants $name [$($T),+] $($index $case $ty)+);
    };
}

sum_type! {
    /// Storage for a value of `T0`, or nothing. This is the cell behind
    /// [`Optional`](crate::variant::Optional).
    SumType1<T0> {
        0 => V0(T0),
    }
}

sum_type! {
    /// Storage for a value of one of two types, or nothing. This is the cell behind
    /// [`Either`](crate::variant::Either).
    ///
    /// # Examples
    /// ```
    /// # use stowage::variant::SumType2;
    /// let mut cell = SumType2::<u32, String>::make::<1>("hello".into());
    /// assert_eq!(cell.index(), Some(1));
    /// assert_eq!(cell.get::<0>(), None);
    /// assert_eq!(cell.value::<1>(), "hello");
    ///
    /// cell.emplace::<0>(5);
    /// assert_eq!(cell, SumType2::V0(5));
    ///
    /// cell.reset();
    /// assert!(cell.is_empty());
    /// ```
    SumType2<T0, T1> {
        0 => V0(T0),
        1 => V1(T1),
    }
}

sum_type! {
    /// Storage for a value of one of three types, or nothing.
    SumType3<T0, T1, T2> {
        0 => V0(T0),
        1 => V1(T1),
        2 => V2(T2),
    }
}

sum_type! {
    /// Storage for a value of one of four types, or nothing.
    SumType4<T0, T1, T2, T3> {
        0 => V0(T0),
        1 => V1(T1),
        2 => V2(T2),
        3 => V3(T3),
    }
}
