use std::fmt::{self, Debug, Formatter};

use super::{SumType1, Variant};
use crate::error::ValueMissing;
use crate::util::result::ResultExtension;

/// A value that may or may not be present, stored in a [`SumType1`].
///
/// Optional starts out empty and only gains a value through an explicit constructing operation:
/// [`make_optional`], [`emplace`](Optional::emplace) or [`replace`](Optional::replace). Cloning
/// produces an independent copy of the value, and [`take`](Optional::take) moves it out,
/// leaving the source empty.
///
/// Optional converts to and from [`Option`] for free, which is the way into the rest of the
/// standard library.
///
/// # Examples
/// ```
/// # use stowage::variant::{make_optional, Optional};
/// let mut name = make_optional(String::from("stowage"));
/// assert!(name.has_value());
/// assert_eq!(name.value(), "stowage");
///
/// let moved = name.take();
/// assert!(!name.has_value());
/// assert_eq!(moved.value_or(String::new()), "stowage");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Optional<T> {
    pub(crate) cell: SumType1<T>,
}

/// Creates an Optional holding `value`.
pub fn make_optional<T>(value: T) -> Optional<T> {
    Optional {
        cell: SumType1::make::<0>(value),
    }
}

impl<T> Optional<T> {
    /// Creates an empty Optional.
    pub const fn none() -> Optional<T> {
        Optional {
            cell: SumType1::new(),
        }
    }

    pub fn has_value(&self) -> bool {
        !self.cell.is_empty()
    }

    /// Returns a reference to the contained value.
    ///
    /// # Panics
    /// Panics if the Optional is empty.
    #[track_caller]
    pub fn value(&self) -> &T {
        self.cell.get::<0>().ok_or(ValueMissing).throw()
    }

    /// Returns a mutable reference to the contained value.
    ///
    /// # Panics
    /// Panics if the Optional is empty.
    #[track_caller]
    pub fn value_mut(&mut self) -> &mut T {
        self.cell.get_mut::<0>().ok_or(ValueMissing).throw()
    }

    /// Consumes the Optional, returning the contained value.
    ///
    /// # Panics
    /// Panics if the Optional is empty.
    #[track_caller]
    pub fn into_value(self) -> T {
        self.into_option().ok_or(ValueMissing).throw()
    }

    /// Returns the contained value, or `default` if the Optional is empty.
    pub fn value_or(self, default: T) -> T {
        self.into_option().unwrap_or(default)
    }

    /// Moves the value out, leaving the Optional empty.
    pub fn take(&mut self) -> Optional<T> {
        Optional {
            cell: self.cell.take(),
        }
    }

    /// Stores `value`, returning the previous value if there was one.
    pub fn replace(&mut self, value: T) -> Optional<T> {
        let previous = self.take();
        self.cell = SumType1::make::<0>(value);
        previous
    }

    /// Stores `value`, dropping the previous value first, and returns a reference to it.
    pub fn emplace(&mut self, value: T) -> &mut T {
        self.cell.emplace::<0>(value)
    }

    /// Drops the contained value, if any.
    pub fn reset(&mut self) {
        self.cell.reset();
    }

    pub fn as_ref(&self) -> Option<&T> {
        self.cell.get::<0>()
    }

    pub fn as_mut(&mut self) -> Option<&mut T> {
        self.cell.get_mut::<0>()
    }

    pub fn into_option(self) -> Option<T> {
        <SumType1<T> as Variant<0>>::into_inner(self.cell).ok()
    }

    /// Applies `f` to the contained value, if any.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Optional<U> {
        self.into_option().map(f).into()
    }

    /// Converts the contained value with [`From`].
    pub fn cast<U: From<T>>(self) -> Optional<U> {
        self.map(U::from)
    }
}

impl<T> Default for Optional<T> {
    fn default() -> Self {
        Optional::none()
    }
}

impl<T> From<Option<T>> for Optional<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => make_optional(value),
            None => Optional::none(),
        }
    }
}

impl<T> From<Optional<T>> for Option<T> {
    fn from(value: Optional<T>) -> Self {
        value.into_option()
    }
}

impl<T: Debug> Debug for Optional<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.as_ref() {
            Some(value) => f.debug_tuple("Optional").field(value).finish(),
            None => write!(f, "Optional(-)"),
        }
    }
}
