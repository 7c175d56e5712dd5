use std::fmt::{self, Debug, Formatter};

use super::{make_left, make_right, Either};
use crate::util::result::ResultExtension;

type StdResult<T, E> = core::result::Result<T, E>;

/// The outcome of an operation that can fail: a value of `T`, or an error of `E`. A Result is an
/// [`Either`] with the value on the left and the error on the right.
///
/// A failed Result is usually built from an [`Error`], which converts into a Result of any value
/// type.
///
/// # Examples
/// ```
/// # use stowage::variant::{ok, Error, Result};
/// fn halve(n: u32) -> Result<u32, String> {
///     if n % 2 == 0 {
///         ok(n / 2)
///     } else {
///         Error(format!("{n} is odd")).into()
///     }
/// }
///
/// assert_eq!(*halve(8).value(), 4);
/// assert!(halve(7).is_error());
/// assert_eq!(halve(7).into_error(), "7 is odd");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Result<T, E> {
    pub(crate) inner: Either<T, E>,
}

/// Wraps an error to be converted into a failed [`Result`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Error<E>(pub E);

impl<E> Error<E> {
    pub const fn error(&self) -> &E {
        &self.0
    }

    pub fn into_error(self) -> E {
        self.0
    }
}

/// Creates a successful Result holding `value`.
pub fn ok<T, E>(value: T) -> Result<T, E> {
    Result {
        inner: make_left(value),
    }
}

/// Creates a failed Result holding `error`.
pub fn err<T, E>(error: E) -> Result<T, E> {
    Result {
        inner: make_right(error),
    }
}

impl<T, E> Result<T, E> {
    pub fn has_value(&self) -> bool {
        self.inner.is_left()
    }

    pub fn is_error(&self) -> bool {
        self.inner.is_right()
    }

    /// # Panics
    /// Panics if the Result holds an error.
    #[track_caller]
    pub fn value(&self) -> &T {
        self.inner.left()
    }

    /// # Panics
    /// Panics if the Result holds an error.
    #[track_caller]
    pub fn value_mut(&mut self) -> &mut T {
        self.inner.left_mut()
    }

    /// # Panics
    /// Panics if the Result holds a value.
    #[track_caller]
    pub fn error(&self) -> &E {
        self.inner.right()
    }

    /// Consumes the Result, returning the value.
    ///
    /// # Panics
    /// Panics if the Result holds an error.
    #[track_caller]
    pub fn into_value(self) -> T {
        self.inner.into_left()
    }

    /// Consumes the Result, returning the error.
    ///
    /// # Panics
    /// Panics if the Result holds a value.
    #[track_caller]
    pub fn into_error(self) -> E {
        self.inner.into_right()
    }

    pub fn value_ref(&self) -> Option<&T> {
        self.inner.left_ref()
    }

    pub fn error_ref(&self) -> Option<&E> {
        self.inner.right_ref()
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Result<U, E> {
        Result {
            inner: self.inner.map_left(f),
        }
    }

    pub fn map_error<G, F: FnOnce(E) -> G>(self, f: F) -> Result<T, G> {
        Result {
            inner: self.inner.map_right(f),
        }
    }

    /// Converts into a [`core::result::Result`], so that `?` can be used on it.
    pub fn into_std(self) -> StdResult<T, E> {
        self.inner.into_std()
    }
}

impl<T, E: std::error::Error> Result<T, E> {
    /// Returns the value, treating an error as fatal: it is logged with the caller's location
    /// and the thread panics with its message.
    ///
    /// # Panics
    /// Panics if the Result holds an error.
    #[track_caller]
    pub fn throw(self) -> T {
        self.into_std().throw()
    }
}

impl<T, E> From<Error<E>> for Result<T, E> {
    fn from(error: Error<E>) -> Self {
        err(error.0)
    }
}

impl<T, E> From<StdResult<T, E>> for Result<T, E> {
    fn from(value: StdResult<T, E>) -> Self {
        match value {
            Ok(value) => ok(value),
            Err(error) => err(error),
        }
    }
}

impl<T, E> From<Result<T, E>> for StdResult<T, E> {
    fn from(value: Result<T, E>) -> Self {
        value.into_std()
    }
}

impl<T: Debug, E: Debug> Debug for Result<T, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.inner.as_ref().into_std() {
            Ok(value) => f.debug_tuple("Ok").field(value).finish(),
            Err(error) => f.debug_tuple("Error").field(error).finish(),
        }
    }
}
