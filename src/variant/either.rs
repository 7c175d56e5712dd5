use std::fmt::{self, Debug, Formatter};

use super::{SumType2, Variant};
use crate::error::WrongVariant;
use crate::util::option::OptionExtension;
use crate::util::result::ResultExtension;

/// A value of one of two types, stored in a [`SumType2`]. Unlike the cell, an Either is never
/// empty: it is created holding one side and can only be replaced by another Either.
///
/// The side-specific accessors ([`left`](Either::left), [`into_right`](Either::into_right)
/// etc.) treat asking for the inactive side as a programming error and panic. The `_ref`
/// accessors return an [`Option`] instead.
///
/// # Examples
/// ```
/// # use stowage::variant::{Either, Left, Right};
/// let parsed: Either<u32, String> = match "12".parse::<u32>() {
///     Ok(n) => Left(n).into(),
///     Err(_) => Right("not a number".to_string()).into(),
/// };
/// assert!(parsed.is_left());
/// assert_eq!(*parsed.left(), 12);
/// assert_eq!(parsed.right_ref(), None);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Either<L, R> {
    pub(crate) cell: SumType2<L, R>,
}

/// Wraps a value to be converted into the left side of an [`Either`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Left<L>(pub L);

/// Wraps a value to be converted into the right side of an [`Either`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Right<R>(pub R);

pub fn make_left<L, R>(value: L) -> Either<L, R> {
    Either {
        cell: SumType2::make::<0>(value),
    }
}

pub fn make_right<L, R>(value: R) -> Either<L, R> {
    Either {
        cell: SumType2::make::<1>(value),
    }
}

impl<L, R> Either<L, R> {
    pub fn is_left(&self) -> bool {
        self.cell.index() == Some(0)
    }

    pub fn is_right(&self) -> bool {
        self.cell.index() == Some(1)
    }

    /// # Panics
    /// Panics if the right side is active.
    #[track_caller]
    pub fn left(&self) -> &L {
        self.cell.value::<0>()
    }

    /// # Panics
    /// Panics if the right side is active.
    #[track_caller]
    pub fn left_mut(&mut self) -> &mut L {
        self.cell.value_mut::<0>()
    }

    /// # Panics
    /// Panics if the left side is active.
    #[track_caller]
    pub fn right(&self) -> &R {
        self.cell.value::<1>()
    }

    /// # Panics
    /// Panics if the left side is active.
    #[track_caller]
    pub fn right_mut(&mut self) -> &mut R {
        self.cell.value_mut::<1>()
    }

    pub fn left_ref(&self) -> Option<&L> {
        self.cell.get::<0>()
    }

    pub fn right_ref(&self) -> Option<&R> {
        self.cell.get::<1>()
    }

    /// Consumes the Either, returning the left value.
    ///
    /// # Panics
    /// Panics if the right side is active.
    #[track_caller]
    pub fn into_left(self) -> L {
        self.into_std()
            .map_err(|_| WrongVariant { expected: 0, found: Some(1) })
            .throw()
    }

    /// Consumes the Either, returning the right value.
    ///
    /// # Panics
    /// Panics if the left side is active.
    #[track_caller]
    pub fn into_right(self) -> R {
        let right = match self.into_std() {
            Ok(_) => Err(WrongVariant { expected: 1, found: Some(0) }),
            Err(right) => Ok(right),
        };
        right.throw()
    }

    /// Converts into a [`std::result::Result`], with the left side as `Ok`.
    pub fn into_std(self) -> Result<L, R> {
        match <SumType2<L, R> as Variant<0>>::into_inner(self.cell) {
            Ok(left) => Ok(left),
            Err(cell) => {
                let right = <SumType2<L, R> as Variant<1>>::into_inner(cell).ok();
                // SAFETY: An Either is never empty, so if the left side isn't active the right
                // side is.
                Err(unsafe { right.unreachable() })
            },
        }
    }

    /// Borrows both sides.
    pub fn as_ref(&self) -> Either<&L, &R> {
        match self.left_ref() {
            Some(left) => make_left(left),
            // SAFETY: As in into_std.
            None => make_right(unsafe { self.right_ref().unreachable() }),
        }
    }

    pub fn map_left<M, F: FnOnce(L) -> M>(self, f: F) -> Either<M, R> {
        match self.into_std() {
            Ok(left) => make_left(f(left)),
            Err(right) => make_right(right),
        }
    }

    pub fn map_right<M, F: FnOnce(R) -> M>(self, f: F) -> Either<L, M> {
        match self.into_std() {
            Ok(left) => make_left(left),
            Err(right) => make_right(f(right)),
        }
    }

    /// Swaps the sides, so that left becomes right and right becomes left.
    pub fn flip(self) -> Either<R, L> {
        match self.into_std() {
            Ok(left) => make_right(left),
            Err(right) => make_left(right),
        }
    }

    /// Converts each side with [`From`], keeping the active side.
    pub fn cast<L2: From<L>, R2: From<R>>(self) -> Either<L2, R2> {
        self.map_left(L2::from).map_right(R2::from)
    }
}

impl<L, R> From<Left<L>> for Either<L, R> {
    fn from(value: Left<L>) -> Self {
        make_left(value.0)
    }
}

impl<L, R> From<Right<R>> for Either<L, R> {
    fn from(value: Right<R>) -> Self {
        make_right(value.0)
    }
}

impl<L: Debug, R: Debug> Debug for Either<L, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.as_ref().into_std() {
            Ok(left) => f.debug_tuple("Left").field(left).finish(),
            Err(right) => f.debug_tuple("Right").field(right).finish(),
        }
    }
}
