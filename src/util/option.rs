use std::hint;

pub(crate) trait OptionExtension<T> {
    /// Unwraps an Option that the caller has proven to be Some.
    ///
    /// # Safety
    /// The Option must be Some. Debug builds check this with [`unreachable!`], release builds
    /// treat a None as undefined behavior.
    unsafe fn unreachable(self) -> T;
}

impl<T> OptionExtension<T> for Option<T> {
    #[track_caller]
    unsafe fn unreachable(self) -> T {
        match self {
            Some(val) => val,
            None if cfg!(debug_assertions) => unreachable!(),
            // SAFETY: The caller guarantees that self is Some.
            None => unsafe { hint::unreachable_unchecked() },
        }
    }
}
