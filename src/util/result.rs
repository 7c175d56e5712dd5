use std::error::Error;
use std::panic::Location;

pub(crate) trait ResultExtension<T, E: Error> {
    /// A method similar to [`Result::unwrap`], except that it applies only to types which implement
    /// [`Error`] and panics with the message of the error itself. The error is logged along with
    /// the location of the caller before panicking.
    ///
    /// # Panics
    /// Panics if the [`Result`] is an [`Err`].
    fn throw(self) -> T;
}

impl<T, E: Error> ResultExtension<T, E> for Result<T, E> {
    #[track_caller]
    fn throw(self) -> T {
        match self {
            Ok(val) => val,
            Err(error) => fatal(error),
        }
    }
}

/// Logs `error` with the caller's location and panics with its message.
#[track_caller]
pub(crate) fn fatal<E: Error>(error: E) -> ! {
    let location = Location::caller();
    log::error!("{}:{}: {}", location.file(), location.line(), error);
    panic!("{}", error)
}
