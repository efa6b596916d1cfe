//! General-purpose helper macros.

/// Generates a [`From`] implementation that goes through an intermediate type.
///
/// Useful when an error type already converts to an intermediate error which itself
/// converts to our crate's [`Error`](crate::Error), but `?` needs a direct conversion.
///
/// # Examples
///
/// ```ignore
/// forward_from!(diesel_async::pooled_connection::PoolError => PoolError => Error);
/// ```
#[macro_export]
macro_rules! forward_from {
    ($from:ty => $via:ty => $to:ty) => {
        impl From<$from> for $to {
            fn from(value: $from) -> Self {
                Into::<$via>::into(value).into()
            }
        }
    };
}
