//! [`Error`] type definition for our app.

use std::env;
use std::ffi::OsString;
use std::num::ParseIntError;

use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::put_object::PutObjectError;
use diesel_async::pooled_connection::deadpool::PoolError;

use crate::forward_from;

/// [`Result`](core::result::Result) type for our crate.
///
/// Uses our crate's [`Error`] type automatically.
pub type Result<T> = core::result::Result<T, Error>;

/// Error type used throughout this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error that occurred when loading data from an environment variable.
    #[error("error related to environment variable: {context}")]
    EnvVar {
        /// Environment variable error context.
        ///
        /// Used by the code (via [`EnvVarContext::with_env_var_context`]) to provide context for the error.
        context: String,

        /// Source of the environment error.
        source: EnvVarError,

        /// [`Backtrace`](std::backtrace::Backtrace) indicating where the error occurred.
        #[cfg(backtrace_support)]
        backtrace: std::backtrace::Backtrace,
    },

    /// Error caused by invalid user input.
    #[error("input parsing error")]
    Input {
        /// Source of the input error.
        #[from]
        source: actix_web_validator::error::Error,

        /// [`Backtrace`](std::backtrace::Backtrace) indicating where the error occurred.
        #[cfg(backtrace_support)]
        backtrace: std::backtrace::Backtrace,
    },

    /// Error related to the database connection pool.
    ///
    /// See [`PoolError`](deadpool::managed::PoolError) (and the inner [`diesel_async::pooled_connection::PoolError`])
    /// for more information.
    #[error("database connection error")]
    Pool {
        /// Source of the pool error.
        #[from]
        source: PoolError,

        /// [`Backtrace`](std::backtrace::Backtrace) indicating where the error occurred.
        #[cfg(backtrace_support)]
        backtrace: std::backtrace::Backtrace,
    },

    /// Error that occurred while performing a database query using [`diesel`].
    #[error("query error: {context}")]
    Query {
        /// Query error context.
        ///
        /// Used by the code (via [`QueryContext::with_query_context`]) to provide some context
        /// as to the type of query that caused the error.
        context: String,

        /// Source of the query error.
        source: diesel::result::Error,

        /// [`Backtrace`](std::backtrace::Backtrace) indicating where the error occurred.
        #[cfg(backtrace_support)]
        backtrace: std::backtrace::Backtrace,
    },

    /// Error that occurred while loading the bundled seed dataset.
    #[error("seed data error: {context}")]
    Seed {
        /// Seed error context.
        context: String,

        /// Source of the seed error.
        source: SeedError,

        /// [`Backtrace`](std::backtrace::Backtrace) indicating where the error occurred.
        #[cfg(backtrace_support)]
        backtrace: std::backtrace::Backtrace,
    },

    /// Error that occurred while exporting records to object storage.
    #[error("export error: {context}")]
    Export {
        /// Export error context.
        context: String,

        /// Source of the export error.
        source: ExportError,

        /// [`Backtrace`](std::backtrace::Backtrace) indicating where the error occurred.
        #[cfg(backtrace_support)]
        backtrace: std::backtrace::Backtrace,
    },
}

/// Error type used for errors related to environment variables.
///
/// This is our variant of [`VarError`], with additional variants for our specific use cases.
/// In particular, a [`From`] `impl` is provided to be able to convert a [`VarError`] to this type.
///
/// [`VarError`]: env::VarError
#[derive(Debug, thiserror::Error)]
pub enum EnvVarError {
    /// The environment variable did not exist.
    #[error("variable not found in environment")]
    NotFound,

    /// The environment variable could not be parsed to a Rust string because it contains
    /// invalid Unicode characters.
    #[error("variable contained invalid, non-Unicode characters")]
    NotUnicode(OsString),

    /// The environment variable was expected to contain an int value, but didn't.
    #[error("expected int value, found {value}")]
    IntExpected {
        /// The actual value found in the environment variable.
        value: String,

        /// The parsing error that occurred when we tried to parse the value as an int.
        source: ParseIntError,
    },
}

/// Error type for failures encountered while reading the bundled seed dataset.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The seed file could not be read from disk.
    #[error("failed to read seed file")]
    Io(#[from] std::io::Error),

    /// The seed file did not contain valid JSON for our import model.
    #[error("failed to parse seed file")]
    Json(#[from] serde_json::Error),

    /// An entry in the seed file failed validation.
    #[error("seed file contained an invalid entry")]
    Validation(#[from] validator::ValidationErrors),
}

/// Error type for failures encountered while exporting records to object storage.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The records could not be serialized to CSV.
    #[error("failed to serialize records to CSV")]
    Csv(#[from] csv::Error),

    /// The CSV object could not be uploaded to the storage bucket.
    #[error("failed to upload CSV object to storage")]
    Upload(#[from] Box<SdkError<PutObjectError>>),
}

impl From<env::VarError> for EnvVarError {
    /// Converts an `std` [`VarError`] to our intermediate [`EnvVarError`] type.
    ///
    /// Each variant of [`VarError`] has a corresponding variant in our [`EnvVarError`] type,
    /// so the mapping is straightforward.
    ///
    /// [`VarError`]: env::VarError
    fn from(value: env::VarError) -> Self {
        match value {
            env::VarError::NotPresent => Self::NotFound,
            env::VarError::NotUnicode(os_str) => Self::NotUnicode(os_str),
        }
    }
}

/// Helper trait to provide context for [`EnvVar`](Error::EnvVar) errors.
pub trait EnvVarContext {
    /// Type of output returned by [`with_env_var_context`](EnvVarContext::with_env_var_context).
    type Output;

    /// Provides context about the error that occurred.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::env;
    ///
    /// use pokevault_rs::error::EnvVarContext;
    ///
    /// # fn example() -> pokevault_rs::Result<()> {
    /// let db_url = env::var("DATABASE_URL")
    ///     .with_env_var_context(|| "DATABASE_URL environment variable should be set")?;
    /// #
    /// # Ok(())
    /// # }
    /// ```
    fn with_env_var_context<C, F>(self, context: F) -> Self::Output
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<E> EnvVarContext for E
where
    E: Into<EnvVarError>,
{
    type Output = Error;

    fn with_env_var_context<C, F>(self, context: F) -> Self::Output
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        Error::EnvVar {
            context: (context)().into(),
            source: self.into(),
            #[cfg(backtrace_support)]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

impl<T, E> EnvVarContext for core::result::Result<T, E>
where
    E: EnvVarContext<Output = Error>,
{
    type Output = Result<T>;

    fn with_env_var_context<C, F>(self, context: F) -> Self::Output
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| err.with_env_var_context(context))
    }
}

forward_from!(diesel_async::pooled_connection::PoolError => PoolError => Error);

impl From<deadpool::managed::BuildError> for Error {
    /// Converts a [`BuildError`](deadpool::managed::BuildError) into our [`Error`] type.
    ///
    /// This makes it possible to use `?` when building a connection pool.
    fn from(value: deadpool::managed::BuildError) -> Self {
        match value {
            deadpool::managed::BuildError::NoRuntimeSpecified => {
                panic!("Runtime should be specified in Cargo.toml: {}", value);
            },
        }
    }
}

/// Helper trait to provide context for [`Query`](Error::Query) errors.
pub trait QueryContext {
    /// Type of output returned by [`with_query_context`](QueryContext::with_query_context).
    type Output;

    /// Provides context about the query performed when the error occurred.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use diesel::QueryDsl;
    /// use diesel_async::RunQueryDsl;
    /// use pokevault_rs::error::QueryContext;
    /// # use pokevault_rs::db::{get_pool, PooledConnection};
    /// use pokevault_rs::models::pokemon::Pokemon;
    /// use pokevault_rs::schema::pokemons::dsl::*;
    ///
    /// # async fn example(pokemon_id: i64) -> pokevault_rs::Result<()> {
    /// # let pool = get_pool()?;
    /// # let mut connection = pool.get().await?;
    /// #
    /// let pokemon: Pokemon = pokemons
    ///     .find(pokemon_id)
    ///     .first(&mut connection)
    ///     .await
    ///     .with_query_context(|| format!("failed to fetch pokemon with id {}", pokemon_id))?;
    /// #
    /// # Ok(())
    /// # }
    /// ```
    fn with_query_context<C, F>(self, context: F) -> Self::Output
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl QueryContext for diesel::result::Error {
    type Output = Error;

    fn with_query_context<C, F>(self, context: F) -> Self::Output
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        Error::Query {
            context: (context)().into(),
            source: self,
            #[cfg(backtrace_support)]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

impl<T, E> QueryContext for core::result::Result<T, E>
where
    E: QueryContext<Output = Error>,
{
    type Output = Result<T>;

    fn with_query_context<C, F>(self, context: F) -> Self::Output
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| err.with_query_context(context))
    }
}

/// Helper trait to provide context for [`Seed`](Error::Seed) errors.
pub trait SeedContext {
    /// Type of output returned by [`with_seed_context`](SeedContext::with_seed_context).
    type Output;

    /// Provides context about the seed-loading step that failed.
    fn with_seed_context<C, F>(self, context: F) -> Self::Output
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<E> SeedContext for E
where
    E: Into<SeedError>,
{
    type Output = Error;

    fn with_seed_context<C, F>(self, context: F) -> Self::Output
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        Error::Seed {
            context: (context)().into(),
            source: self.into(),
            #[cfg(backtrace_support)]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

impl<T, E> SeedContext for core::result::Result<T, E>
where
    E: SeedContext<Output = Error>,
{
    type Output = Result<T>;

    fn with_seed_context<C, F>(self, context: F) -> Self::Output
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| err.with_seed_context(context))
    }
}

/// Helper trait to provide context for [`Export`](Error::Export) errors.
pub trait ExportContext {
    /// Type of output returned by [`with_export_context`](ExportContext::with_export_context).
    type Output;

    /// Provides context about the export operation that failed.
    fn with_export_context<C, F>(self, context: F) -> Self::Output
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<E> ExportContext for E
where
    E: Into<ExportError>,
{
    type Output = Error;

    fn with_export_context<C, F>(self, context: F) -> Self::Output
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        Error::Export {
            context: (context)().into(),
            source: self.into(),
            #[cfg(backtrace_support)]
            backtrace: std::backtrace::Backtrace::capture(),
        }
    }
}

impl<T, E> ExportContext for core::result::Result<T, E>
where
    E: ExportContext<Output = Error>,
{
    type Output = Result<T>;

    fn with_export_context<C, F>(self, context: F) -> Self::Output
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|err| err.with_export_context(context))
    }
}
