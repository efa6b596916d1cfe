//! Transactional unit of work over the Pokevault database.
//!
//! A [`UnitOfWork`] binds a group of repository operations to one pooled connection and one
//! database transaction, so that a multi-table write (a pokemon plus its three child
//! collections) is atomic: either everything commits together, or everything rolls back.

use diesel::QueryResult;
use diesel_async::scoped_futures::ScopedBoxFuture;
use diesel_async::AsyncConnection;

use crate::db::repository::PokemonRepository;
use crate::db::{Pool, PooledConnection};

/// A scope binding data-access operations to a single atomic transaction.
///
/// The unit of work owns one [`PooledConnection`] for its whole lifetime. Each call to
/// [`run`](UnitOfWork::run) or [`run_read`](UnitOfWork::run_read) opens a transaction on that
/// connection, hands a [`PokemonRepository`] scoped to the transaction to the given closure,
/// and then either commits (closure returned `Ok`) or rolls back (closure returned `Err`,
/// including any database error during a staged write). The caller sees a single surfaced
/// error, never a partial commit.
///
/// Nesting is not supported; use at most one scope per request.
///
/// # Examples
///
/// ```no_run
/// use diesel_async::scoped_futures::ScopedFutureExt;
/// # use pokevault_rs::db::get_pool;
/// use pokevault_rs::db::uow::UnitOfWork;
/// use pokevault_rs::error::QueryContext;
///
/// # async fn example(pokemon_id: i64) -> pokevault_rs::Result<()> {
/// # let pool = get_pool()?;
/// let mut uow = UnitOfWork::begin(&pool).await?;
/// let deleted = uow
///     .run(|mut repo| async move { repo.delete(pokemon_id).await }.scope_boxed())
///     .await
///     .with_query_context(|| format!("failed to delete pokemon {}", pokemon_id))?;
/// #
/// # Ok(())
/// # }
/// ```
pub struct UnitOfWork {
    connection: PooledConnection,
}

impl UnitOfWork {
    /// Opens a new unit of work, acquiring a connection from the given [`Pool`].
    pub async fn begin(pool: &Pool) -> crate::Result<Self> {
        Ok(Self { connection: pool.get().await? })
    }

    /// Runs the given closure inside a read-write transaction.
    ///
    /// The closure receives a [`PokemonRepository`] bound to the transaction. If it returns
    /// `Ok`, all staged writes are committed together; on `Err`, the transaction is rolled
    /// back and the error is returned as-is.
    pub async fn run<'a, R, F>(&mut self, f: F) -> QueryResult<R>
    where
        F: for<'r> FnOnce(PokemonRepository<'r>) -> ScopedBoxFuture<'a, 'r, QueryResult<R>>
            + Send
            + 'a,
        R: Send + 'a,
    {
        self.connection
            .transaction(|connection| f(PokemonRepository::new(connection)))
            .await
    }

    /// Runs the given closure inside a read-only, `REPEATABLE READ` transaction.
    ///
    /// Used for multi-query reads (like a paginated load followed by child lookups) so that
    /// all queries in the scope see the same snapshot of the data.
    pub async fn run_read<'a, R, F>(&mut self, f: F) -> QueryResult<R>
    where
        F: for<'r> FnOnce(PokemonRepository<'r>) -> ScopedBoxFuture<'a, 'r, QueryResult<R>>
            + Send
            + 'a,
        R: Send + 'a,
    {
        self.connection
            .build_transaction()
            .read_only()
            .repeatable_read()
            .run(|connection| f(PokemonRepository::new(connection)))
            .await
    }
}
