//! Data-access repository for pokemons and their child collections.
//!
//! A [`PokemonRepository`] is only ever handed out by a [`UnitOfWork`](crate::db::uow::UnitOfWork),
//! scoped to that unit of work's transaction; all staged writes performed through it commit or
//! roll back together.

use diesel::{delete, insert_into, update, BelongingToDsl, GroupedBy, OptionalExtension, QueryDsl};
use diesel_async::RunQueryDsl;
use diesel::{ExpressionMethods, QueryResult, SelectableHelper};

use crate::db::Connection;
use crate::helpers::db::paginate::Paginate;
use crate::models::ability::{Ability, NewAbility};
use crate::models::poke_type::{NewType, PokemonType};
use crate::models::pokemon::{NewPokemon, Pokemon};
use crate::models::stat::{NewStat, Stat};
use crate::schema::pokemons::all_columns;

/// Child rows of a set of pokemons, grouped per parent.
///
/// Groups appear in the same order as the parent slice passed to
/// [`load_children`](PokemonRepository::load_children).
pub type GroupedChildren = (Vec<Vec<Ability>>, Vec<Vec<Stat>>, Vec<Vec<PokemonType>>);

/// Narrow data-access interface over [`Pokemon`] entities and their children.
///
/// Borrows the transaction connection of the enclosing unit of work; every query issued
/// through it is part of that transaction.
pub struct PokemonRepository<'conn> {
    connection: &'conn mut Connection,
}

impl<'conn> PokemonRepository<'conn> {
    /// Creates a repository bound to the given transaction connection.
    pub(crate) fn new(connection: &'conn mut Connection) -> Self {
        Self { connection }
    }

    /// Returns the total number of pokemons in the database.
    pub async fn count(&mut self) -> QueryResult<i64> {
        use crate::schema::pokemons::dsl::*;

        pokemons.count().get_result(&mut *self.connection).await
    }

    /// Loads one page of pokemons, ordered by id, along with the total number of pages.
    pub async fn load_page(
        &mut self,
        page: i64,
        page_size: i64,
    ) -> QueryResult<(Vec<Pokemon>, i64)> {
        use crate::schema::pokemons::dsl::*;

        // A paginated query past the last page returns no rows, so the COUNT(*) OVER ()
        // window yields no total either. Fall back to a count query in that case; the
        // enclosing REPEATABLE READ transaction makes both queries see the same data.
        let paged_query_result = pokemons
            .order(id)
            .select(all_columns)
            .paginate(page, page_size)
            .load_and_count_pages::<Pokemon, _>(&mut *self.connection)
            .await;

        match paged_query_result {
            Ok((rows, 0)) if rows.is_empty() => {
                let pokemon_count = self.count().await?;
                let total_pages = (pokemon_count as f64 / page_size as f64).ceil() as i64;
                Ok((vec![], total_pages))
            },
            paged_query_result => paged_query_result,
        }
    }

    /// Returns the [`Pokemon`] with the given id, or `None` if there is none.
    pub async fn find(&mut self, pokemon_id: i64) -> QueryResult<Option<Pokemon>> {
        use crate::schema::pokemons::dsl::*;

        pokemons
            .find(pokemon_id)
            .first(&mut *self.connection)
            .await
            .optional()
    }

    /// Returns the [`Pokemon`] with the given exact name, or `None` if there is none.
    pub async fn find_by_name(&mut self, pokemon_name: &str) -> QueryResult<Option<Pokemon>> {
        use crate::schema::pokemons::dsl::*;

        pokemons
            .filter(name.eq(pokemon_name))
            .first(&mut *self.connection)
            .await
            .optional()
    }

    /// Inserts a new pokemon row and returns it, with its generated id.
    pub async fn insert(&mut self, new_pokemon: &NewPokemon) -> QueryResult<Pokemon> {
        use crate::schema::pokemons::dsl::*;

        insert_into(pokemons)
            .values(new_pokemon)
            .get_result(&mut *self.connection)
            .await
    }

    /// Overwrites all scalar columns of the pokemon with the given id and returns the
    /// updated row.
    ///
    /// Returns [`NotFound`](diesel::result::Error::NotFound) if no such pokemon exists.
    pub async fn update(
        &mut self,
        pokemon_id: i64,
        pokemon_update: &NewPokemon,
    ) -> QueryResult<Pokemon> {
        use crate::schema::pokemons::dsl::*;

        update(pokemons.find(pokemon_id))
            .set(pokemon_update)
            .get_result(&mut *self.connection)
            .await
    }

    /// Deletes the pokemon with the given id.
    ///
    /// Child rows are removed by the database through the cascade on the foreign keys.
    /// Returns the number of parent rows deleted (0 or 1).
    pub async fn delete(&mut self, pokemon_id: i64) -> QueryResult<usize> {
        use crate::schema::pokemons::dsl::*;

        delete(pokemons.find(pokemon_id))
            .execute(&mut *self.connection)
            .await
    }

    /// Loads the abilities, stats and types of the given pokemons, grouped per parent.
    pub async fn load_children(&mut self, parents: &[Pokemon]) -> QueryResult<GroupedChildren> {
        let abilities = Ability::belonging_to(parents)
            .select(Ability::as_select())
            .load(&mut *self.connection)
            .await?
            .grouped_by(parents);
        let stats = Stat::belonging_to(parents)
            .select(Stat::as_select())
            .load(&mut *self.connection)
            .await?
            .grouped_by(parents);
        let types = PokemonType::belonging_to(parents)
            .select(PokemonType::as_select())
            .load(&mut *self.connection)
            .await?
            .grouped_by(parents);

        Ok((abilities, stats, types))
    }

    /// Inserts the given child rows.
    pub async fn insert_children(
        &mut self,
        new_abilities: &[NewAbility],
        new_stats: &[NewStat],
        new_types: &[NewType],
    ) -> QueryResult<()> {
        if !new_abilities.is_empty() {
            insert_into(crate::schema::abilities::table)
                .values(new_abilities)
                .execute(&mut *self.connection)
                .await?;
        }
        if !new_stats.is_empty() {
            insert_into(crate::schema::stats::table)
                .values(new_stats)
                .execute(&mut *self.connection)
                .await?;
        }
        if !new_types.is_empty() {
            insert_into(crate::schema::types::table)
                .values(new_types)
                .execute(&mut *self.connection)
                .await?;
        }

        Ok(())
    }

    /// Replaces all child rows of a pokemon with the given ones.
    ///
    /// Update semantics are replace, not merge: any previously attached child absent from
    /// the new collections no longer exists afterwards.
    pub async fn replace_children(
        &mut self,
        owner_id: i64,
        new_abilities: &[NewAbility],
        new_stats: &[NewStat],
        new_types: &[NewType],
    ) -> QueryResult<()> {
        {
            use crate::schema::abilities::dsl::*;
            delete(abilities.filter(pokemon_id.eq(owner_id)))
                .execute(&mut *self.connection)
                .await?;
        }
        {
            use crate::schema::stats::dsl::*;
            delete(stats.filter(pokemon_id.eq(owner_id)))
                .execute(&mut *self.connection)
                .await?;
        }
        {
            use crate::schema::types::dsl::*;
            delete(types.filter(pokemon_id.eq(owner_id)))
                .execute(&mut *self.connection)
                .await?;
        }

        self.insert_children(new_abilities, new_stats, new_types)
            .await
    }
}
