//! Service used to load and save pokemons. Used by the Pokevault REST API.

use std::cmp::min;

use diesel::{NotFound, QueryResult};
use diesel_async::scoped_futures::ScopedFutureExt;
use serde::{Deserialize, Serialize};
use utoipa::ToResponse;

use crate::db::repository::PokemonRepository;
use crate::db::uow::UnitOfWork;
use crate::db::Pool;
use crate::error::QueryContext;
use crate::models::pokemon::{CreatePokemon, Pokemon, PokemonWithRelations, UpdatePokemon};

/// Service implementation for pokemon entities.
///
/// This type contains the actual business logic to fetch/save pokemons from the database.
/// It will be used by the [pokemons REST API endpoint implementations](crate::api::pokemons)
/// to handle operations regarding pokemon entities.
///
/// Every operation runs inside a single [`UnitOfWork`], so a write that touches the parent
/// row and the child tables either commits as a whole or not at all.
#[derive(Clone)]
pub struct Service {
    pool: Pool,
}

impl Service {
    /// Max number of pokemons that can be fetched per page when [listing](Service::get_pokemons).
    pub const MAX_PAGE_SIZE: i64 = 100;

    /// Creates a new pokemon service using the provided database connection [`Pool`].
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Fetches pokemons from the database in a paginated way.
    ///
    /// See [`PokemonsPage`] for details on the returned data.
    pub async fn get_pokemons(&self, page: i64, page_size: i64) -> crate::Result<PokemonsPage> {
        let page_size = min(page_size, Self::MAX_PAGE_SIZE);

        let mut uow = UnitOfWork::begin(&self.pool).await?;
        let (pokemons, total_pages) = uow
            .run_read(|mut repo| {
                async move {
                    let (parents, total_pages) = repo.load_page(page, page_size).await?;
                    let (abilities, stats, types) = repo.load_children(&parents).await?;

                    let pokemons = parents
                        .into_iter()
                        .zip(abilities)
                        .zip(stats)
                        .zip(types)
                        .map(|(((pokemon, abilities), stats), types)| {
                            PokemonWithRelations::from_parts(pokemon, abilities, stats, types)
                        })
                        .collect::<Vec<_>>();

                    Ok((pokemons, total_pages))
                }
                .scope_boxed()
            })
            .await
            .with_query_context(|| {
                format!("failed to load pokemons at page {} (page_size: {})", page, page_size)
            })?;

        Ok(PokemonsPage { pokemons, page, page_size, total_pages })
    }

    /// Returns the pokemon with the given ID from the database, along with its children.
    pub async fn get_pokemon(&self, pokemon_id: i64) -> crate::Result<PokemonWithRelations> {
        let mut uow = UnitOfWork::begin(&self.pool).await?;
        uow.run_read(|mut repo| {
            async move {
                let pokemon = repo.find(pokemon_id).await?.ok_or(NotFound)?;
                Self::assemble(repo, pokemon).await
            }
            .scope_boxed()
        })
        .await
        .with_query_context(|| format!("failed to fetch pokemon with id {}", pokemon_id))
    }

    /// Returns the pokemon with the given exact name from the database, along with its children.
    pub async fn get_pokemon_by_name(
        &self,
        pokemon_name: &str,
    ) -> crate::Result<PokemonWithRelations> {
        let pokemon_name = pokemon_name.to_string();

        let mut uow = UnitOfWork::begin(&self.pool).await?;
        let context_name = pokemon_name.clone();
        uow.run_read(|mut repo| {
            async move {
                let pokemon = repo.find_by_name(&pokemon_name).await?.ok_or(NotFound)?;
                Self::assemble(repo, pokemon).await
            }
            .scope_boxed()
        })
        .await
        .with_query_context(|| format!("failed to fetch pokemon with name {}", context_name))
    }

    /// Creates a new pokemon and adds it to the database, along with its children.
    pub async fn create_pokemon(
        &self,
        new_pokemon: &CreatePokemon,
    ) -> crate::Result<PokemonWithRelations> {
        let payload = new_pokemon.clone();

        let mut uow = UnitOfWork::begin(&self.pool).await?;
        uow.run(|mut repo| {
            async move {
                let pokemon = repo.insert(&payload.scalar_row()).await?;

                let abilities: Vec<_> =
                    payload.abilities.iter().map(|ability| ability.to_row(pokemon.id)).collect();
                let stats: Vec<_> =
                    payload.stats.iter().map(|stat| stat.to_row(pokemon.id)).collect();
                let types: Vec<_> =
                    payload.types.iter().map(|poke_type| poke_type.to_row(pokemon.id)).collect();
                repo.insert_children(&abilities, &stats, &types).await?;

                Ok(Self::assemble_from_payload(pokemon, payload.into()))
            }
            .scope_boxed()
        })
        .await
        .with_query_context(|| "failed to insert new pokemon")
    }

    /// Updates the pokemon in the database with the given ID.
    ///
    /// This method overwrites the pokemon completely: all scalar fields are replaced and the
    /// child collections are swapped for those in the payload. Children absent from the
    /// payload do not survive the update.
    pub async fn update_pokemon(
        &self,
        pokemon_id: i64,
        pokemon_update: &UpdatePokemon,
    ) -> crate::Result<PokemonWithRelations> {
        let payload = pokemon_update.clone();

        let mut uow = UnitOfWork::begin(&self.pool).await?;
        uow.run(|mut repo| {
            async move {
                let pokemon = repo.update(pokemon_id, &payload.scalar_row()).await?;

                let abilities: Vec<_> =
                    payload.abilities.iter().map(|ability| ability.to_row(pokemon.id)).collect();
                let stats: Vec<_> =
                    payload.stats.iter().map(|stat| stat.to_row(pokemon.id)).collect();
                let types: Vec<_> =
                    payload.types.iter().map(|poke_type| poke_type.to_row(pokemon.id)).collect();
                repo.replace_children(pokemon.id, &abilities, &stats, &types).await?;

                Ok(Self::assemble_from_payload(pokemon, payload))
            }
            .scope_boxed()
        })
        .await
        .with_query_context(|| format!("failed to update pokemon {}", pokemon_id))
    }

    /// Deletes the pokemon with the given ID from the database.
    ///
    /// Its children are removed along with it through the cascade on the child tables.
    pub async fn delete_pokemon(&self, pokemon_id: i64) -> crate::Result<()> {
        let mut uow = UnitOfWork::begin(&self.pool).await?;
        uow.run(|mut repo| async move { repo.delete(pokemon_id).await }.scope_boxed())
            .await
            .and_then(|deleted_count| if deleted_count > 0 { Ok(()) } else { Err(NotFound) })
            .with_query_context(|| format!("failed to delete pokemon {}", pokemon_id))
    }

    /// Loads the children of a single pokemon row and assembles the full entity.
    async fn assemble(
        mut repo: PokemonRepository<'_>,
        pokemon: Pokemon,
    ) -> QueryResult<PokemonWithRelations> {
        let parents = [pokemon];
        let (mut abilities, mut stats, mut types) = repo.load_children(&parents).await?;
        let [pokemon] = parents;

        Ok(PokemonWithRelations::from_parts(
            pokemon,
            abilities.pop().unwrap_or_default(),
            stats.pop().unwrap_or_default(),
            types.pop().unwrap_or_default(),
        ))
    }

    /// Assembles the full entity from a freshly written row and the payload's children,
    /// avoiding a reload of rows we just wrote.
    fn assemble_from_payload(pokemon: Pokemon, payload: UpdatePokemon) -> PokemonWithRelations {
        PokemonWithRelations {
            id: pokemon.id,
            name: pokemon.name,
            height: pokemon.height,
            weight: pokemon.weight,
            xp: pokemon.xp,
            image_url: pokemon.image_url,
            pokemon_url: pokemon.pokemon_url,
            abilities: payload.abilities,
            stats: payload.stats,
            types: payload.types,
        }
    }
}

#[cfg_attr(
    doc,
    doc = r"
        A page of pokemons, as returned by [`Service::get_pokemons`].

        Contains the list of pokemons in the page as well as paging information.
    "
)]
#[cfg_attr(not(doc), doc = "A page of Pokemons")]
#[derive(Debug, Serialize, Deserialize, ToResponse)]
#[response(example = json!({
    "pokemons": [
        {
            "id": 1,
            "name": "bulbasaur",
            "height": 7,
            "weight": 69,
            "xp": 64,
            "image_url": "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/1.png",
            "pokemon_url": "https://pokeapi.co/api/v2/pokemon/1/",
            "abilities": [{ "name": "overgrow", "is_hidden": false }],
            "stats": [{ "name": "hp", "base_stat": 45 }],
            "types": [{ "name": "grass" }]
        }
    ],
    "page": 1,
    "page_size": 10,
    "total_pages": 1
}))]
pub struct PokemonsPage {
    /// The pokemons in the page
    pub pokemons: Vec<PokemonWithRelations>,

    /// Current page number (1-based)
    pub page: i64,

    /// Page size used when query was performed
    pub page_size: i64,

    /// Total number of pages available
    pub total_pages: i64,
}
