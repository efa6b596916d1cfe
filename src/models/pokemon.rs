//! Models used to create/update/load pokemons from the database.
//!
//! A pokemon is persisted as a parent row plus three child collections (abilities, stats and
//! types), but the API always exchanges whole pokemons: payloads carry the children inline
//! and loads reassemble them through [`PokemonWithRelations`].

pub mod macros;

use diesel_derives::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use utoipa::{ToResponse, ToSchema};
use validator::Validate;

use crate::models::ability::{Ability, AbilityData, ImportAbility, NewAbility};
use crate::models::poke_type::{ImportType, NewType, PokemonType, TypeData};
use crate::models::stat::{ImportStat, NewStat, Stat, StatData};
use crate::schema::pokemons;
use crate::{implement_pokemon_upsert, implement_pokemon_upsert_from};

/// Base pokemon entity model.
///
/// Used to validate queries at compile time as well as load pokemon rows from the database
/// (including those returned by update queries). Child rows are loaded separately; see
/// [`PokemonWithRelations`] for the full aggregate returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = pokemons, check_for_backend(diesel::pg::Pg))]
pub struct Pokemon {
    /// Unique id of this pokemon in the database
    pub id: i64,

    /// Pokemon name; unique across the database
    pub name: String,

    /// Pokemon height, in decimetres
    pub height: i32,

    /// Pokemon weight, in hectograms
    pub weight: i32,

    /// Base experience gained for defeating this pokemon
    pub xp: i32,

    /// URL of the pokemon's image
    pub image_url: String,

    /// URL of the pokemon's entry in the PokeAPI
    pub pokemon_url: String,
}

/// Scalar columns of a pokemon, as written to the database.
///
/// Used both to insert new pokemons and to overwrite existing ones (update semantics replace
/// all scalar columns).
#[derive(Debug, Clone, PartialEq, Eq, Insertable, AsChangeset)]
#[diesel(table_name = pokemons)]
pub struct NewPokemon {
    pub name: String,
    pub height: i32,
    pub weight: i32,
    pub xp: i32,
    pub image_url: String,
    pub pokemon_url: String,
}

implement_pokemon_upsert! {
    pub struct CreatePokemon(
        doc = "Model used to insert a new pokemon in the database.",
        openapi_doc = "Information to create a new Pokemon in the Pokevault"
    );
}
implement_pokemon_upsert! {
    pub struct UpdatePokemon(
        doc = "Model used to update a pokemon in the database, overwriting all fields.",
        openapi_doc = "Information to update a Pokemon in the Pokevault, overwriting all fields and replacing all children"
    );
}
implement_pokemon_upsert_from!(CreatePokemon, UpdatePokemon);

#[cfg_attr(
    doc,
    doc = r"
        A full pokemon as returned by the API: the entity row plus its child collections.

        Assembled from the database rows via [`from_parts`](PokemonWithRelations::from_parts).
    "
)]
#[cfg_attr(not(doc), doc = "Information about a Pokemon in the Pokevault")]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, ToResponse)]
#[serde(deny_unknown_fields)]
#[response(
    description = "Pokemon information",
    example = json!({
        "id": 1,
        "name": "bulbasaur",
        "height": 7,
        "weight": 69,
        "xp": 64,
        "image_url": "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/1.png",
        "pokemon_url": "https://pokeapi.co/api/v2/pokemon/1/",
        "abilities": [
            { "name": "overgrow", "is_hidden": false },
            { "name": "chlorophyll", "is_hidden": true }
        ],
        "stats": [
            { "name": "hp", "base_stat": 45 },
            { "name": "attack", "base_stat": 49 }
        ],
        "types": [
            { "name": "grass" },
            { "name": "poison" }
        ]
    }),
)]
pub struct PokemonWithRelations {
    /// Unique id of this pokemon in the database
    pub id: i64,

    /// Pokemon name
    #[schema(example = "bulbasaur")]
    pub name: String,

    /// Pokemon height, in decimetres
    pub height: i32,

    /// Pokemon weight, in hectograms
    pub weight: i32,

    /// Base experience gained for defeating this pokemon
    pub xp: i32,

    /// URL of the pokemon's image
    pub image_url: String,

    /// URL of the pokemon's entry in the PokeAPI
    pub pokemon_url: String,

    /// Abilities of the pokemon
    pub abilities: Vec<AbilityData>,

    /// Base stats of the pokemon
    pub stats: Vec<StatData>,

    /// Types of the pokemon
    pub types: Vec<TypeData>,
}

impl PokemonWithRelations {
    /// Assembles a full pokemon from its entity row and child rows.
    pub fn from_parts(
        pokemon: Pokemon,
        abilities: Vec<Ability>,
        stats: Vec<Stat>,
        types: Vec<PokemonType>,
    ) -> Self {
        Self {
            id: pokemon.id,
            name: pokemon.name,
            height: pokemon.height,
            weight: pokemon.weight,
            xp: pokemon.xp,
            image_url: pokemon.image_url,
            pokemon_url: pokemon.pokemon_url,
            abilities: abilities.into_iter().map(Into::into).collect(),
            stats: stats.into_iter().map(Into::into).collect(),
            types: types.into_iter().map(Into::into).collect(),
        }
    }
}

/// Model used to import pokemons in the database from the seed JSON file.
///
/// Used at service startup (and by the `seed_db` command) to seed the database initially.
/// Numeric values appear in the raw data both as numbers and as numeric strings, so we use
/// lenient deserializers for those.
#[derive(Debug, Clone, Deserialize, Validate)]
#[allow(missing_docs)]
pub struct ImportPokemon {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(deserialize_with = "serde_this_or_that::as_i64")]
    #[validate(range(min = 1))]
    pub height: i64,
    #[serde(deserialize_with = "serde_this_or_that::as_i64")]
    #[validate(range(min = 1))]
    pub weight: i64,
    #[serde(deserialize_with = "serde_this_or_that::as_i64")]
    #[validate(range(min = 0))]
    pub xp: i64,
    #[validate(url)]
    pub image_url: String,
    #[validate(url)]
    pub pokemon_url: String,
    #[validate]
    pub abilities: Vec<ImportAbility>,
    #[validate]
    pub stats: Vec<ImportStat>,
    #[validate]
    pub types: Vec<ImportType>,
}

impl ImportPokemon {
    /// Returns the scalar columns of this imported pokemon as an insertable row.
    pub fn scalar_row(&self) -> NewPokemon {
        NewPokemon {
            name: self.name.clone(),
            height: self.height as i32,
            weight: self.weight as i32,
            xp: self.xp as i32,
            image_url: self.image_url.clone(),
            pokemon_url: self.pokemon_url.clone(),
        }
    }

    /// Returns the ability rows of this imported pokemon, attached to the given parent id.
    pub fn ability_rows(&self, owner_id: i64) -> Vec<NewAbility> {
        self.abilities.iter().map(|ability| ability.to_row(owner_id)).collect()
    }

    /// Returns the stat rows of this imported pokemon, attached to the given parent id.
    pub fn stat_rows(&self, owner_id: i64) -> Vec<NewStat> {
        self.stats.iter().map(|stat| stat.to_row(owner_id)).collect()
    }

    /// Returns the type rows of this imported pokemon, attached to the given parent id.
    pub fn type_rows(&self, owner_id: i64) -> Vec<NewType> {
        self.types.iter().map(|poke_type| poke_type.to_row(owner_id)).collect()
    }
}
