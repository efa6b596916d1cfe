//! Models for the types attached to a pokemon.

use diesel_derives::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::pokemon::Pokemon;
use crate::schema::types;

/// Type entity model, as loaded from the database.
///
/// Named `PokemonType` rather than `Type` to avoid colliding with the language's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = types, belongs_to(Pokemon), check_for_backend(diesel::pg::Pg))]
pub struct PokemonType {
    pub id: i64,
    pub pokemon_id: i64,
    pub name: String,
}

/// Model used to insert a type row attached to a pokemon.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = types)]
pub struct NewType {
    pub pokemon_id: i64,
    pub name: String,
}

#[cfg_attr(doc, doc = "API model for a type of a pokemon.")]
#[cfg_attr(not(doc), doc = "A type of a Pokemon")]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
#[schema(example = json!({ "name": "grass" }))]
pub struct TypeData {
    /// Type name
    #[validate(length(min = 1))]
    #[schema(example = "grass")]
    pub name: String,
}

impl TypeData {
    /// Returns this type as a row insertable under the given pokemon.
    pub fn to_row(&self, owner_id: i64) -> NewType {
        NewType { pokemon_id: owner_id, name: self.name.clone() }
    }
}

impl From<PokemonType> for TypeData {
    fn from(value: PokemonType) -> Self {
        Self { name: value.name }
    }
}

/// Model used to import types from the seed JSON file.
#[derive(Debug, Clone, Deserialize, Validate)]
#[allow(missing_docs)]
pub struct ImportType {
    #[validate(length(min = 1))]
    pub name: String,
}

impl ImportType {
    /// Returns this imported type as a row insertable under the given pokemon.
    pub fn to_row(&self, owner_id: i64) -> NewType {
        NewType { pokemon_id: owner_id, name: self.name.clone() }
    }
}
