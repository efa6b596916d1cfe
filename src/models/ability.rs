//! Models for the abilities attached to a pokemon.

use diesel_derives::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::pokemon::Pokemon;
use crate::schema::abilities;

/// Ability entity model, as loaded from the database.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = abilities, belongs_to(Pokemon), check_for_backend(diesel::pg::Pg))]
pub struct Ability {
    pub id: i64,
    pub pokemon_id: i64,
    pub name: String,
    pub is_hidden: bool,
}

/// Model used to insert an ability row attached to a pokemon.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = abilities)]
pub struct NewAbility {
    pub pokemon_id: i64,
    pub name: String,
    pub is_hidden: bool,
}

#[cfg_attr(
    doc,
    doc = r"
        API model for an ability of a pokemon.

        Used both in pokemon payloads received from clients and in pokemons returned to them;
        the owning pokemon is implied by the enclosing payload, so there is no id here.
    "
)]
#[cfg_attr(not(doc), doc = "An ability of a Pokemon")]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
#[schema(example = json!({ "name": "overgrow", "is_hidden": false }))]
pub struct AbilityData {
    /// Ability name
    #[validate(length(min = 1))]
    #[schema(example = "overgrow")]
    pub name: String,

    /// Whether the ability is a hidden one
    #[schema(example = false)]
    pub is_hidden: bool,
}

impl AbilityData {
    /// Returns this ability as a row insertable under the given pokemon.
    pub fn to_row(&self, owner_id: i64) -> NewAbility {
        NewAbility { pokemon_id: owner_id, name: self.name.clone(), is_hidden: self.is_hidden }
    }
}

impl From<Ability> for AbilityData {
    fn from(value: Ability) -> Self {
        Self { name: value.name, is_hidden: value.is_hidden }
    }
}

/// Model used to import abilities from the seed JSON file.
///
/// `is_hidden` values appear in the raw data in multiple representations (booleans as well as
/// strings), so we use a lenient deserializer for this.
#[derive(Debug, Clone, Deserialize, Validate)]
#[allow(missing_docs)]
pub struct ImportAbility {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(deserialize_with = "serde_this_or_that::as_bool")]
    pub is_hidden: bool,
}

impl ImportAbility {
    /// Returns this imported ability as a row insertable under the given pokemon.
    pub fn to_row(&self, owner_id: i64) -> NewAbility {
        NewAbility { pokemon_id: owner_id, name: self.name.clone(), is_hidden: self.is_hidden }
    }
}
