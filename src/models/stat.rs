//! Models for the base stats attached to a pokemon.

use diesel_derives::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::pokemon::Pokemon;
use crate::schema::stats;

/// Stat entity model, as loaded from the database.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = stats, belongs_to(Pokemon), check_for_backend(diesel::pg::Pg))]
pub struct Stat {
    pub id: i64,
    pub pokemon_id: i64,
    pub name: String,
    pub base_stat: i32,
}

/// Model used to insert a stat row attached to a pokemon.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = stats)]
pub struct NewStat {
    pub pokemon_id: i64,
    pub name: String,
    pub base_stat: i32,
}

#[cfg_attr(
    doc,
    doc = r"
        API model for a base stat of a pokemon.

        The stat name must be one of the six canonical stat names (see
        [`STAT_NAMES`](crate::models::validations::STAT_NAMES)).
    "
)]
#[cfg_attr(not(doc), doc = "A base stat of a Pokemon")]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
#[schema(example = json!({ "name": "hp", "base_stat": 45 }))]
pub struct StatData {
    /// Stat name
    #[validate(custom = "crate::models::validations::validate_stat_name")]
    #[schema(example = "hp")]
    pub name: String,

    /// Base value of the stat
    #[validate(range(min = 0, max = 255))]
    #[schema(example = 45)]
    pub base_stat: i32,
}

impl StatData {
    /// Returns this stat as a row insertable under the given pokemon.
    pub fn to_row(&self, owner_id: i64) -> NewStat {
        NewStat { pokemon_id: owner_id, name: self.name.clone(), base_stat: self.base_stat }
    }
}

impl From<Stat> for StatData {
    fn from(value: Stat) -> Self {
        Self { name: value.name, base_stat: value.base_stat }
    }
}

/// Model used to import stats from the seed JSON file.
///
/// `base_stat` values appear in the raw data both as numbers and as numeric strings, so we
/// use a lenient deserializer for this.
#[derive(Debug, Clone, Deserialize, Validate)]
#[allow(missing_docs)]
pub struct ImportStat {
    #[validate(custom = "crate::models::validations::validate_stat_name")]
    pub name: String,
    #[serde(deserialize_with = "serde_this_or_that::as_i64")]
    #[validate(range(min = 0, max = 255))]
    pub base_stat: i64,
}

impl ImportStat {
    /// Returns this imported stat as a row insertable under the given pokemon.
    pub fn to_row(&self, owner_id: i64) -> NewStat {
        NewStat { pokemon_id: owner_id, name: self.name.clone(), base_stat: self.base_stat as i32 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_stat_for_stat_data() {
        let stat = Stat { id: 11, pokemon_id: 1, name: "speed".into(), base_stat: 45 };

        let expected_data = StatData { name: "speed".into(), base_stat: 45 };
        let actual_data: StatData = stat.into();
        assert_eq!(actual_data, expected_data);
    }

    #[test]
    fn test_to_row() {
        let data = StatData { name: "attack".into(), base_stat: 49 };

        let expected_row = NewStat { pokemon_id: 42, name: "attack".into(), base_stat: 49 };
        assert_eq!(data.to_row(42), expected_row);
    }

    #[test]
    fn test_import_with_string_base_stat() {
        let import: ImportStat =
            serde_json::from_str(r#"{ "name": "defense", "base_stat": "49" }"#).unwrap();

        assert_eq!("defense", import.name);
        assert_eq!(49, import.base_stat);
        assert_eq!(49, import.to_row(1).base_stat);
    }
}
