//! Helper macros used to generate Pokemon-related `struct`s.

/// Macro to generate a struct used to insert or update a Pokemon in the database.
///
/// The generated struct carries the pokemon's scalar fields along with its three child
/// collections (abilities, stats and types), so a single payload describes the whole entity.
///
/// # Examples
///
/// ```ignore
/// use pokevault_rs::implement_pokemon_upsert;
///
/// implement_pokemon_upsert! {
///     pub struct CreatePokemon(
///         doc = "Model used to insert a new pokemon.",
///         openapi_doc = "Information to create a Pokemon"
///     );
/// }
/// ```
#[macro_export]
macro_rules! implement_pokemon_upsert {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident(
            doc = $doc:expr,
            openapi_doc = $openapi_doc:expr
        );
    ) => {
        paste::paste! {
            $(#[$attr])*
            #[cfg_attr(doc, doc = r"
                " $doc r"

                All fields must be specified. The child collections replace any existing
                children of the pokemon: children absent from the payload do not survive
                the operation.
            ")]
            #[cfg_attr(not(doc), doc = $openapi_doc)]
            #[derive(
                std::fmt::Debug,
                std::clone::Clone,
                std::cmp::PartialEq,
                std::cmp::Eq,
                serde::Serialize,
                serde::Deserialize,
                validator::Validate,
                utoipa::ToSchema,
            )]
            #[serde(deny_unknown_fields)]
            $vis struct $name {
                /// Pokemon name
                #[validate(length(min = 1))]
                #[schema(example = "bulbasaur")]
                pub name: String,

                /// Pokemon height, in decimetres
                #[validate(range(min = 1))]
                #[schema(example = 7)]
                pub height: i32,

                /// Pokemon weight, in hectograms
                #[validate(range(min = 1))]
                #[schema(example = 69)]
                pub weight: i32,

                /// Base experience gained for defeating this pokemon
                #[validate(range(min = 0))]
                #[schema(example = 64)]
                pub xp: i32,

                /// URL of the pokemon's image
                #[validate(url)]
                #[schema(example = "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/1.png")]
                pub image_url: String,

                /// URL of the pokemon's entry in the PokeAPI
                #[validate(url)]
                #[schema(example = "https://pokeapi.co/api/v2/pokemon/1/")]
                pub pokemon_url: String,

                /// Abilities of the pokemon
                #[validate]
                pub abilities: Vec<$crate::models::ability::AbilityData>,

                /// Base stats of the pokemon
                #[validate]
                pub stats: Vec<$crate::models::stat::StatData>,

                /// Types of the pokemon
                #[validate]
                pub types: Vec<$crate::models::poke_type::TypeData>,
            }

            impl $name {
                /// Returns the scalar columns of this payload as an insertable/updatable row.
                ///
                /// The child collections are not part of the row; they are persisted
                /// separately in the child tables.
                pub fn scalar_row(&self) -> $crate::models::pokemon::NewPokemon {
                    $crate::models::pokemon::NewPokemon {
                        name: self.name.clone(),
                        height: self.height,
                        weight: self.weight,
                        xp: self.xp,
                        image_url: self.image_url.clone(),
                        pokemon_url: self.pokemon_url.clone(),
                    }
                }
            }

            $crate::implement_pokemon_upsert_from! {
                #[doc = r"
                    Converts a [`PokemonWithRelations`]($crate::models::pokemon::PokemonWithRelations)
                    struct into a [`" $name r"`], dropping its
                    [`id`]($crate::models::pokemon::PokemonWithRelations::id).
                "]
                $crate::models::pokemon::PokemonWithRelations => $name
            }
        }
    }
}

/// Macro to generate [`From`] implementations for insert/update Pokemon structs.
///
/// Will generate two `impl From`s:
///
/// * `impl From<CreateStruct> for UpdateStruct`
/// * `impl From<UpdateStruct> for CreateStruct`
///
/// # Examples
///
/// ```ignore
/// use pokevault_rs::{implement_pokemon_upsert, implement_pokemon_upsert_from};
///
/// implement_pokemon_upsert! {
///     pub struct CreatePokemon(
///         doc = "Model used to insert a new pokemon.",
///         openapi_doc = "Information to create a Pokemon"
///     );
/// }
/// implement_pokemon_upsert! {
///     pub struct UpdatePokemon(
///         doc = "Model used to update a pokemon.",
///         openapi_doc = "Information to update a Pokemon"
///     );
/// }
/// implement_pokemon_upsert_from!(CreatePokemon, UpdatePokemon);
/// ```
#[macro_export]
macro_rules! implement_pokemon_upsert_from {
    ( $create_ty:ty, $update_ty:ty ) => {
        $crate::implement_pokemon_upsert_from! { $create_ty => $update_ty }
        $crate::implement_pokemon_upsert_from! { $update_ty => $create_ty }
    };

    (
        $(#[$attr:meta])*
        $create_ty:ty => $update_ty:ty
    ) => {
        impl std::convert::From<$create_ty> for $update_ty {
            $(#[$attr])*
            fn from(value: $create_ty) -> Self {
                Self {
                    name: value.name,
                    height: value.height,
                    weight: value.weight,
                    xp: value.xp,
                    image_url: value.image_url,
                    pokemon_url: value.pokemon_url,
                    abilities: value.abilities,
                    stats: value.stats,
                    types: value.types,
                }
            }
        }
    }
}
