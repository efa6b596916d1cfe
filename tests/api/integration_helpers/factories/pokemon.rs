use diesel::insert_into;
use diesel_async::RunQueryDsl;
use pokevault_rs::models::ability::AbilityData;
use pokevault_rs::models::poke_type::TypeData;
use pokevault_rs::models::pokemon::{CreatePokemon, UpdatePokemon};
use pokevault_rs::models::stat::StatData;
use validator::Validate;

use crate::integration_helpers::app::TestApp;

pub fn build_create_pokemon() -> CreatePokemon {
    build_create_pokemons(1).remove(0)
}

pub fn build_create_pokemons(count: usize) -> Vec<CreatePokemon> {
    (1..=count)
        .map(|number| CreatePokemon {
            name: format!("pikafoo-{}", number),
            height: 4,
            weight: 60,
            xp: 112,
            image_url: format!("https://example.com/sprites/{}.png", number),
            pokemon_url: format!("https://example.com/pokemon/{}/", number),
            abilities: vec![
                AbilityData { name: "static".into(), is_hidden: false },
                AbilityData { name: "lightning-rod".into(), is_hidden: true },
            ],
            stats: vec![
                StatData { name: "hp".into(), base_stat: 35 },
                StatData { name: "speed".into(), base_stat: 90 },
            ],
            types: vec![TypeData { name: "electric".into() }],
        })
        .inspect(|pokemon| pokemon.validate().unwrap())
        .collect()
}

pub fn build_update_pokemon(orig_pokemon: &CreatePokemon) -> UpdatePokemon {
    let mut update_pokemon: UpdatePokemon = orig_pokemon.clone().into();
    update_pokemon.name.push_str("-updated");
    update_pokemon.abilities = vec![AbilityData { name: "levitate".into(), is_hidden: false }];
    update_pokemon.types = vec![TypeData { name: "ghost".into() }];

    update_pokemon.validate().unwrap();
    update_pokemon
}

/// Inserts a pokemon and its children directly in the test DB, returning the new row's id.
pub async fn insert_pokemon(app: &TestApp, new_pokemon: &CreatePokemon) -> i64 {
    use pokevault_rs::schema::{abilities, pokemons, stats, types};

    let mut connection = app.get_pooled_connection().await;

    let new_pokemon_id: i64 = insert_into(pokemons::table)
        .values(&new_pokemon.scalar_row())
        .returning(pokemons::id)
        .get_result(&mut connection)
        .await
        .unwrap();

    let ability_rows = new_pokemon
        .abilities
        .iter()
        .map(|ability| ability.to_row(new_pokemon_id))
        .collect::<Vec<_>>();
    insert_into(abilities::table)
        .values(&ability_rows)
        .execute(&mut connection)
        .await
        .unwrap();

    let stat_rows =
        new_pokemon.stats.iter().map(|stat| stat.to_row(new_pokemon_id)).collect::<Vec<_>>();
    insert_into(stats::table).values(&stat_rows).execute(&mut connection).await.unwrap();

    let type_rows = new_pokemon
        .types
        .iter()
        .map(|poke_type| poke_type.to_row(new_pokemon_id))
        .collect::<Vec<_>>();
    insert_into(types::table).values(&type_rows).execute(&mut connection).await.unwrap();

    new_pokemon_id
}
