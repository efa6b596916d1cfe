pub mod integration_helpers;

mod pokemons;
mod seeding;
mod uploads;
