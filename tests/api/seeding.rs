use diesel::dsl::count_star;
use diesel::QueryDsl;
use diesel_async::RunQueryDsl;
use pokevault_rs::seed::load_initial_data;
use serial_test::file_serial;

use crate::integration_helpers::app::TestApp;
use crate::integration_helpers::factories::pokemon::{build_create_pokemon, insert_pokemon};

#[test_log::test(actix_web::test)]
#[file_serial(api_pokemons)]
async fn test_seeds_empty_database_once() {
    use pokevault_rs::schema::pokemons;

    let app = TestApp::new();

    let inserted = load_initial_data(&app.get_pool()).await.unwrap();
    assert!(inserted > 0);

    let mut connection = app.get_pooled_connection().await;
    let count_after_first_run: i64 = pokemons::table
        .select(count_star())
        .first(&mut connection)
        .await
        .unwrap();
    assert_eq!(inserted as i64, count_after_first_run);
    drop(connection);

    // A second run must leave the database untouched.
    let inserted_again = load_initial_data(&app.get_pool()).await.unwrap();
    assert_eq!(0, inserted_again);

    let mut connection = app.get_pooled_connection().await;
    let count_after_second_run: i64 = pokemons::table
        .select(count_star())
        .first(&mut connection)
        .await
        .unwrap();
    assert_eq!(count_after_first_run, count_after_second_run);
}

#[test_log::test(actix_web::test)]
#[file_serial(api_pokemons)]
async fn test_skips_populated_database() {
    use pokevault_rs::schema::pokemons;

    let app = TestApp::new();

    insert_pokemon(&app, &build_create_pokemon()).await;

    let inserted = load_initial_data(&app.get_pool()).await.unwrap();
    assert_eq!(0, inserted);

    let mut connection = app.get_pooled_connection().await;
    let count: i64 = pokemons::table.select(count_star()).first(&mut connection).await.unwrap();
    assert_eq!(1, count);
}
