mod list {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use diesel::insert_into;
    use diesel_async::RunQueryDsl;
    use pokevault_rs::services::pokemon::PokemonsPage;
    use serial_test::file_serial;

    use crate::init_test_service;
    use crate::integration_helpers::factories::pokemon::build_create_pokemons;

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_empty_list() {
        init_test_service!(app, service);

        let req = test::TestRequest::with_uri("/pokemon").to_request();
        let page: PokemonsPage = test::call_and_read_body_json(&service, req).await;

        assert!(page.pokemons.is_empty());
        assert_eq!(1, page.page);
        assert_eq!(0, page.total_pages);
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_paginated_list() {
        use pokevault_rs::schema::pokemons::dsl::*;

        init_test_service!(app, service);

        {
            let new_rows = build_create_pokemons(10)
                .iter()
                .map(|new_pokemon| new_pokemon.scalar_row())
                .collect::<Vec<_>>();
            let mut connection = app.get_pooled_connection().await;
            let inserted_count = insert_into(pokemons)
                .values(&new_rows)
                .execute(&mut connection)
                .await
                .unwrap();
            assert_eq!(10, inserted_count);
        }

        for page_number in 1i64..=2 {
            let req = test::TestRequest::with_uri(&format!(
                "/pokemon?page={}&page_size={}",
                page_number, 5
            ))
            .to_request();
            let page: PokemonsPage = test::call_and_read_body_json(&service, req).await;

            assert_eq!(5, page.pokemons.len());
            for expected_number in 1i64..=5 {
                let pokemon = &page.pokemons[(expected_number - 1) as usize];
                let expected_name =
                    format!("pikafoo-{}", expected_number + ((page_number - 1) * 5));
                assert_eq!(expected_name, pokemon.name);
            }
            assert_eq!(page_number, page.page);
            assert_eq!(5, page.page_size);
            assert_eq!(2, page.total_pages);
        }

        let req = test::TestRequest::with_uri("/pokemon?page=3&page_size=5").to_request();
        let page: PokemonsPage = test::call_and_read_body_json(&service, req).await;

        assert!(page.pokemons.is_empty());
        assert_eq!(3, page.page);
        assert_eq!(5, page.page_size);
        assert_eq!(2, page.total_pages);
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_list_includes_children() {
        init_test_service!(app, service);

        let new_pokemon = crate::integration_helpers::factories::pokemon::build_create_pokemon();
        crate::integration_helpers::factories::pokemon::insert_pokemon(&app, &new_pokemon).await;

        let req = test::TestRequest::with_uri("/pokemon").to_request();
        let page: PokemonsPage = test::call_and_read_body_json(&service, req).await;

        assert_eq!(1, page.pokemons.len());
        assert_eq!(new_pokemon.abilities, page.pokemons[0].abilities);
        assert_eq!(new_pokemon.stats, page.pokemons[0].stats);
        assert_eq!(new_pokemon.types, page.pokemons[0].types);
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_invalid_query_params() {
        init_test_service!(app, service);

        let req = test::TestRequest::with_uri("/pokemon?foo=bar").to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::BAD_REQUEST, result.status());
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_invalid_query_param_values() {
        init_test_service!(app, service);

        let req = test::TestRequest::with_uri("/pokemon?page=foo&page_size=bar").to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::BAD_REQUEST, result.status());
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_invalid_query_param_validation() {
        init_test_service!(app, service);

        let req = test::TestRequest::with_uri("/pokemon?page=0&page_size=0").to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::BAD_REQUEST, result.status());
    }
}

mod get {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use pokevault_rs::models::pokemon::{CreatePokemon, PokemonWithRelations};
    use serial_test::file_serial;

    use crate::init_test_service;
    use crate::integration_helpers::factories::pokemon::{build_create_pokemon, insert_pokemon};

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_exists() {
        init_test_service!(app, service);

        let new_pokemon = build_create_pokemon();
        let new_pokemon_id = insert_pokemon(&app, &new_pokemon).await;

        let req =
            test::TestRequest::with_uri(&format!("/pokemon/{}", new_pokemon_id)).to_request();
        let api_pokemon: PokemonWithRelations = test::call_and_read_body_json(&service, req).await;

        assert_eq!(new_pokemon_id, api_pokemon.id);
        assert_eq!(new_pokemon, CreatePokemon::from(api_pokemon));
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_does_not_exist() {
        init_test_service!(app, service);

        let pokemon_id = i64::MAX;
        let req = test::TestRequest::with_uri(&format!("/pokemon/{}", pokemon_id)).to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::NOT_FOUND, result.status());
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_invalid_path_param() {
        init_test_service!(app, service);

        let req = test::TestRequest::with_uri("/pokemon/foobar").to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::BAD_REQUEST, result.status());
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_invalid_path_param_validation() {
        init_test_service!(app, service);

        let req = test::TestRequest::with_uri("/pokemon/-1").to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::BAD_REQUEST, result.status());
    }
}

mod get_by_name {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use pokevault_rs::models::pokemon::PokemonWithRelations;
    use serial_test::file_serial;

    use crate::init_test_service;
    use crate::integration_helpers::factories::pokemon::{build_create_pokemon, insert_pokemon};

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_exists() {
        init_test_service!(app, service);

        let new_pokemon = build_create_pokemon();
        let new_pokemon_id = insert_pokemon(&app, &new_pokemon).await;

        let req = test::TestRequest::with_uri(&format!("/pokemon/name/{}", new_pokemon.name))
            .to_request();
        let api_pokemon: PokemonWithRelations = test::call_and_read_body_json(&service, req).await;

        assert_eq!(new_pokemon_id, api_pokemon.id);
        assert_eq!(new_pokemon.name, api_pokemon.name);
        assert_eq!(new_pokemon.abilities, api_pokemon.abilities);
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_does_not_exist() {
        init_test_service!(app, service);

        let req = test::TestRequest::with_uri("/pokemon/name/missingno").to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::NOT_FOUND, result.status());
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_lookup_is_case_sensitive() {
        init_test_service!(app, service);

        let new_pokemon = build_create_pokemon();
        insert_pokemon(&app, &new_pokemon).await;

        let req = test::TestRequest::with_uri(&format!(
            "/pokemon/name/{}",
            new_pokemon.name.to_uppercase()
        ))
        .to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::NOT_FOUND, result.status());
    }
}

mod create {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use assert_matches::assert_matches;
    use diesel::dsl::count_star;
    use diesel::{ExpressionMethods, QueryDsl};
    use diesel_async::RunQueryDsl;
    use pokevault_rs::models::ability::AbilityData;
    use pokevault_rs::models::pokemon::{CreatePokemon, PokemonWithRelations};
    use pokevault_rs::services::pokemon::Service;
    use pokevault_rs::Error;
    use serde_json::json;
    use serial_test::file_serial;

    use crate::init_test_service;
    use crate::integration_helpers::factories::pokemon::build_create_pokemon;

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_create_pokemon() {
        use pokevault_rs::schema::abilities;

        init_test_service!(app, service);

        let new_pokemon = build_create_pokemon();

        let req = test::TestRequest::post()
            .uri("/pokemon")
            .set_json(&new_pokemon)
            .to_request();
        let result = test::call_service(&service, req).await;
        assert_eq!(StatusCode::CREATED, result.status());

        let api_pokemon: PokemonWithRelations = test::read_body_json(result).await;
        assert_eq!(new_pokemon, CreatePokemon::from(api_pokemon.clone()));

        let mut connection = app.get_pooled_connection().await;
        let child_count: i64 = abilities::table
            .filter(abilities::pokemon_id.eq(api_pokemon.id))
            .select(count_star())
            .first(&mut connection)
            .await
            .unwrap();
        assert_eq!(new_pokemon.abilities.len() as i64, child_count);
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_duplicate_name() {
        init_test_service!(app, service);

        let new_pokemon = build_create_pokemon();

        let req = test::TestRequest::post()
            .uri("/pokemon")
            .set_json(&new_pokemon)
            .to_request();
        let result = test::call_service(&service, req).await;
        assert_eq!(StatusCode::CREATED, result.status());

        let req = test::TestRequest::post()
            .uri("/pokemon")
            .set_json(&new_pokemon)
            .to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::BAD_REQUEST, result.status());
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_invalid_payload() {
        init_test_service!(app, service);

        let invalid_payload = json!({
            "foo": "bar"
        });

        let req = test::TestRequest::post()
            .uri("/pokemon")
            .set_json(invalid_payload)
            .to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::BAD_REQUEST, result.status());
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_invalid_payload_values_validation() {
        init_test_service!(app, service);

        let invalid_payload = json!({
            "name": "",
            "height": 0,
            "weight": 0,
            "xp": -1,
            "image_url": "not a url",
            "pokemon_url": "not a url either",
            "abilities": [],
            "stats": [{ "name": "charisma", "base_stat": 9000 }],
            "types": []
        });

        let req = test::TestRequest::post()
            .uri("/pokemon")
            .set_json(invalid_payload)
            .to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::BAD_REQUEST, result.status());
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_rolls_back_on_invalid_child() {
        use pokevault_rs::schema::pokemons;

        init_test_service!(app, _service);

        // An empty ability name passes through the payload but violates a DB constraint;
        // the parent row written in the same transaction must not survive.
        let mut new_pokemon = build_create_pokemon();
        new_pokemon.abilities.push(AbilityData { name: "".into(), is_hidden: false });

        let pokemon_service = Service::new(app.get_pool());
        let result = pokemon_service.create_pokemon(&new_pokemon).await;
        assert_matches!(result, Err(Error::Query { .. }));

        let mut connection = app.get_pooled_connection().await;
        let parent_count: i64 = pokemons::table
            .filter(pokemons::name.eq(&new_pokemon.name))
            .select(count_star())
            .first(&mut connection)
            .await
            .unwrap();
        assert_eq!(0, parent_count);
    }
}

mod update {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use diesel::dsl::count_star;
    use diesel::{ExpressionMethods, QueryDsl};
    use diesel_async::RunQueryDsl;
    use pokevault_rs::models::pokemon::PokemonWithRelations;
    use serde_json::json;
    use serial_test::file_serial;

    use crate::init_test_service;
    use crate::integration_helpers::factories::pokemon::{
        build_create_pokemon, build_update_pokemon, insert_pokemon,
    };

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_update_existing_replaces_children() {
        use pokevault_rs::schema::{abilities, types};

        init_test_service!(app, service);

        let new_pokemon = build_create_pokemon();
        let new_pokemon_id = insert_pokemon(&app, &new_pokemon).await;

        let update_pokemon = build_update_pokemon(&new_pokemon);
        let req = test::TestRequest::put()
            .uri(&format!("/pokemon/{}", new_pokemon_id))
            .set_json(&update_pokemon)
            .to_request();
        let api_pokemon: PokemonWithRelations = test::call_and_read_body_json(&service, req).await;

        assert_eq!(format!("{}-updated", new_pokemon.name), api_pokemon.name);
        assert_eq!(update_pokemon.abilities, api_pokemon.abilities);
        assert_eq!(update_pokemon.types, api_pokemon.types);

        // The original children must be gone from the DB, not just from the response.
        let mut connection = app.get_pooled_connection().await;
        let ability_count: i64 = abilities::table
            .filter(abilities::pokemon_id.eq(new_pokemon_id))
            .select(count_star())
            .first(&mut connection)
            .await
            .unwrap();
        assert_eq!(1, ability_count);

        let type_names: Vec<String> = types::table
            .filter(types::pokemon_id.eq(new_pokemon_id))
            .select(types::name)
            .load(&mut connection)
            .await
            .unwrap();
        assert_eq!(vec!["ghost".to_string()], type_names);
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_update_nonexistent() {
        init_test_service!(app, service);

        let pokemon_id = i64::MAX;
        let update_pokemon = build_update_pokemon(&build_create_pokemon());
        let req = test::TestRequest::put()
            .uri(&format!("/pokemon/{}", pokemon_id))
            .set_json(update_pokemon)
            .to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::NOT_FOUND, result.status());
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_invalid_path_param() {
        init_test_service!(app, service);

        let update_pokemon = build_update_pokemon(&build_create_pokemon());
        let req = test::TestRequest::put()
            .uri("/pokemon/foobar")
            .set_json(update_pokemon)
            .to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::BAD_REQUEST, result.status());
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_invalid_payload() {
        init_test_service!(app, service);

        let new_pokemon = build_create_pokemon();
        let new_pokemon_id = insert_pokemon(&app, &new_pokemon).await;

        let invalid_payload = json!({
            "foo": "bar"
        });

        let req = test::TestRequest::put()
            .uri(&format!("/pokemon/{}", new_pokemon_id))
            .set_json(invalid_payload)
            .to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::BAD_REQUEST, result.status());
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_invalid_payload_values_validation() {
        init_test_service!(app, service);

        let new_pokemon = build_create_pokemon();
        let new_pokemon_id = insert_pokemon(&app, &new_pokemon).await;

        let invalid_payload = json!({
            "name": "",
            "height": 0,
            "weight": 0,
            "xp": -1,
            "image_url": "not a url",
            "pokemon_url": "not a url either",
            "abilities": [],
            "stats": [],
            "types": []
        });

        let req = test::TestRequest::put()
            .uri(&format!("/pokemon/{}", new_pokemon_id))
            .set_json(invalid_payload)
            .to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::BAD_REQUEST, result.status());
    }
}

mod delete {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use diesel::dsl::count_star;
    use diesel::{ExpressionMethods, QueryDsl};
    use diesel_async::RunQueryDsl;
    use pokevault_rs::models::pokemon::Pokemon;
    use serial_test::file_serial;

    use crate::init_test_service;
    use crate::integration_helpers::factories::pokemon::{build_create_pokemon, insert_pokemon};

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_delete_existing_cascades_to_children() {
        use pokevault_rs::schema::{abilities, pokemons, stats, types};

        init_test_service!(app, service);

        let new_pokemon = build_create_pokemon();
        let new_pokemon_id = insert_pokemon(&app, &new_pokemon).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/pokemon/{}", new_pokemon_id))
            .to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::NO_CONTENT, result.status());

        let mut connection = app.get_pooled_connection().await;
        let result: Result<Pokemon, _> =
            pokemons::table.find(new_pokemon_id).first(&mut connection).await;
        assert_eq!(Err(diesel::NotFound), result);

        let ability_count: i64 = abilities::table
            .filter(abilities::pokemon_id.eq(new_pokemon_id))
            .select(count_star())
            .first(&mut connection)
            .await
            .unwrap();
        let stat_count: i64 = stats::table
            .filter(stats::pokemon_id.eq(new_pokemon_id))
            .select(count_star())
            .first(&mut connection)
            .await
            .unwrap();
        let type_count: i64 = types::table
            .filter(types::pokemon_id.eq(new_pokemon_id))
            .select(count_star())
            .first(&mut connection)
            .await
            .unwrap();
        assert_eq!((0, 0, 0), (ability_count, stat_count, type_count));
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_delete_nonexistent() {
        init_test_service!(app, service);

        let pokemon_id = i64::MAX;
        let req =
            test::TestRequest::delete().uri(&format!("/pokemon/{}", pokemon_id)).to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::NOT_FOUND, result.status());
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_invalid_path_param() {
        init_test_service!(app, service);

        let req = test::TestRequest::delete().uri("/pokemon/foobar").to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::BAD_REQUEST, result.status());
    }

    #[test_log::test(actix_web::test)]
    #[file_serial(api_pokemons)]
    async fn test_invalid_path_param_validation() {
        init_test_service!(app, service);

        let req = test::TestRequest::delete().uri("/pokemon/-1").to_request();
        let result = test::call_service(&service, req).await;

        assert_eq!(StatusCode::BAD_REQUEST, result.status());
    }
}
