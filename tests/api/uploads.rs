//! Tests for the `/upload` endpoints.
//!
//! Only the error paths are covered here: the happy paths upload to an actual S3 bucket,
//! which the test environment does not provide. The CSV serialization itself is covered by
//! unit tests in the lib crate.

use actix_web::http::StatusCode;
use actix_web::test;
use serial_test::file_serial;

use crate::init_test_service;

#[test_log::test(actix_web::test)]
#[file_serial(api_pokemons)]
async fn test_upload_all_invalid_paging() {
    init_test_service!(app, service);

    let req = test::TestRequest::with_uri("/upload/all?page=0").to_request();
    let result = test::call_service(&service, req).await;

    assert_eq!(StatusCode::BAD_REQUEST, result.status());
}

#[test_log::test(actix_web::test)]
#[file_serial(api_pokemons)]
async fn test_upload_nonexistent_id() {
    init_test_service!(app, service);

    let pokemon_id = i64::MAX;
    let req = test::TestRequest::with_uri(&format!("/upload/{}", pokemon_id)).to_request();
    let result = test::call_service(&service, req).await;

    assert_eq!(StatusCode::NOT_FOUND, result.status());
}

#[test_log::test(actix_web::test)]
#[file_serial(api_pokemons)]
async fn test_upload_invalid_id() {
    init_test_service!(app, service);

    let req = test::TestRequest::with_uri("/upload/foobar").to_request();
    let result = test::call_service(&service, req).await;

    assert_eq!(StatusCode::BAD_REQUEST, result.status());
}

#[test_log::test(actix_web::test)]
#[file_serial(api_pokemons)]
async fn test_upload_invalid_id_validation() {
    init_test_service!(app, service);

    let req = test::TestRequest::with_uri("/upload/-1").to_request();
    let result = test::call_service(&service, req).await;

    assert_eq!(StatusCode::BAD_REQUEST, result.status());
}

#[test_log::test(actix_web::test)]
#[file_serial(api_pokemons)]
async fn test_upload_nonexistent_name() {
    init_test_service!(app, service);

    let req = test::TestRequest::with_uri("/upload/name/missingno").to_request();
    let result = test::call_service(&service, req).await;

    assert_eq!(StatusCode::NOT_FOUND, result.status());
}
