//! Types and functions used to implement the Pokevault REST API.

pub mod doc;
pub mod errors;
pub mod exports;
pub mod pokemons;

use actix_web::web;
use actix_web::web::ServiceConfig;
use log::trace;

use crate::db::Pool;
use crate::services::export::Exporter;

/// Allows registration of all Pokevault API routes.
///
/// Pokemon CRUD endpoints live under the `/pokemon` scope; CSV export endpoints live under
/// the `/upload` scope. Called automatically from [`configure_api`](crate::configure_api).
pub fn configure<'a>(
    pool: &'a Pool,
    exporter: &'a Exporter,
) -> impl FnOnce(&mut ServiceConfig) + 'a {
    |config| {
        trace!("Adding API endpoints for /pokemon and /upload");
        config
            .service(web::scope("/pokemon").configure(pokemons::configure(pool)))
            .service(web::scope("/upload").configure(exports::configure(pool, exporter)));
    }
}
