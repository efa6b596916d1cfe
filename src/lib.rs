//! Library crate implementing the Pokevault web service.
//!
//! The Pokevault is a REST API to store pokemons, along with their abilities, stats and
//! types, in a Postgres database, and to export them as CSV files to an S3 bucket. This
//! crate contains the whole implementation; the accompanying bin crate only sets up the
//! HTTP server.
//!
//! For more information, see `README.md`.

#![warn(missing_docs)]

pub mod api;
pub mod db;
pub mod error;
pub mod helpers;
pub mod models;
#[allow(missing_docs)]
pub mod schema;
pub mod seed;
pub mod service_env;
pub mod services;

use actix_web::web::ServiceConfig;

pub use crate::error::{Error, Result};
use crate::db::Pool;
use crate::services::export::Exporter;

/// Allows registration of all Pokevault endpoints: the REST API and its OpenAPI documentation.
///
/// Normally used through the [`pokevault_app!`](crate::pokevault_app) macro, which builds a
/// full application instance.
pub fn configure_api<'a>(
    pool: &'a Pool,
    exporter: &'a Exporter,
) -> impl FnOnce(&mut ServiceConfig) + 'a {
    |config| {
        api::configure(pool, exporter)(config);
        api::doc::configure(config);
    }
}

/// Creates an actix-web [`App`](actix_web::App) instance for the Pokevault service.
///
/// The app is wired with all API endpoints (see [`configure_api`]) as well as input
/// validation configs that route extractor errors through our own
/// [error handling](crate::api::errors::actix_error_handler).
///
/// # Examples
///
/// ```ignore
/// use actix_web::HttpServer;
/// use pokevault_rs::db::get_pool;
/// use pokevault_rs::pokevault_app;
/// use pokevault_rs::services::export::Exporter;
///
/// # async fn example() -> anyhow::Result<()> {
/// let pool = get_pool()?;
/// let exporter = Exporter::from_env().await?;
///
/// let server = HttpServer::new(move || pokevault_app!(pool, exporter))
///     .bind(("127.0.0.1", 8080))?
///     .run();
/// server.await?;
/// #
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! pokevault_app {
    ($pool:expr, $exporter:expr) => {{
        let json_config = ::actix_web_validator::JsonConfig::default()
            .error_handler($crate::api::errors::actix_error_handler);
        let path_config = ::actix_web_validator::PathConfig::default()
            .error_handler($crate::api::errors::actix_error_handler);
        let query_config = ::actix_web_validator::QueryConfig::default()
            .error_handler($crate::api::errors::actix_error_handler);

        ::actix_web::App::new()
            .app_data(json_config)
            .app_data(path_config)
            .app_data(query_config)
            .configure($crate::configure_api(&$pool, &$exporter))
            .wrap(::actix_web::middleware::Logger::default())
    }};
}
