//! Implementation of the Pokevault REST API endpoints for CSV exports.
//!
//! Each endpoint fetches pokemons from the database, flattens them to CSV and uploads the
//! file to the configured S3 bucket (see [`Exporter`]).
//!
//! # Endpoints
//!
//! | HTTP method | Endpoint               | Usage                                       | See                |
//! |-------------|------------------------|---------------------------------------------|--------------------|
//! | `GET`       | `/upload/all`          | Exports a page of pokemons as one CSV file  | [`export_all`]     |
//! | `GET`       | `/upload/{id}`         | Exports the pokemon with the given ID       | [`export_by_id`]   |
//! | `GET`       | `/upload/name/{name}`  | Exports the pokemon with the given name     | [`export_by_name`] |

use actix_web::web::{Data, ServiceConfig};
use actix_web::{get, HttpResponse};
use actix_web_validator::{Path, Query};
use log::trace;

use crate::api::pokemons::doc::{
    IdNotFoundResponse, InvalidIdParamResponse, NameNotFoundResponse, ServerErrorResponse,
};
use crate::api::pokemons::{HttpResult, Id, ListParams, Name};
use crate::db::Pool;
use crate::services::export::{ExportReceipt, Exporter};
use crate::services::pokemon;

/// Allows registration of all CSV export REST API endpoints.
///
/// See [module documentation](self) for the entire list of supported endpoints.
/// Called automatically from [`api::configure`](crate::api::configure).
///
/// # Notes
///
/// `/all` must be registered before `/{id}` so that the literal segment wins over the
/// parameterized one.
pub fn configure<'a>(
    pool: &'a Pool,
    exporter: &'a Exporter,
) -> impl FnOnce(&mut ServiceConfig) + 'a {
    |config| {
        trace!("Registering export service app data");
        config.app_data(Data::new(pokemon::Service::new(pool.clone())));
        config.app_data(Data::new(exporter.clone()));

        trace!("Adding API export endpoints for /upload");
        config.service(export_all).service(export_by_name).service(export_by_id);
    }
}

#[cfg_attr(
    doc,
    doc = r"
        API endpoint to export a page of pokemons as one CSV file.

        Registered as `GET /upload/all`. Accepts the same `page`/`page_size` query
        parameters as the [list endpoint](crate::api::pokemons::list), with the same
        defaults, so the exported file matches what a list call would return.

        # Output

        An [`ExportReceipt`] with the URL of the uploaded file, serialized as JSON.
    "
)]
#[cfg_attr(not(doc), doc = "Exports a page of Pokemons as one CSV file in the export bucket")]
#[utoipa::path(
    context_path = "/upload",
    params(ListParams),
    responses(
        (status = OK, response = ExportReceipt),
        ServerErrorResponse,
    ),
)]
#[get("/all", name = "/all")]
pub async fn export_all(
    params: Query<ListParams>,
    service: Data<pokemon::Service>,
    exporter: Data<Exporter>,
) -> HttpResult {
    let page = service.get_ref().get_pokemons(params.page, params.page_size).await?;
    let receipt = exporter.get_ref().export(&page.pokemons, "all").await?;

    Ok(HttpResponse::Ok().json(receipt))
}

#[cfg_attr(
    doc,
    doc = r"
        API endpoint to export one pokemon as a CSV file, looked up by ID.

        Registered as `GET /upload/{id}`.

        # Input

        - `{id}`: ID of pokemon to export.

        # Output

        An [`ExportReceipt`] with the URL of the uploaded file, serialized as JSON.
    "
)]
#[cfg_attr(not(doc), doc = "Exports one Pokemon as a CSV file in the export bucket")]
#[utoipa::path(
    context_path = "/upload",
    params(Id),
    responses(
        (status = OK, response = ExportReceipt),
        InvalidIdParamResponse,
        IdNotFoundResponse,
        ServerErrorResponse,
    ),
)]
#[get("/{id}", name = "/{id}")]
pub async fn export_by_id(
    id: Path<Id>,
    service: Data<pokemon::Service>,
    exporter: Data<Exporter>,
) -> HttpResult {
    let pokemon_id = *id.into_inner();

    let pokemon = service.get_ref().get_pokemon(pokemon_id).await?;
    let receipt = exporter.get_ref().export(&[pokemon], &format!("id/{}", pokemon_id)).await?;

    Ok(HttpResponse::Ok().json(receipt))
}

#[cfg_attr(
    doc,
    doc = r"
        API endpoint to export one pokemon as a CSV file, looked up by name.

        Registered as `GET /upload/name/{name}`.

        # Input

        - `{name}`: name of pokemon to export.

        # Output

        An [`ExportReceipt`] with the URL of the uploaded file, serialized as JSON.
    "
)]
#[cfg_attr(not(doc), doc = "Exports one Pokemon as a CSV file in the export bucket, looked up by name")]
#[utoipa::path(
    context_path = "/upload",
    params(Name),
    responses(
        (status = OK, response = ExportReceipt),
        NameNotFoundResponse,
        ServerErrorResponse,
    ),
)]
#[get("/name/{name}", name = "/name/{name}")]
pub async fn export_by_name(
    name: Path<Name>,
    service: Data<pokemon::Service>,
    exporter: Data<Exporter>,
) -> HttpResult {
    let pokemon_name = name.into_inner().name;

    let pokemon = service.get_ref().get_pokemon_by_name(&pokemon_name).await?;
    let receipt =
        exporter.get_ref().export(&[pokemon], &format!("name/{}", pokemon_name)).await?;

    Ok(HttpResponse::Ok().json(receipt))
}
