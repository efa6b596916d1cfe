//! Seeds the Pokevault database with initial pokemon data.
//!
//! Unlike the startup seeding (which only runs on an empty database), this program overwrites
//! any existing data. See `README.md` for usage.

use std::env::current_exe;
use std::time::Instant;

use anyhow::Context;
use cargo_metadata::camino::Utf8PathBuf;
use cargo_metadata::MetadataCommand;
use diesel::delete;
use diesel_async::RunQueryDsl;
use log::{info, trace};
use pokevault_rs::db::{get_pool, Pool};
use pokevault_rs::helpers::env::load_optional_dotenv;
use pokevault_rs::seed::{insert_all, read_seed_file};
use simple_logger::SimpleLogger;

/// Main program body.
///
/// Loads pokemon data from the JSON file located at `./seed/pokedex.json` and inserts the
/// pokemons in the Pokevault database, overwriting any existing data.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .init()
        .with_context(|| "failed to initialize logging facility")?;

    info!("Loading environment variables");
    load_optional_dotenv()
        .with_context(|| "failed to load `.env` file containing environment variables")?;

    info!("Starting Pokemon seeding program");
    let start_time = Instant::now();
    let seed_file_path = get_seed_file_path()?;

    info!("Loading pokemon data from {}", seed_file_path);
    let imports = read_seed_file(seed_file_path.as_std_path())
        .with_context(|| "failed to load pokemon data from seed file")?;
    trace!("Found {} pokemons in the seed file", imports.len());

    info!("Creating DB connection pool");
    let pool = get_pool().with_context(|| "failed to create DB connection pool")?;

    info!("Dropping existing pokemons from database, if any");
    drop_existing_pokemons(&pool).await?;

    info!("Inserting pokemons into database");
    let inserted_count = insert_all(&pool, &imports)
        .await
        .with_context(|| "failed to insert pokemons into database")?;
    trace!("{} pokemons have been inserted into database", inserted_count);

    let elapsed = start_time.elapsed();
    info!("Pokemon database seed done in {:.4?}s.", elapsed.as_secs_f64());

    Ok(())
}

/// Returns the path to the seed pokemon JSON file.
fn get_seed_file_path() -> anyhow::Result<Utf8PathBuf> {
    // First try looking in the directory of the current executable.
    let mut seed_file_path = current_exe()?;
    seed_file_path.pop();
    seed_file_path.push("seed");
    seed_file_path.push("pokedex.json");
    if seed_file_path.is_file() {
        return seed_file_path
            .try_into()
            .with_context(|| "seed file path contains invalid UTF-8 characters");
    }

    // If we didn't find seed file yet, we must be in dev environment, so use cargo.
    let metadata = MetadataCommand::new()
        .exec()
        .with_context(|| "failed to get metadata to fetch workspace root")?;

    let mut seed_file_path = metadata.workspace_root;
    seed_file_path.push("seed");
    seed_file_path.push("pokedex.json");

    Ok(seed_file_path)
}

/// Clears the Pokevault database of any existing pokemons.
///
/// Child rows are removed by the cascade on the child tables.
async fn drop_existing_pokemons(pool: &Pool) -> anyhow::Result<()> {
    use pokevault_rs::schema::pokemons::dsl::*;

    let mut connection = pool
        .get()
        .await
        .with_context(|| "failed to get a database connection from the pool")?;

    let deleted_count = delete(pokemons)
        .execute(&mut connection)
        .await
        .with_context(|| "failed to delete existing pokemons from database")?;
    trace!("{} existing pokemons have been deleted", deleted_count);

    Ok(())
}
