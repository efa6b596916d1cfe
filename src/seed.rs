//! Initial seeding of the Pokevault database.
//!
//! The service ships with a bundled JSON dataset (see [`DEFAULT_SEED_FILE`]) that is loaded
//! at startup if the database is empty. Seeding is idempotent: a database that already
//! contains pokemons is left untouched.

use std::fs;
use std::path::Path;

use diesel_async::scoped_futures::ScopedFutureExt;
use log::info;
use validator::Validate;

use crate::db::uow::UnitOfWork;
use crate::db::Pool;
use crate::error::{EnvVarContext, QueryContext, SeedContext};
use crate::helpers::env::env_var_or;
use crate::models::pokemon::ImportPokemon;

/// Seed dataset loaded if `SEED_FILE` is not set, relative to the working directory.
pub const DEFAULT_SEED_FILE: &str = "seed/pokedex.json";

/// Returns the path of the seed dataset to load.
///
/// Can be overridden through the `SEED_FILE` environment variable; otherwise
/// [`DEFAULT_SEED_FILE`] is used.
pub fn get_seed_file() -> crate::Result<String> {
    env_var_or("SEED_FILE", DEFAULT_SEED_FILE)
        .with_env_var_context(|| "failed to read SEED_FILE environment variable")
}

/// Reads and validates the seed dataset from the given JSON file.
pub fn read_seed_file(path: &Path) -> crate::Result<Vec<ImportPokemon>> {
    let json = fs::read_to_string(path)
        .with_seed_context(|| format!("failed to read seed file {}", path.display()))?;

    let imports: Vec<ImportPokemon> = serde_json::from_str(&json)
        .with_seed_context(|| format!("failed to parse seed file {}", path.display()))?;

    for import in &imports {
        import.validate().with_seed_context(|| {
            format!("seed file {} contains invalid pokemon {}", path.display(), import.name)
        })?;
    }

    Ok(imports)
}

/// Inserts all given imported pokemons, with their children, in one transaction.
///
/// Returns the number of pokemons inserted. If any insert fails (for instance because a
/// name collides with an existing pokemon), nothing is persisted.
pub async fn insert_all(pool: &Pool, imports: &[ImportPokemon]) -> crate::Result<usize> {
    let imports = imports.to_vec();

    let mut uow = UnitOfWork::begin(pool).await?;
    uow.run(|mut repo| {
        async move {
            for import in &imports {
                let pokemon = repo.insert(&import.scalar_row()).await?;
                repo.insert_children(
                    &import.ability_rows(pokemon.id),
                    &import.stat_rows(pokemon.id),
                    &import.type_rows(pokemon.id),
                )
                .await?;
            }

            Ok(imports.len())
        }
        .scope_boxed()
    })
    .await
    .with_query_context(|| "failed to insert seed pokemons")
}

/// Seeds the database with the bundled dataset if it is empty.
///
/// Called at service startup. Returns the number of pokemons inserted; 0 means the database
/// already contained data and was left untouched.
pub async fn load_initial_data(pool: &Pool) -> crate::Result<usize> {
    let mut uow = UnitOfWork::begin(pool).await?;
    let existing = uow
        .run_read(|mut repo| async move { repo.count().await }.scope_boxed())
        .await
        .with_query_context(|| "failed to count pokemons before seeding")?;
    drop(uow);

    if existing > 0 {
        info!("database already contains {} pokemons; skipping initial seeding", existing);
        return Ok(0);
    }

    let seed_file = get_seed_file()?;
    let imports = read_seed_file(Path::new(&seed_file))?;
    let inserted = insert_all(pool, &imports).await?;

    info!("seeded database with {} pokemons from {}", inserted, seed_file);

    Ok(inserted)
}
