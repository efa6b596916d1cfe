//! Service used to export pokemons as CSV files to an S3 bucket.

use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use log::info;
use serde::{Deserialize, Serialize};
use utoipa::{ToResponse, ToSchema};

use crate::error::{EnvVarContext, ExportContext, ExportError};
use crate::helpers::env::env_var_or;
use crate::models::pokemon::PokemonWithRelations;

/// Bucket used to store exported CSV files if `EXPORT_BUCKET` is not set.
pub const DEFAULT_EXPORT_BUCKET: &str = "pokemon-application";

/// Entities that can be flattened to CSV records and exported to object storage.
///
/// Dispatch is resolved at compile time: each exportable entity type declares its own
/// record type and the key prefix under which its files are stored in the bucket.
pub trait Exportable {
    /// Prefix of the object keys used for this entity type in the export bucket.
    const KEY_PREFIX: &'static str;

    /// Flat record written to the CSV file for one entity.
    type Record: Serialize;

    /// Flattens this entity into its CSV record.
    fn to_record(&self) -> Self::Record;
}

/// Flat CSV representation of a pokemon.
///
/// Child collections are folded into single columns so that one pokemon maps to one CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonRecord {
    pub id: i64,
    pub name: String,
    pub height: i32,
    pub weight: i32,
    pub xp: i32,
    pub image_url: String,
    pub pokemon_url: String,

    /// Ability names separated by `;`, with `(hidden)` appended to hidden abilities
    pub abilities: String,

    /// Stats as `name=value` pairs separated by `;`
    pub stats: String,

    /// Type names separated by `;`
    pub types: String,
}

impl Exportable for PokemonWithRelations {
    const KEY_PREFIX: &'static str = "pokemon";

    type Record = PokemonRecord;

    fn to_record(&self) -> PokemonRecord {
        let abilities = self
            .abilities
            .iter()
            .map(|ability| {
                if ability.is_hidden {
                    format!("{}(hidden)", ability.name)
                } else {
                    ability.name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(";");
        let stats = self
            .stats
            .iter()
            .map(|stat| format!("{}={}", stat.name, stat.base_stat))
            .collect::<Vec<_>>()
            .join(";");
        let types = self.types.iter().map(|poke_type| poke_type.name.clone()).collect::<Vec<_>>().join(";");

        PokemonRecord {
            id: self.id,
            name: self.name.clone(),
            height: self.height,
            weight: self.weight,
            xp: self.xp,
            image_url: self.image_url.clone(),
            pokemon_url: self.pokemon_url.clone(),
            abilities,
            stats,
            types,
        }
    }
}

/// Service exporting entities as CSV files to an S3 bucket.
///
/// The CSV content is built in memory and uploaded directly, so there are no temporary
/// files to clean up.
#[derive(Clone)]
pub struct Exporter {
    client: Client,
    bucket: String,
}

impl Exporter {
    /// Creates a new exporter using the ambient AWS configuration.
    ///
    /// Credentials and region are resolved the standard AWS way (environment variables,
    /// profile, instance metadata). The destination bucket can be overridden through the
    /// `EXPORT_BUCKET` environment variable; otherwise [`DEFAULT_EXPORT_BUCKET`] is used.
    pub async fn from_env() -> crate::Result<Self> {
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let bucket = env_var_or("EXPORT_BUCKET", DEFAULT_EXPORT_BUCKET)
            .with_env_var_context(|| "failed to read EXPORT_BUCKET environment variable")?;

        Ok(Self::new(Client::new(&sdk_config), bucket))
    }

    /// Creates a new exporter from an existing S3 [`Client`] and bucket name.
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// Exports the given entities as one CSV file in the export bucket.
    ///
    /// The object key is derived from the entity type's key prefix and the given file stem
    /// (see [`object_key`]). Returns a receipt with the URL of the uploaded file.
    pub async fn export<E>(&self, entities: &[E], file_stem: &str) -> crate::Result<ExportReceipt>
    where
        E: Exportable,
    {
        let key = object_key::<E>(file_stem);

        let csv_data = to_csv(entities)
            .with_export_context(|| format!("failed to serialize {} to CSV", key))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type("text/csv")
            .body(ByteStream::from(csv_data))
            .send()
            .await
            .map_err(|err| ExportError::from(Box::new(err)))
            .with_export_context(|| {
                format!("failed to upload {} to bucket {}", key, self.bucket)
            })?;

        info!("exported {} entities to s3://{}/{}", entities.len(), self.bucket, key);

        Ok(ExportReceipt {
            message: format!("file {} uploaded successfully", key),
            file_url: file_url(&self.bucket, &key),
        })
    }
}

/// Returns the object key under which a CSV file for the given entity type is stored.
pub fn object_key<E>(file_stem: &str) -> String
where
    E: Exportable,
{
    format!("{}/{}.csv", E::KEY_PREFIX, file_stem)
}

/// Returns the public URL of an object in the given bucket.
pub fn file_url(bucket: &str, key: &str) -> String {
    format!("https://{}.s3.amazonaws.com/{}", bucket, key)
}

/// Serializes the given entities to an in-memory CSV file, with a header row.
fn to_csv<E>(entities: &[E]) -> Result<Vec<u8>, csv::Error>
where
    E: Exportable,
{
    let mut writer = csv::Writer::from_writer(vec![]);
    for entity in entities {
        writer.serialize(entity.to_record())?;
    }

    writer.into_inner().map_err(|err| csv::Error::from(err.into_error()))
}

#[cfg_attr(
    doc,
    doc = r"
        Receipt returned after a successful export.

        Echoes the uploaded object along with its public URL.
    "
)]
#[cfg_attr(not(doc), doc = "Result of a successful CSV export")]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, ToResponse)]
#[response(
    description = "Export result",
    example = json!({
        "message": "file pokemon/all.csv uploaded successfully",
        "file_url": "https://pokemon-application.s3.amazonaws.com/pokemon/all.csv"
    }),
)]
pub struct ExportReceipt {
    /// Human-readable confirmation message
    pub message: String,

    /// Public URL of the uploaded CSV file
    pub file_url: String,
}
