use std::env;
use std::sync::Once;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use diesel::{delete, Connection, RunQueryDsl};
use log::{debug, trace};
use pokevault_rs::db::{get_db_url, get_pool, Pool, PooledConnection, SyncConnection};
use pokevault_rs::helpers::env::load_optional_dotenv;
use pokevault_rs::services::export::Exporter;

#[macro_export]
macro_rules! init_test_service {
    ($app_var:ident, $service_var:ident) => {
        let $app_var = $crate::integration_helpers::app::TestApp::new();
        let $service_var = actix_web::test::init_service(pokevault_rs::pokevault_app!(
            $app_var.get_pool(),
            $app_var.get_exporter()
        ))
        .await;
    };
}

pub struct TestApp {
    pool: Pool,
    exporter: Exporter,
}

impl TestApp {
    pub fn new() -> Self {
        static INIT_TEST_DB_ENV_VAR: Once = Once::new();
        INIT_TEST_DB_ENV_VAR.call_once(|| {
            debug!("Loading environment variables");
            load_optional_dotenv().unwrap();

            debug!("Setting environment variable required to connect to test DB");
            let db_url = get_db_url().unwrap();
            let mut test_db_url = db_url.replace("pokevault-db:", "pokevault-db-test:");
            if test_db_url == db_url {
                test_db_url = test_db_url.replace("5432", "5433");
            }
            env::set_var("DATABASE_URL", test_db_url.replace("/pokevault", "/pokevault-test"));
        });

        debug!("Creating test database connection pool");
        let pool = get_pool().unwrap();

        Self { pool, exporter: build_test_exporter() }
    }

    pub fn get_pool(&self) -> Pool {
        self.pool.clone()
    }

    pub fn get_exporter(&self) -> Exporter {
        self.exporter.clone()
    }

    pub async fn get_pooled_connection(&self) -> PooledConnection {
        self.pool.get().await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        use pokevault_rs::schema::pokemons::dsl::*;

        debug!("Connecting to test DB to perform cleanup");
        let db_url = get_db_url().unwrap();
        let mut connection = SyncConnection::establish(&db_url).unwrap();

        debug!("Deleting all pokemons in test DB");
        let deleted_count = delete(pokemons).execute(&mut connection).unwrap();
        trace!("Cleaned up {} pokemons from test DB", deleted_count);
    }
}

/// Builds an exporter wired to a fixed region and bucket, so tests never depend on ambient
/// AWS configuration. Tests must not exercise the actual upload path.
fn build_test_exporter() -> Exporter {
    let config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .build();

    Exporter::new(Client::from_conf(config), "pokevault-test".into())
}
