use crate::app_env::test::TEST_DB_URL;
use crate::db;
use dotenv::dotenv;
use lazy_static::lazy_static;
use rand::{Rng, thread_rng};
use sqlx::{Connection, PgConnection, PgPool};
use std::env;
use std::future::Future;
use std::panic;
use tokio::runtime::Runtime;

lazy_static! {
    static ref TOKIO_RT: Runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Tokio runtime failed to initialize");
}

/// A database created for a single test and dropped once the test finishes
struct ThrowawayDatabase {
    server_url: String,
    name: String,
}

impl ThrowawayDatabase {
    async fn create(server_url: &str) -> Result<Self, sqlx::Error> {
        let db_id: u32 = thread_rng().gen_range(10_000..99_999);
        let name = format!("todo_test_db_{db_id}");

        let mut conn = PgConnection::connect(server_url).await?;
        sqlx::query(&format!("CREATE DATABASE {name}"))
            .execute(&mut conn)
            .await?;
        conn.close().await?;

        Ok(Self {
            server_url: server_url.to_owned(),
            name,
        })
    }

    fn url(&self) -> String {
        format!("{}/{}", self.server_url, self.name)
    }

    async fn drop_database(self) {
        let mut conn = match PgConnection::connect(&self.server_url).await {
            Ok(conn) => conn,
            Err(cxn_err) => {
                println!(
                    "Could not reconnect to drop test database {}, remove it manually. Error: {cxn_err}",
                    self.name
                );
                return;
            }
        };

        if let Err(drop_err) = sqlx::query(&format!("DROP DATABASE IF EXISTS {} WITH (FORCE)", self.name))
            .execute(&mut conn)
            .await
        {
            println!(
                "Failed to drop test database {}, remove it manually. Error: {drop_err}",
                self.name
            );
        }
    }
}

/// Runs [test_fn] against a freshly created database with the item schema in place.
/// The database is dropped afterwards, even if the test panics.
///
/// Expects the TEST_DB_URL environment variable to hold a postgres URL without a database name
pub fn prepare_db_and_test<F, R>(test_fn: F)
where
    F: FnOnce(PgPool) -> R,
    R: Future<Output = ()> + Send + 'static,
{
    if dotenv().is_err() {
        println!("Test is running without .env file.");
    }

    let server_url = env::var(TEST_DB_URL).unwrap_or_else(|_| {
        panic!("{TEST_DB_URL} must hold the base postgres connection string")
    });

    let test_outcome = TOKIO_RT.block_on(async move {
        let test_db = ThrowawayDatabase::create(&server_url)
            .await
            .unwrap_or_else(|db_err| panic!("Failed to create test database: {db_err}"));

        let pool = db::connect_sqlx(&test_db.url())
            .await
            .expect("Could not connect to the test database");
        db::ensure_schema(&pool)
            .await
            .expect("Could not create the item schema");

        let test_outcome = tokio::spawn(test_fn(pool.clone())).await;

        pool.close().await;
        test_db.drop_database().await;

        test_outcome
    });

    if let Err(join_err) = test_outcome {
        if join_err.is_panic() {
            panic::resume_unwind(join_err.into_panic());
        }
        panic!("Test task did not complete: {join_err}");
    }
}
