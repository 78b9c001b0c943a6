use std::error::Error;

use diesel::{pg::Pg, r2d2::ConnectionManager, Connection, PgConnection, RunQueryDsl};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use fake::{faker::name::en::Name, Fake};
use once_cell::sync::Lazy;
use r2d2::Pool;
use shareit::{
    configuration::{DatabaseSettings, Settings},
    gateway::startup::GatewayApplication,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
    utils::DbPool
};
use uuid::Uuid;
use wiremock::MockServer;

static LOGGER_INSTANCE: Lazy<()> = Lazy::new(|| {
    let log_level = "info".to_string();
    let name = "shareit-test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name, log_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(name, log_level, std::io::sink);
        init_subscriber(subscriber);
    }

    ()
});

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

fn run_migrations(connection: &mut impl MigrationHarness<Pg>)
    -> Result<(), Box<dyn Error + Send + Sync + 'static>>
{
    connection.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

pub struct TestApp{
    pub host: String,
    pub port: u16,
    pub pool: DbPool,
    pub api_client: reqwest::Client
}

impl TestApp {
    fn create_db(settings: &DatabaseSettings) -> DbPool{
        let mut connection = PgConnection::establish(&format!("{}/postgres", settings.get_database_url()))
                                .expect("Failed to connect to postgres database");

        let query = format!(r#"CREATE DATABASE "{}";"#, settings.name);
        diesel::sql_query(query)
            .execute(&mut connection)
            .expect("Failed to create test database");

        let pool = Pool::new(ConnectionManager::<PgConnection>::new(settings.get_database_table_url()))
            .expect("Failed to build connection pool to test database");

        let mut conn = pool.get().expect("Failed to get connection to test database");
        run_migrations(&mut conn).expect("Failed to run migrations");

        pool
    }

    pub fn url(&self, path: &str) -> String{
        format!("http://{}:{}{}", self.host, self.port, path)
    }

    pub async fn spawn_app() -> TestApp{
        Lazy::force(&LOGGER_INSTANCE);

        let mut settings = Settings::get();
        settings.application.port = 0;
        settings.database.name = Uuid::new_v4().to_string();

        let pool = TestApp::create_db(&settings.database);

        let application = Application::new(settings)
                            .await
                            .expect("Failed to build application");

        let host = application.host.clone();
        let port = application.port;
        tokio::task::spawn(application.server);

        TestApp{
            host,
            port,
            pool,
            api_client: reqwest::Client::new()
        }
    }

    // Creates a user through the API and returns its id
    pub async fn create_user(&self) -> i64{
        let name: String = Name().fake();
        let body = serde_json::json!({
            "name": name,
            "email": format!("{}@example.com", Uuid::new_v4())
        });

        let response = self.api_client.post(self.url("/users"))
            .json(&body)
            .send()
            .await
            .expect("Failed to create user");
        assert_eq!(response.status().as_u16(), 200);

        response.json::<serde_json::Value>().await.unwrap()["id"]
            .as_i64()
            .expect("User response carries no id")
    }

    // Creates an item through the API and returns its id
    pub async fn create_item(&self, owner_id: i64, name: &str, description: &str, available: bool) -> i64{
        let body = serde_json::json!({
            "name": name,
            "description": description,
            "available": available
        });

        let response = self.api_client.post(self.url("/items"))
            .header("X-Sharer-User-Id", owner_id)
            .json(&body)
            .send()
            .await
            .expect("Failed to create item");
        assert_eq!(response.status().as_u16(), 200);

        response.json::<serde_json::Value>().await.unwrap()["id"]
            .as_i64()
            .expect("Item response carries no id")
    }
}

pub struct GatewayApp{
    pub host: String,
    pub port: u16,
    pub server_stub: MockServer,
    pub api_client: reqwest::Client
}

impl GatewayApp {
    pub fn url(&self, path: &str) -> String{
        format!("http://{}:{}{}", self.host, self.port, path)
    }

    // Gateway under test, with a wiremock stub standing in for the
    // core server
    pub async fn spawn_gateway() -> GatewayApp{
        Lazy::force(&LOGGER_INSTANCE);

        let server_stub = MockServer::start().await;

        let mut settings = Settings::get();
        settings.gateway.port = 0;
        settings.gateway.server_url = server_stub.uri();

        let application = GatewayApplication::new(settings)
                            .expect("Failed to build gateway application");

        let host = application.host.clone();
        let port = application.port;
        tokio::task::spawn(application.server);

        GatewayApp{
            host,
            port,
            server_stub,
            api_client: reqwest::Client::new()
        }
    }
}
