use std::net::TcpListener;

use actix_web::{dev::Server, web, App, HttpServer};
use diesel::{r2d2::ConnectionManager, PgConnection};
use r2d2::Pool;
use tracing_actix_web::TracingLogger;

use crate::{
    configuration::{DatabaseSettings, Settings},
    routes::{
        bookings::{approve::approve, cancel::cancel, get::{get_booking_by_id, get_bookings_by_state, get_owner_bookings}, post::create_booking},
        health_check,
        items::{comment::create_comment, get::{get_item, get_own_items}, post::create_item, search::search, update::patch_item},
        requests::{get::{get_other_requests, get_own_requests, get_request}, post::create_request},
        users::{delete::remove_user, get::{get_user, get_users}, post::create_user, update::patch_user}
    },
    utils::DbPool
};

pub fn get_connection_pool(settings: &DatabaseSettings) -> Result<DbPool, r2d2::Error>{
    Pool::builder()
        .build(ConnectionManager::<PgConnection>::new(settings.get_database_table_url()))
}

pub struct Application{
    pub host: String,
    pub port: u16,
    pub server: Server
}

impl Application {
    pub async fn new(settings: Settings) -> Result<Self, anyhow::Error>{
        let pool = get_connection_pool(&settings.database)?;

        let listener = TcpListener::bind((
            settings.application.host.as_str(),
            settings.application.port
        ))?;
        let port = listener.local_addr()?.port();

        let pool = web::Data::new(pool);
        let server = HttpServer::new(move || {
            App::new()
                .wrap(TracingLogger::default())
                .route("/health", web::get().to(health_check))
                .service(
                    web::scope("/users")
                        .route("", web::get().to(get_users))
                        .route("", web::post().to(create_user))
                        .route("/{userId}", web::get().to(get_user))
                        .route("/{userId}", web::patch().to(patch_user))
                        .route("/{userId}", web::delete().to(remove_user))
                )
                .service(
                    web::scope("/items")
                        // /search has to come before the /{itemId} matcher
                        .route("/search", web::get().to(search))
                        .route("", web::get().to(get_own_items))
                        .route("", web::post().to(create_item))
                        .route("/{itemId}", web::get().to(get_item))
                        .route("/{itemId}", web::patch().to(patch_item))
                        .route("/{itemId}/comment", web::post().to(create_comment))
                )
                .service(
                    web::scope("/bookings")
                        .route("/owner", web::get().to(get_owner_bookings))
                        .route("", web::get().to(get_bookings_by_state))
                        .route("", web::post().to(create_booking))
                        .route("/{bookingId}", web::get().to(get_booking_by_id))
                        .route("/{bookingId}", web::patch().to(approve))
                        .route("/{bookingId}/canceled", web::patch().to(cancel))
                )
                .service(
                    web::scope("/requests")
                        .route("/all", web::get().to(get_other_requests))
                        .route("", web::get().to(get_own_requests))
                        .route("", web::post().to(create_request))
                        .route("/{requestId}", web::get().to(get_request))
                )
                .app_data(pool.clone())
        })
        .listen(listener)?
        .run();

        Ok(Application{
            host: settings.application.host,
            port,
            server
        })
    }
}
