use std::net::TcpListener;

use actix_web::{dev::Server, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::{
    configuration::Settings,
    gateway::{
        client::ServerClient,
        routes::{
            bookings::{approve_booking, cancel_booking, create_booking, get_booking, get_bookings, get_owner_bookings},
            items::{create_comment, create_item, get_item, get_own_items, patch_item, search_items},
            requests::{create_request, get_other_requests, get_own_requests, get_request},
            users::{create_user, delete_user, get_user, get_users, patch_user}
        }
    },
    routes::health_check
};

pub struct GatewayApplication{
    pub host: String,
    pub port: u16,
    pub server: Server
}

impl GatewayApplication {
    pub fn new(settings: Settings) -> Result<Self, anyhow::Error>{
        let client = ServerClient::new(settings.gateway.server_url);

        let listener = TcpListener::bind((
            settings.gateway.host.as_str(),
            settings.gateway.port
        ))?;
        let port = listener.local_addr()?.port();

        let client = web::Data::new(client);
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
                        .route("/{userId}", web::delete().to(delete_user))
                )
                .service(
                    web::scope("/items")
                        .route("/search", web::get().to(search_items))
                        .route("", web::get().to(get_own_items))
                        .route("", web::post().to(create_item))
                        .route("/{itemId}", web::get().to(get_item))
                        .route("/{itemId}", web::patch().to(patch_item))
                        .route("/{itemId}/comment", web::post().to(create_comment))
                )
                .service(
                    web::scope("/bookings")
                        .route("/owner", web::get().to(get_owner_bookings))
                        .route("", web::get().to(get_bookings))
                        .route("", web::post().to(create_booking))
                        .route("/{bookingId}", web::get().to(get_booking))
                        .route("/{bookingId}", web::patch().to(approve_booking))
                        .route("/{bookingId}/canceled", web::patch().to(cancel_booking))
                )
                .service(
                    web::scope("/requests")
                        .route("/all", web::get().to(get_other_requests))
                        .route("", web::get().to(get_own_requests))
                        .route("", web::post().to(create_request))
                        .route("/{requestId}", web::get().to(get_request))
                )
                .app_data(client.clone())
        })
        .listen(listener)?
        .run();

        Ok(GatewayApplication{
            host: settings.gateway.host,
            port,
            server
        })
    }
}
