use shareit::{configuration::Settings, gateway::startup::GatewayApplication, telemetry::{get_subscriber, init_subscriber}};

#[actix_web::main]
async fn main() -> anyhow::Result<()>{
    let subscriber = get_subscriber("shareit-gateway".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let settings = Settings::get();

    let application = GatewayApplication::new(settings)?;
    application.server.await?;
    Ok(())
}
