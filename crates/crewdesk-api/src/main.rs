use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();
    crewdesk_api::telemetry::init_telemetry();

    let config = crewdesk_core::Config::from_env()?;
    let (_state, app) = crewdesk_api::setup::initialize_app(config.clone()).await?;
    crewdesk_api::setup::server::start_server(&config, app).await
}
