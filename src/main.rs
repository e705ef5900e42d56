use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use testgen::api::{configure_routes, AppState};
use testgen::{banner, config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Print the startup banner
    banner::print_banner();

    // A missing .env is fine; the environment may already be set
    let dotenv_result = dotenvy::dotenv();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    if let Err(e) = dotenv_result {
        log::debug!("No .env file loaded: {}", e);
    }

    let app_config = config::AppConfig::from_env().map_err(std::io::Error::other)?;

    if app_config.completion.api_key.is_none() {
        log::warn!("GROQ_API_KEY is not set; completion requests will be unauthenticated");
    }

    std::fs::create_dir_all(&app_config.reports_dir)?;
    log::info!("Reports directory: {}", app_config.reports_dir.display());

    let bind = (app_config.bind_addr.clone(), app_config.port);
    let state = AppState::new(app_config).map_err(std::io::Error::other)?;

    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(bind)?
    .run()
    .await
}
