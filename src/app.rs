use std::time::Instant;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{debug, info};

use crate::{
    config::{Config, Environment, ServerConfig},
    errors::AppError,
    middleware::RequestLogger,
    repositories,
    routes,
    services::ShortLinkService,
    types::AppState,
};

// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;

// Setup logging with custom format and configuration
fn setup_logging(config: &Config) -> Result<(), AppError> {
    // Configure log level based on environment and config
    let log_level = match config.app.environment {
        Environment::Development => config.app.log_level.clone(),
        Environment::Testing => "debug,actix_web=info,reqwest=info,hyper=info".to_string(),
        Environment::Production => "info,actix_web=warn,reqwest=warn".to_string(),
    };

    let env = Env::default()
        .filter_or("RUST_LOG", log_level)
        .write_style_or("RUST_LOG_STYLE", "always");

    env_logger::try_init_from_env(env)
        .map_err(|e| AppError::Logger(format!("Failed to initialize logger: {}", e)))
}

// Single allowed origin when configured, anything otherwise
fn cors(server: &ServerConfig) -> Cors {
    let cors = match &server.cors_allowed_origin {
        Some(origin) => Cors::default().allowed_origin(origin),
        None => Cors::permissive(),
    };
    cors.allow_any_method().allow_any_header().max_age(3600)
}

pub async fn server() -> AppResult<()> {
    // Load application configuration
    let config = Config::load()?;

    setup_logging(&config)?;

    // Capture start time for uptime calculation
    let start_time = Instant::now();

    info!("Starting {} v{}", config.app.name, config.app.version);
    info!("Environment: {:?}", config.app.environment);
    info!(
        "Binding to {}:{} with {} workers",
        config.server.host, config.server.port, config.server.workers
    );

    if config.app.environment == Environment::Development {
        debug!("Debug logging enabled");
        debug!("Full configuration: {:?}", config);
    }

    let repository = repositories::build(&config.storage, config.links.policy())?;
    let service = web::Data::new(ShortLinkService::new(
        repository,
        config.links.domain.clone(),
    ));
    let storage_backend = service.backend_name();

    let enable_debug_logging = config.app.environment != Environment::Production;

    let log_format = if enable_debug_logging {
        "%a \"%r\" %s %b %T %{x-request-id}o"
    } else {
        "%a \"%r\" %s %b %T \"%{Referer}i\" \"%{User-Agent}i\" %{x-request-id}o"
    };

    let app_config = config.clone();

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(AppState {
                start_time,
                version: app_config.app.version.clone(),
                storage_backend,
            }))
            .app_data(service.clone())
            // Request ID is stamped inside the access log so it shows up there
            .wrap(RequestLogger::new(enable_debug_logging))
            .wrap(Logger::new(log_format))
            .wrap(cors(&app_config.server))
            .configure(routes::configure_routes)
    })
    .workers(config.server.workers)
    .bind((config.server.host.to_string(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
