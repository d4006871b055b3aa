use actix_web::{web, HttpResponse, Responder};

use crate::types::{AppState, HealthStatus, ResponsePayload};

mod short_link;

// Handler function for the root route "/"
async fn index() -> impl Responder {
    let welcome_message = ResponsePayload {
        status: 200,
        message: String::from("SnipLink is up. Shorten away!"),
    };

    HttpResponse::Ok().json(welcome_message)
}

// Handler function for the health check endpoint
async fn health_check(data: web::Data<AppState>) -> impl Responder {
    let status = HealthStatus {
        status: String::from("OK"),
        version: data.version.clone(),
        storage_backend: data.storage_backend.to_string(),
        uptime_seconds: data.start_time.elapsed().as_secs(),
    };

    HttpResponse::Ok().json(status)
}

// Configure all routes function
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index));
    cfg.route("/health", web::get().to(health_check));
    short_link::configure_routes(cfg);
}
