use std::process;

use log::error;

mod app;
mod config;
mod errors;
mod handlers;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod storage;
mod types;
mod utils;
mod validations;

use errors::AppError;

#[actix_web::main]
async fn main() {
    let Err(err) = app::server().await else {
        return;
    };

    let code = match &err {
        AppError::Server(e) => {
            error!("Critical server error: {}", e);
            1
        }
        // The logger may not be up yet, so these also go to stderr
        AppError::Config(e) => {
            eprintln!("sniplink: configuration error: {}", e);
            error!("Critical configuration error: {}", e);
            2
        }
        AppError::Logger(e) => {
            eprintln!("sniplink: logger error: {}", e);
            3
        }
        _ => {
            error!("Startup failed: {}", err);
            1
        }
    };
    process::exit(code);
}
