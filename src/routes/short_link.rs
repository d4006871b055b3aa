use actix_web::web;

use crate::handlers::{
    click_handler, create_handler, delete_handler, get_by_id_handler, list_handler,
    stats_handler, update_handler,
};

// Configure short link routes; `/stats` goes before `/{id}`
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/links")
            .route("", web::post().to(create_handler))
            .route("", web::get().to(list_handler))
            .route("/stats", web::get().to(stats_handler))
            .route("/{id}", web::get().to(get_by_id_handler))
            .route("/{id}", web::patch().to(update_handler))
            .route("/{id}", web::delete().to(delete_handler))
            .route("/{id}/click", web::post().to(click_handler)),
    );
}
