use actix_web::{web, HttpResponse, Responder};
use log::info;
use serde_json::json;

use crate::{
    models::{CreateShortLinkDto, UpdateShortLinkDto},
    services::{ShortLinkService, ShortLinkServiceTrait},
    types::Result,
};

/// Create short link route handler
pub async fn create_handler(
    dto: web::Json<CreateShortLinkDto>,
    service: web::Data<ShortLinkService>,
) -> Result<impl Responder> {
    let link = service.create(dto.into_inner()).await?;
    Ok(HttpResponse::Created().json(json!({
        "data": link,
        "message": "Short link created successfully",
    })))
}

/// List all links route handler, newest first
pub async fn list_handler(service: web::Data<ShortLinkService>) -> Result<impl Responder> {
    let links = service.list().await;
    Ok(HttpResponse::Ok().json(json!({
        "data": links,
        "message": "Successfully retrieved links",
    })))
}

/// Totals shown in the dashboard header
pub async fn stats_handler(service: web::Data<ShortLinkService>) -> Result<impl Responder> {
    let stats = service.stats().await;
    Ok(HttpResponse::Ok().json(json!({
        "data": stats,
        "message": "Successfully retrieved link stats",
    })))
}

/// Get link by ID route handler
pub async fn get_by_id_handler(
    id: web::Path<i64>,
    service: web::Data<ShortLinkService>,
) -> Result<impl Responder> {
    let link = service.get(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "data": link,
        "message": "Successfully retrieved link",
    })))
}

/// Toggle the active flag route handler
pub async fn update_handler(
    id: web::Path<i64>,
    dto: web::Json<UpdateShortLinkDto>,
    service: web::Data<ShortLinkService>,
) -> Result<impl Responder> {
    let link = service.set_active(id.into_inner(), dto.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "data": link,
        "message": "Successfully updated link",
    })))
}

/// Record a click-through route handler
pub async fn click_handler(
    id: web::Path<i64>,
    service: web::Data<ShortLinkService>,
) -> Result<impl Responder> {
    let link = service.record_click(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "data": link,
        "message": "Click recorded",
    })))
}

/// Delete link route handler
pub async fn delete_handler(
    id: web::Path<i64>,
    service: web::Data<ShortLinkService>,
) -> Result<impl Responder> {
    let id = id.into_inner();
    service.delete(id).await?;
    info!("Link {} removed", id);
    Ok(HttpResponse::Ok().json(json!({
        "deleted_id": id,
        "message": format!("Successfully deleted link with ID '{}'", id),
    })))
}
