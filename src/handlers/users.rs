/// User handlers - HTTP endpoints for user records
use crate::db::EntityStore;
use crate::error::Result;
use crate::services::UserService;
use actix_web::{web, HttpResponse};
use std::sync::Arc;

/// List every registered user. Open, as in the reference behavior.
pub async fn list_users(store: web::Data<Arc<dyn EntityStore>>) -> Result<HttpResponse> {
    let service = UserService::new(store.get_ref().clone());
    let users = service.list().await?;
    Ok(HttpResponse::Ok().json(users))
}
