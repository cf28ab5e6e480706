/// Comment handlers - HTTP endpoints for comment operations
///
/// Creation requires a bearer token; the remaining operations are open,
/// matching the reference behavior. Comments carry no owner and are not
/// linked to posts.
use crate::db::EntityStore;
use crate::error::{AppError, Result};
use crate::middleware::{request_base, Subject};
use crate::models::{Comment, CommentAttributes};
use crate::services::CommentService;
use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;

/// Create a new comment
pub async fn create_comment(
    store: web::Data<Arc<dyn EntityStore>>,
    _subject: Subject,
    req: HttpRequest,
    body: web::Json<CommentAttributes>,
) -> Result<HttpResponse> {
    let (content, creation_date, upvote) =
        body.require_complete().map_err(AppError::Validation)?;

    let service = CommentService::new(store.get_ref().clone());
    let comment = service.create(content, creation_date, upvote).await?;

    Ok(HttpResponse::Created().json(comment.with_self_link(&request_base(&req))))
}

/// List every comment
pub async fn list_comments(
    store: web::Data<Arc<dyn EntityStore>>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let service = CommentService::new(store.get_ref().clone());
    let base = request_base(&req);
    let comments: Vec<Comment> = service
        .list()
        .await?
        .into_iter()
        .map(|comment| comment.with_self_link(&base))
        .collect();

    Ok(HttpResponse::Ok().json(comments))
}

/// Get a single comment
pub async fn get_comment(
    store: web::Data<Arc<dyn EntityStore>>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let service = CommentService::new(store.get_ref().clone());
    let comment = service
        .get_by_id(&path)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(comment.with_self_link(&request_base(&req))))
}

/// Full update; every mutable field is required
pub async fn put_comment(
    store: web::Data<Arc<dyn EntityStore>>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<CommentAttributes>,
) -> Result<HttpResponse> {
    let (content, creation_date, upvote) =
        body.require_complete().map_err(AppError::Validation)?;

    let service = CommentService::new(store.get_ref().clone());
    let current = service
        .get_by_id(&path)
        .await?
        .ok_or(AppError::NotFound)?;

    let updated = Comment {
        content,
        creation_date,
        upvote,
        ..current
    };
    service.edit(&updated).await?;

    Ok(HttpResponse::Ok().json(updated.with_self_link(&request_base(&req))))
}

/// Partial update; only the fields present in the payload change
pub async fn patch_comment(
    store: web::Data<Arc<dyn EntityStore>>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<CommentAttributes>,
) -> Result<HttpResponse> {
    let service = CommentService::new(store.get_ref().clone());
    let current = service
        .get_by_id(&path)
        .await?
        .ok_or(AppError::NotFound)?;

    let merged = body.merge_into(current);
    service.edit(&merged).await?;

    Ok(HttpResponse::Ok().json(merged.with_self_link(&request_base(&req))))
}

/// Delete a comment
pub async fn delete_comment(
    store: web::Data<Arc<dyn EntityStore>>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let service = CommentService::new(store.get_ref().clone());
    service
        .get_by_id(&path)
        .await?
        .ok_or(AppError::NotFound)?;

    service.delete(&path).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Bulk delete of the collection is never allowed
pub async fn reject_bulk_delete() -> Result<HttpResponse> {
    Err(AppError::MethodNotAllowed)
}
