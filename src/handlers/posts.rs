/// Post handlers - HTTP endpoints for post operations
///
/// Each handler is a sequential pipeline: validate the request shape,
/// authenticate where required, fetch, authorize, mutate, respond. A
/// failing step short-circuits; at most one write happens per request.
use crate::auth::{check_post_visibility, is_owner};
use crate::db::EntityStore;
use crate::error::{AppError, Result};
use crate::middleware::{request_base, require_json_accept, Subject};
use crate::models::{Post, PostAttributes};
use crate::services::PostService;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListPostsResponse {
    pub posts: Vec<Post>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_items: Option<i64>,
}

/// Create a new post owned by the token subject
pub async fn create_post(
    store: web::Data<Arc<dyn EntityStore>>,
    subject: Subject,
    req: HttpRequest,
    body: web::Json<PostAttributes>,
) -> Result<HttpResponse> {
    require_json_accept(&req)?;
    let (content, creation_date, public) =
        body.require_complete().map_err(AppError::Validation)?;

    let service = PostService::new(store.get_ref().clone());
    let post = service
        .create(&subject.0, content, creation_date, public)
        .await?;

    Ok(HttpResponse::Created().json(post.with_self_link(&request_base(&req))))
}

/// Get a post by id; private posts are owner-only
pub async fn get_post(
    store: web::Data<Arc<dyn EntityStore>>,
    subject: Subject,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    require_json_accept(&req)?;

    let service = PostService::new(store.get_ref().clone());
    let post = service
        .get_by_id(&path)
        .await?
        .ok_or(AppError::NotFound)?;

    check_post_visibility(&subject.0, post.public, &post.user_id)?;

    Ok(HttpResponse::Ok().json(post.with_self_link(&request_base(&req))))
}

/// List the subject's own posts, five per page, with a `next` link and a
/// total count while more pages remain
pub async fn list_posts(
    store: web::Data<Arc<dyn EntityStore>>,
    subject: Subject,
    req: HttpRequest,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    require_json_accept(&req)?;

    let service = PostService::new(store.get_ref().clone());
    let page = service
        .list_for_owner(&subject.0, query.cursor.clone())
        .await?;

    let base = request_base(&req);
    let posts = page
        .posts
        .into_iter()
        .map(|post| post.with_self_link(&base))
        .collect();

    let next = page
        .next_cursor
        .map(|cursor| format!("{}/posts?cursor={}", base, urlencoding::encode(&cursor)));

    Ok(HttpResponse::Ok().json(ListPostsResponse {
        posts,
        next,
        total_items: page.total,
    }))
}

/// Full update; every mutable field is required and the owner id, comment
/// list, and upvote count are carried forward unchanged
pub async fn put_post(
    store: web::Data<Arc<dyn EntityStore>>,
    subject: Subject,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<PostAttributes>,
) -> Result<HttpResponse> {
    require_json_accept(&req)?;
    let (content, creation_date, public) =
        body.require_complete().map_err(AppError::Validation)?;

    let service = PostService::new(store.get_ref().clone());
    let current = service
        .get_by_id(&path)
        .await?
        .ok_or(AppError::NotFound)?;

    if !is_owner(&subject.0, &current.user_id) {
        return Err(AppError::Unauthorized);
    }

    let updated = Post {
        content,
        creation_date,
        public,
        ..current
    };
    service.edit(&updated).await?;

    Ok(HttpResponse::Ok().json(updated.with_self_link(&request_base(&req))))
}

/// Partial update; only the fields present in the payload change
pub async fn patch_post(
    store: web::Data<Arc<dyn EntityStore>>,
    subject: Subject,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<PostAttributes>,
) -> Result<HttpResponse> {
    require_json_accept(&req)?;

    let service = PostService::new(store.get_ref().clone());
    let current = service
        .get_by_id(&path)
        .await?
        .ok_or(AppError::NotFound)?;

    if !is_owner(&subject.0, &current.user_id) {
        return Err(AppError::Unauthorized);
    }

    let merged = body.merge_into(current);
    service.edit(&merged).await?;

    Ok(HttpResponse::Ok().json(merged.with_self_link(&request_base(&req))))
}

/// Delete a post. Unauthenticated, as in the reference behavior.
pub async fn delete_post(
    store: web::Data<Arc<dyn EntityStore>>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let service = PostService::new(store.get_ref().clone());
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
