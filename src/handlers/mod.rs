/// HTTP handlers for the Posts service
///
/// This module contains handlers for:
/// - Pages: the HTML welcome and profile pages
/// - Auth: the OAuth2 sign-in flow
/// - Users, Posts, Comments: the JSON resource surface
///
/// Route wiring lives in `configure` so the binary and the integration
/// tests drive the same table.
pub mod auth;
pub mod comments;
pub mod pages;
pub mod posts;
pub mod users;

use actix_web::web;

/// Register every route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(pages::home))
        .route("/profile", web::get().to(pages::profile))
        .route("/health", web::get().to(pages::health))
        .route("/auth", web::get().to(auth::begin_auth))
        .route("/oauth", web::get().to(auth::oauth_callback))
        .route("/users", web::get().to(users::list_users))
        .service(
            web::resource("/posts")
                .route(web::post().to(posts::create_post))
                .route(web::get().to(posts::list_posts))
                .route(web::delete().to(posts::reject_bulk_delete)),
        )
        .service(
            web::resource("/posts/{id}")
                .route(web::get().to(posts::get_post))
                .route(web::put().to(posts::put_post))
                .route(web::patch().to(posts::patch_post))
                .route(web::delete().to(posts::delete_post)),
        )
        .service(
            web::resource("/comments")
                .route(web::post().to(comments::create_comment))
                .route(web::get().to(comments::list_comments))
                .route(web::delete().to(comments::reject_bulk_delete)),
        )
        .service(
            web::resource("/comments/{id}")
                .route(web::get().to(comments::get_comment))
                .route(web::put().to(comments::put_comment))
                .route(web::patch().to(comments::patch_comment))
                .route(web::delete().to(comments::delete_comment)),
        );
}
