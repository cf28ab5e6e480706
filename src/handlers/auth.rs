/// OAuth2 sign-in handlers
///
/// `GET /auth` redirects to the identity provider's consent screen;
/// `GET /oauth` is the registered callback. On a first login the callback
/// creates the user record before redirecting to the profile page.
use crate::auth::{GoogleOAuthClient, TokenVerifier};
use crate::db::EntityStore;
use crate::error::{AppError, Result};
use crate::services::UserService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
    pub state: String,
}

/// Redirect to the identity provider
pub async fn begin_auth(oauth: web::Data<GoogleOAuthClient>) -> Result<HttpResponse> {
    let url = oauth.authorize_url();
    Ok(HttpResponse::Found()
        .append_header(("Location", url))
        .finish())
}

/// Authorization-code callback: exchange the code, verify the ID token,
/// create the user on first login, and redirect to the profile page.
pub async fn oauth_callback(
    oauth: web::Data<GoogleOAuthClient>,
    verifier: web::Data<Arc<dyn TokenVerifier>>,
    store: web::Data<Arc<dyn EntityStore>>,
    query: web::Query<CallbackQuery>,
) -> Result<HttpResponse> {
    if !oauth.take_state(&query.state) {
        return Err(AppError::Unauthorized);
    }

    let id_token = oauth.exchange_code(&query.code).await?;
    let claims = verifier.verify(&id_token).await?;

    let service = UserService::new(store.get_ref().clone());
    let user = service
        .find_or_create(&claims.sub, &claims.display_name())
        .await?;

    let location = format!(
        "/profile?id={}&token={}",
        user.id,
        urlencoding::encode(&id_token)
    );
    Ok(HttpResponse::Found()
        .append_header(("Location", location))
        .finish())
}
