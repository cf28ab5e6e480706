/// HTTP middleware utilities
///
/// Provides the authenticated-subject extractor used by protected routes
/// and the Accept-header negotiation guard. Verification is delegated to
/// the process-wide `TokenVerifier`; a failed or missing token rejects
/// the request uniformly before any resource access is attempted.
use crate::auth::TokenVerifier;
use crate::error::AppError;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use std::sync::Arc;

/// The verified subject (`sub` claim) of the request's bearer token.
#[derive(Debug, Clone)]
pub struct Subject(pub String);

impl FromRequest for Subject {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let verifier = req
            .app_data::<web::Data<Arc<dyn TokenVerifier>>>()
            .cloned();
        let token = bearer_token(req).map(str::to_string);

        Box::pin(async move {
            let verifier = verifier.ok_or(AppError::Unauthorized)?;
            let token = token.ok_or(AppError::Unauthorized)?;
            let claims = verifier.verify(&token).await?;
            Ok(Subject(claims.sub))
        })
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Reject the request with 406 unless the Accept header admits JSON.
/// An absent header accepts anything.
pub fn require_json_accept(req: &HttpRequest) -> Result<(), AppError> {
    let accept = match req.headers().get("Accept").and_then(|h| h.to_str().ok()) {
        Some(accept) => accept,
        None => return Ok(()),
    };

    let acceptable = accept.split(',').any(|part| {
        let media = part.split(';').next().unwrap_or("").trim();
        media == "*/*" || media == "application/*" || media == "application/json"
    });

    if acceptable {
        Ok(())
    } else {
        Err(AppError::NotAcceptable)
    }
}

/// Canonical base URL of this deployment, computed from the request's
/// scheme and host, for self-link construction.
pub fn request_base(req: &HttpRequest) -> String {
    let info = req.connection_info();
    format!("{}://{}", info.scheme(), info.host())
}
