#![allow(dead_code)]
//! Shared fixtures for the HTTP integration tests: an in-memory entity
//! store and a stub token verifier that accepts `token-for:<sub>` bearer
//! tokens.

use actix_web::web;
use async_trait::async_trait;
use posts_service::auth::{Claims, TokenVerifier};
use posts_service::db::{EntityStore, MemoryStore};
use posts_service::error::AppError;
use std::sync::Arc;

/// Verifier that trusts tokens of the form `token-for:<sub>` and rejects
/// everything else, standing in for the JWKS-backed verifier.
pub struct StubVerifier;

#[async_trait]
impl TokenVerifier for StubVerifier {
    async fn verify(&self, token: &str) -> posts_service::Result<Claims> {
        match token.strip_prefix("token-for:") {
            Some(sub) if !sub.is_empty() => Ok(Claims {
                iss: "https://accounts.google.com".to_string(),
                sub: sub.to_string(),
                exp: 4_102_444_800,
                email: None,
                name: None,
            }),
            _ => Err(AppError::Unauthorized),
        }
    }
}

pub fn store_data() -> web::Data<Arc<dyn EntityStore>> {
    web::Data::new(Arc::new(MemoryStore::new()) as Arc<dyn EntityStore>)
}

pub fn verifier_data() -> web::Data<Arc<dyn TokenVerifier>> {
    web::Data::new(Arc::new(StubVerifier) as Arc<dyn TokenVerifier>)
}

pub fn bearer(sub: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer token-for:{sub}"))
}
