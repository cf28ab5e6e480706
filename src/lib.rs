/// Posts Service Library
///
/// A small REST API exposing Users, Posts, and Comments, backed by an
/// external managed NoSQL datastore, with Google OAuth2 sign-in and
/// JWT bearer-token authorization on the Posts surface.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route wiring
/// - `models`: data structures for users, posts, comments
/// - `services`: business logic layer
/// - `db`: entity store trait and adapters
/// - `auth`: token verification and the OAuth2 sign-in flow
/// - `middleware`: subject extraction and content negotiation
/// - `error`: error types and handling
/// - `config`: configuration management
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
