/// HTML pages and the health endpoint
///
/// The two pages are deliberately plain; view templating is out of scope.
use actix_web::{web, HttpResponse};
use serde::Deserialize;

/// Welcome page with a link into the sign-in flow
pub async fn home() -> HttpResponse {
    HttpResponse::Ok().content_type("text/html; charset=utf-8").body(
        "<!DOCTYPE html>\n<html>\n<head><title>Posts API</title></head>\n<body>\n\
         <h1>Welcome to Posts-API</h1>\n\
         <p><a href=\"/auth\">Sign in with Google</a></p>\n\
         </body>\n</html>\n",
    )
}

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub token: String,
}

/// Post-login page showing the user id and the bearer token to use
/// against the API
pub async fn profile(query: web::Query<ProfileQuery>) -> HttpResponse {
    let body = format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Posts API - Profile</title></head>\n<body>\n\
         <h1>Signed in</h1>\n\
         <p>User id: <code>{}</code></p>\n\
         <p>Bearer token:</p>\n<pre>{}</pre>\n\
         </body>\n</html>\n",
        html_escape(&query.id),
        html_escape(&query.token)
    );
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// Liveness summary
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "posts-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a&b"), "a&amp;b");
    }
}
