/// Google OAuth2 authorization-code flow
///
/// Builds the redirect to Google's consent screen and exchanges the
/// returned code for an ID token. State nonces are generated per flow and
/// consumed exactly once.
use crate::config::GoogleConfig;
use crate::error::{AppError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Mutex;
use uuid::Uuid;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SCOPE: &str = "openid profile email";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
}

pub struct GoogleOAuthClient {
    http: Client,
    config: GoogleConfig,
    pending_states: Mutex<HashSet<String>>,
}

impl GoogleOAuthClient {
    pub fn new(config: GoogleConfig) -> Self {
        Self {
            http: Client::new(),
            config,
            pending_states: Mutex::new(HashSet::new()),
        }
    }

    /// Start a flow: generate a state nonce and build the authorize URL.
    pub fn authorize_url(&self) -> String {
        let state = Uuid::new_v4().to_string();
        self.pending_states.lock().unwrap().insert(state.clone());

        let mut url = reqwest::Url::parse(AUTHORIZE_URL).expect("valid google auth url");
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", SCOPE)
            .append_pair("state", &state);
        url.to_string()
    }

    /// Consume a state nonce; each nonce is valid for one callback.
    pub fn take_state(&self, state: &str) -> bool {
        self.pending_states.lock().unwrap().remove(state)
    }

    /// Exchange an authorization code for the ID token.
    pub async fn exchange_code(&self, code: &str) -> Result<String> {
        let resp = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("token request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::Upstream(format!(
                "token request failed with status {}",
                resp.status()
            )));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("token response malformed: {e}")))?;

        Ok(token.id_token)
    }
}
