//! OAuth login flow and server-side sessions.
//!
//! A successful `/callback` stores the provider's userinfo in the
//! [`SessionStore`] and hands the browser an opaque `session` cookie. Solver
//! handlers take a [`CallerIdentity`] argument, so an unauthenticated
//! request is rejected before any solver code runs.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Query, State};
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::OAuthConfig;
use crate::error::{ApiError, AuthError};

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "session";

const OAUTH_SCOPE: &str = "openid profile email";

/// How long a `/login` state value stays redeemable.
const LOGIN_STATE_TTL_MINUTES: i64 = 10;

/// An authenticated user's session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Userinfo document returned by the provider.
    pub user: serde_json::Value,
    pub expires_at: DateTime<Utc>,
}

/// Identity of the caller, resolved from the session cookie.
///
/// This is the only thing handlers learn about authentication. Solvers never
/// receive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub session_id: Uuid,
    /// The provider's `sub` claim, or `"unknown"` if absent.
    pub subject: String,
}

/// In-memory session and login-state store.
///
/// # Examples
///
/// ```
/// use combinatorics_solver::auth::SessionStore;
///
/// let store = SessionStore::new(chrono::Duration::minutes(5));
/// let id = store.create(serde_json::json!({ "sub": "auth0|42" }));
///
/// let caller = store.authenticate(id).unwrap();
/// assert_eq!(caller.subject, "auth0|42");
///
/// store.remove(id);
/// assert!(store.authenticate(id).is_none());
/// ```
pub struct SessionStore {
    ttl: chrono::Duration,
    sessions: RwLock<HashMap<Uuid, Session>>,
    login_states: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl SessionStore {
    pub fn new(ttl: chrono::Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
            login_states: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a session for `user` and returns its id.
    pub fn create(&self, user: serde_json::Value) -> Uuid {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.write();
        sessions.retain(|_, session| session.expires_at > now);
        sessions.insert(
            id,
            Session {
                user,
                expires_at: now + self.ttl,
            },
        );
        id
    }

    /// Resolves a live session; expired sessions are dropped.
    pub fn authenticate(&self, id: Uuid) -> Option<CallerIdentity> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read();
            let session = sessions.get(&id)?;
            if session.expires_at > now {
                return Some(CallerIdentity {
                    session_id: id,
                    subject: subject_of(&session.user),
                });
            }
        }
        self.sessions.write().remove(&id);
        None
    }

    pub fn remove(&self, id: Uuid) -> Option<Session> {
        self.sessions.write().remove(&id)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Issues a fresh one-shot state value for the authorize redirect.
    pub fn issue_login_state(&self) -> String {
        let now = Utc::now();
        let state = Uuid::new_v4().simple().to_string();
        let mut states = self.login_states.write();
        states.retain(|_, issued| now - *issued < chrono::Duration::minutes(LOGIN_STATE_TTL_MINUTES));
        states.insert(state.clone(), now);
        state
    }

    /// Consumes `state`, returning whether it was issued and still fresh.
    pub fn redeem_login_state(&self, state: &str) -> bool {
        match self.login_states.write().remove(state) {
            Some(issued) => Utc::now() - issued < chrono::Duration::minutes(LOGIN_STATE_TTL_MINUTES),
            None => false,
        }
    }
}

fn subject_of(user: &serde_json::Value) -> String {
    user.get("sub")
        .and_then(|sub| sub.as_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Extracts the session id from the request's `Cookie` headers.
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use combinatorics_solver::auth::session_id_from_headers;
///
/// let id = uuid::Uuid::new_v4();
/// let mut headers = HeaderMap::new();
/// headers.insert(
///     header::COOKIE,
///     HeaderValue::from_str(&format!("theme=dark; session={}", id)).unwrap(),
/// );
/// assert_eq!(session_id_from_headers(&headers), Some(id));
/// ```
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, _)| *name == SESSION_COOKIE)
        .find_map(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

fn session_cookie(id: Uuid, ttl: chrono::Duration) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        id,
        ttl.num_seconds()
    )
}

fn expired_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

impl FromRequestParts<Arc<AppState>> for CallerIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let caller = session_id_from_headers(&parts.headers)
            .and_then(|id| state.sessions.authenticate(id));
        match caller {
            Some(caller) => Ok(caller),
            None => {
                warn!(path = %parts.uri.path(), "Rejected request without a valid session");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

// ============================================================================
// OAuth client
// ============================================================================

/// Token endpoint response. Only the access token is used.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
}

/// Authorization-code client for an Auth0-style provider.
pub struct OAuthClient {
    config: OAuthConfig,
    redirect_uri: String,
    client: reqwest::Client,
}

impl OAuthClient {
    pub fn new(config: OAuthConfig, public_url: &str) -> Self {
        Self {
            config,
            redirect_uri: format!("{}/callback", public_url.trim_end_matches('/')),
            client: reqwest::Client::new(),
        }
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// URL of the provider's login page for the given `state`.
    pub fn authorize_url(&self, state: &str) -> Result<reqwest::Url, AuthError> {
        reqwest::Url::parse_with_params(
            &format!("{}/authorize", self.config.domain),
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", OAUTH_SCOPE),
                ("state", state),
            ],
        )
        .map_err(|e| AuthError::InvalidUrl(e.to_string()))
    }

    /// Exchanges an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AuthError> {
        let body = TokenRequest {
            grant_type: "authorization_code",
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
            code,
            redirect_uri: &self.redirect_uri,
        };
        let response = self
            .client
            .post(format!("{}/oauth/token", self.config.domain))
            .json(&body)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Fetches the userinfo document for an access token.
    pub async fn fetch_userinfo(&self, access_token: &str) -> Result<serde_json::Value, AuthError> {
        let response = self
            .client
            .get(format!("{}/userinfo", self.config.domain))
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AuthError> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Provider { status, message });
        }
        Ok(response.json().await?)
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Query parameters the provider appends to the callback URL.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// GET /login - Redirect to the provider's login page.
pub async fn login(State(state): State<Arc<AppState>>) -> Result<Redirect, ApiError> {
    let oauth = state.oauth.as_ref().ok_or(AuthError::NotConfigured)?;
    let login_state = state.sessions.issue_login_state();
    let url = oauth.authorize_url(&login_state)?;
    Ok(Redirect::to(url.as_str()))
}

/// GET /callback - Finish the login and open a session.
pub async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Response, ApiError> {
    let oauth = state.oauth.as_ref().ok_or(AuthError::NotConfigured)?;

    if let Some(error) = params.error {
        let description = params.error_description.unwrap_or_default();
        warn!(error = %error, description = %description, "Provider denied login");
        return Err(ApiError::BadRequest(format!("Login failed: {} {}", error, description)));
    }

    let login_state = params.state.unwrap_or_default();
    if !state.sessions.redeem_login_state(&login_state) {
        return Err(AuthError::InvalidState.into());
    }
    let code = params
        .code
        .ok_or_else(|| ApiError::BadRequest("Missing authorization code".to_string()))?;

    let tokens = oauth.exchange_code(&code).await?;
    let user = oauth.fetch_userinfo(&tokens.access_token).await?;

    let session_id = state.sessions.create(user.clone());
    info!(subject = %subject_of(&user), "User logged in");

    Ok((
        [(header::SET_COOKIE, session_cookie(session_id, state.config.session_ttl))],
        Json(user),
    )
        .into_response())
}

/// GET /logout - Drop the session and return to the front page.
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(id) = session_id_from_headers(&headers) {
        if let Some(session) = state.sessions.remove(id) {
            info!(subject = %subject_of(&session.user), "User logged out");
        }
    }
    ([(header::SET_COOKIE, expired_session_cookie())], Redirect::to("/"))
}
