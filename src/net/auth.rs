//! Sign-in, sign-out and current-user refresh against `/api/auth/*`.
//!
//! SYSTEM CONTEXT
//! ==============
//! Glue between the request gateway and the session store: a successful login
//! stores the issued token and user record, logout always ends the local
//! session, and refresh replaces the stored user with the server's copy.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::api::RequestGateway;
use super::types::{GatewayError, RequestOptions, UserRecord};
use crate::state::session::{SessionError, SessionStore};

const LOGIN_PATH: &str = "/api/auth/login";
const LOGOUT_PATH: &str = "/api/auth/logout";
const ME_PATH: &str = "/api/auth/me";
const UNAUTHORIZED: u16 = 401;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    two_factor_code: Option<&'a str>,
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
    user: UserRecord,
}

pub struct AuthApi {
    gateway: Rc<RequestGateway>,
    session: Rc<SessionStore>,
}

impl AuthApi {
    pub fn new(gateway: Rc<RequestGateway>, session: Rc<SessionStore>) -> Self {
        Self { gateway, session }
    }

    /// Exchange credentials for a token and store the resulting session.
    ///
    /// # Errors
    ///
    /// Returns the server's message for rejected credentials (including a
    /// missing or invalid two-factor code), or a session error when the
    /// issued credentials cannot be persisted.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        two_factor_code: Option<&str>,
    ) -> Result<UserRecord, AuthError> {
        let options = RequestOptions::post().json(&LoginRequest { email, password, two_factor_code })?;
        let LoginResponse { access_token, user } = self.gateway.request_json(LOGIN_PATH, options).await?;
        self.session.set_user(user.clone(), &access_token)?;
        log::info!("signed in");
        Ok(user)
    }

    /// End the session on the server (best effort) and locally (always).
    ///
    /// # Errors
    ///
    /// Returns an error only when the local session cannot be cleared from
    /// storage; server failures are logged.
    pub async fn logout(&self) -> Result<(), AuthError> {
        if self.gateway.has_token() {
            if let Err(err) = self.gateway.request(LOGOUT_PATH, RequestOptions::post()).await {
                log::warn!("server logout failed, clearing local session anyway: {err}");
            }
        }
        self.session.clear()?;
        log::info!("signed out");
        Ok(())
    }

    /// Re-fetch the current user and store it under the existing token.
    ///
    /// Optional helper for hosts that want a fresh user record. The session
    /// store never calls it and stays authoritative on its own: a stored
    /// session is not validated against the server unless the host asks.
    ///
    /// Returns `None` without a request when no token is stored, and clears
    /// the session when the server rejects the token.
    ///
    /// # Errors
    ///
    /// Returns network and non-401 server failures, and storage failures.
    pub async fn refresh_user(&self) -> Result<Option<UserRecord>, AuthError> {
        let Some(token) = self.session.stored_token().filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        match self.gateway.request_json::<UserRecord>(ME_PATH, RequestOptions::get()).await {
            Ok(user) => {
                self.session.set_user(user.clone(), &token)?;
                Ok(Some(user))
            }
            Err(err) if err.status() == Some(UNAUTHORIZED) => {
                log::info!("stored token rejected, signing out");
                self.session.clear()?;
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}
