//! Bearer-token authentication for HTTP handlers.
//!
//! Clients send `Authorization: Token <key>`; the `Bearer` scheme is
//! accepted too. Resolution goes through the [`UserAccounts`] port held in
//! [`HttpState`], so handlers only ever see an authenticated [`User`].
//!
//! [`UserAccounts`]: crate::domain::ports::UserAccounts

use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{AccessToken, Error, User, UserId};

use super::state::HttpState;

const SCHEMES: [&str; 2] = ["token", "bearer"];

/// Read the raw token from the `Authorization` header.
///
/// Returns `Unauthorized` when the header is missing, not ASCII, uses an
/// unknown scheme or carries no token.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<AccessToken, Error> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("authentication credentials were not provided"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("invalid authorization header"))?;

    let (scheme, token) = value
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(|| Error::unauthorized("invalid token header"))?;
    if !SCHEMES.iter().any(|known| scheme.eq_ignore_ascii_case(known)) {
        return Err(Error::unauthorized("unsupported authorization scheme"));
    }

    AccessToken::new(token.trim()).ok_or_else(|| Error::unauthorized("invalid token header"))
}

/// The active user behind the request's bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(User);

impl AuthenticatedUser {
    pub fn id(&self) -> UserId {
        self.0.id()
    }

    pub fn into_inner(self) -> User {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req.headers());
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let user = state.accounts.resolve_token(&token?).await?;
            Ok(Self(user))
        })
    }
}
