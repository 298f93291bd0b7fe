//! JWT authentication middleware.
//!
//! Validates `Authorization: Bearer` tokens and injects [`JwtClaims`] into
//! request extensions, where handlers read them with `Extension<JwtClaims>`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tower::{Layer, Service};

use crate::auth::claims::JwtClaims;
use crate::auth::keys::AuthPublicKey;

/// Reasons a request is turned away before reaching a handler.
#[derive(Debug, Error)]
pub enum AuthRejection {
    #[error("missing or malformed jwt")]
    MissingToken,

    #[error("invalid or expired jwt")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let status = match self {
            AuthRejection::MissingToken => StatusCode::BAD_REQUEST,
            AuthRejection::InvalidToken(_) => StatusCode::UNAUTHORIZED,
        };
        (status, self.to_string()).into_response()
    }
}

/// Tower layer verifying RS512 tokens against a public key.
#[derive(Clone)]
pub struct JwtLayer {
    key: AuthPublicKey,
}

impl JwtLayer {
    pub fn new(key: AuthPublicKey) -> Self {
        Self { key }
    }
}

impl<S> Layer<S> for JwtLayer {
    type Service = JwtMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        JwtMiddleware {
            inner,
            key: self.key.clone(),
        }
    }
}

/// Authentication middleware service.
#[derive(Clone)]
pub struct JwtMiddleware<S> {
    inner: S,
    key: AuthPublicKey,
}

impl<S> JwtMiddleware<S> {
    fn authenticate<B>(&self, req: &Request<B>) -> Result<JwtClaims, AuthRejection> {
        let token = bearer_token(req).ok_or(AuthRejection::MissingToken)?;
        self.key.verify(token).map_err(AuthRejection::InvalidToken)
    }
}

impl<S, B> Service<Request<B>> for JwtMiddleware<S>
where
    S: Service<Request<B>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
    B: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        match self.authenticate(&req) {
            Ok(claims) => {
                tracing::debug!(name = %claims.name, admin = claims.admin, "Authenticated");
                req.extensions_mut().insert(claims);
                // The clone may not be ready; call the instance poll_ready was driven on.
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                Box::pin(async move { inner.call(req).await })
            }
            Err(rejection) => {
                tracing::debug!(path = %req.uri().path(), error = %rejection, "Rejected request");
                Box::pin(async move { Ok(rejection.into_response()) })
            }
        }
    }
}

fn bearer_token<B>(req: &Request<B>) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&request(Some("Bearer abc.def.ghi"))), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&request(Some("bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&request(Some("Basic dXNlcjpwYXNz"))), None);
        assert_eq!(bearer_token(&request(Some("Bearer "))), None);
        assert_eq!(bearer_token(&request(Some("Bearer"))), None);
        assert_eq!(bearer_token(&request(None)), None);
    }

    #[test]
    fn test_rejection_status_codes() {
        assert_eq!(
            AuthRejection::MissingToken.into_response().status(),
            StatusCode::BAD_REQUEST
        );

        let err = jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidSignature);
        assert_eq!(
            AuthRejection::InvalidToken(err).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
