//! The authenticated request pipeline.

use std::sync::Arc;

use household_protocol::{Codec, JsonCodec};
use household_session::{InvalidationReason, SessionStore};
use household_transport::{HttpRequest, HttpResponse, HttpTransport, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ApiError;

/// How a request authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth<'a> {
    /// Whatever token the session holds when the request is built.
    Session,
    /// This exact token, regardless of the session (the claims lookup
    /// during sign-in).
    Token(&'a str),
    /// No `Authorization` header (login, registration).
    Anonymous,
}

/// Sends requests on behalf of the current session.
///
/// Every call goes through the same pipeline:
///
/// 1. read the token from the session (once, up front)
/// 2. attach `Authorization: Bearer <token>` and, for bodies,
///    `Content-Type: application/json`
/// 3. send through the transport
/// 4. on 401/403, invalidate the session, keyed on the token this request
///    actually carried
/// 5. decode 2xx bodies, or normalize the failure into an [`ApiError`]
///
/// Step 4 is the only place a rejected token logs the user out. Because
/// invalidation is compare-and-clear, a stale 401 for a token that has
/// since been replaced doesn't touch the new session.
#[derive(Debug)]
pub struct ApiGateway<T: HttpTransport> {
    transport: T,
    session: Arc<SessionStore>,
    codec: JsonCodec,
}

impl<T: HttpTransport> ApiGateway<T> {
    pub fn new(transport: T, session: Arc<SessionStore>) -> Self {
        Self {
            transport,
            session,
            codec: JsonCodec,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.call(Method::Get, path, None, Auth::Session).await
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = self.encode(body)?;
        self.call(Method::Post, path, Some(body), Auth::Session).await
    }

    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = self.encode(body)?;
        self.call(Method::Put, path, Some(body), Auth::Session).await
    }

    /// `PUT` with no body (approve/block/close actions).
    pub async fn put_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.call(Method::Put, path, None, Auth::Session).await
    }

    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.call(Method::Delete, path, None, Auth::Session).await
    }

    /// The general form the helpers above wrap.
    ///
    /// # Errors
    /// See [`ApiError`]; 401/403 additionally invalidate the session when
    /// the request carried the session's token.
    pub async fn call<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        auth: Auth<'_>,
    ) -> Result<R, ApiError> {
        let token = match auth {
            Auth::Session => self.session.token(),
            Auth::Token(token) => Some(token.to_string()),
            Auth::Anonymous => None,
        };

        let mut request = HttpRequest::new(method, path);
        if let Some(token) = &token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request
                .header("Content-Type", self.codec.content_type())
                .body(body);
        }

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| {
                tracing::warn!(%method, path, error = %e, "request failed");
                ApiError::network(e)
            })?;

        if !response.is_success() {
            return Err(self.reject(method, path, &response, token.as_deref()));
        }
        self.decode(&response)
    }

    fn reject(
        &self,
        method: Method,
        path: &str,
        response: &HttpResponse,
        token: Option<&str>,
    ) -> ApiError {
        let err = ApiError::from_response(response.status, &response.body, &self.codec);
        tracing::debug!(%method, path, status = response.status, kind = %err.kind, "request rejected");

        if let (Some(reason), Some(token)) = (InvalidationReason::from_status(response.status), token) {
            self.session.invalidate(token, reason);
        }
        err
    }

    pub(crate) fn encode<B: Serialize + ?Sized>(&self, body: &B) -> Result<Vec<u8>, ApiError> {
        self.codec.encode(&body).map_err(ApiError::encode)
    }

    /// Empty 2xx bodies decode as `{}`, so message-style replies still
    /// produce a default value.
    fn decode<R: DeserializeOwned>(&self, response: &HttpResponse) -> Result<R, ApiError> {
        let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &response.body
        };
        self.codec.decode(body).map_err(|e| {
            tracing::warn!(status = response.status, error = %e, "undecodable response body");
            ApiError::invalid_response(response.status, e)
        })
    }
}
