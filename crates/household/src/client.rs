//! `HouseholdClient` builder and the sign-in flow.
//!
//! This is the entry point for applications. It ties together all the
//! layers: transport → api gateway → session → router.

use std::sync::Arc;

use household_api::{ApiError, ApiGateway, ErrorKind, FALLBACK_MESSAGE};
use household_protocol::{ApiMessage, Category, Claims, Role};
use household_router::{
    GuardConfig, LOGOUT_PATH, NavLink, Navigation, RouteDescriptor, RouteTable, RouterGuard,
    landing_route, marketplace_routes, nav_links, normalize_path,
};
use household_session::{FileStorage, MemoryStorage, SessionConfig, SessionEvent, SessionStore};
use household_transport::HttpTransport;
#[cfg(feature = "reqwest")]
use household_transport::{ReqwestTransport, TransportConfig};
use tokio::sync::broadcast;

use crate::{ClientConfig, HouseholdError};

pub const NO_TOKEN_MESSAGE: &str = "No access token received from server";
pub const BLOCKED_MESSAGE: &str = "Your account has been blocked. Please contact support.";
pub const PENDING_APPROVAL_MESSAGE: &str =
    "Your account is pending approval. Please wait for admin approval.";
pub const INVALID_ROLE_MESSAGE: &str = "Invalid role received from server";
pub const CLAIMS_FAILED_MESSAGE: &str = "Failed to get user claims";

/// A successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    pub role: Role,
    /// Where the user should go next (see [`landing_route`]).
    pub landing: String,
    /// The login reply's own message, if it sent one.
    pub message: Option<ApiMessage>,
}

/// Builder for configuring a [`HouseholdClient`].
///
/// # Example
///
/// ```rust,no_run
/// use household::prelude::*;
///
/// # async fn run() -> Result<(), HouseholdError> {
/// let client = HouseholdClient::builder()
///     .config(ClientConfig::from_env()?)
///     .build()?;
/// let signed_in = client.sign_in("admin@example.com", "secret").await?;
/// client.navigate(&signed_in.landing)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    session_config: SessionConfig,
    routes: Option<Vec<RouteDescriptor>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Storage keys and event buffer size for the session store.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Replaces the marketplace route table.
    pub fn routes(mut self, routes: impl IntoIterator<Item = RouteDescriptor>) -> Self {
        self.routes = Some(routes.into_iter().collect());
        self
    }

    /// Builds a client over `reqwest`.
    ///
    /// # Errors
    /// Invalid base URL, unreadable session file, or a route table whose
    /// login route is missing or guarded.
    #[cfg(feature = "reqwest")]
    pub fn build(self) -> Result<HouseholdClient<ReqwestTransport>, HouseholdError> {
        let transport = ReqwestTransport::new(TransportConfig {
            base_url: self.config.api_url.clone(),
            timeout: self.config.timeout,
        })?;
        self.build_with_transport(transport)
    }

    /// Builds a client over any transport.
    pub fn build_with_transport<T: HttpTransport>(
        self,
        transport: T,
    ) -> Result<HouseholdClient<T>, HouseholdError> {
        let session = Arc::new(match &self.config.session_file {
            Some(path) => SessionStore::open(FileStorage::new(path), self.session_config)?,
            None => SessionStore::open(MemoryStorage::new(), self.session_config)?,
        });

        let table = RouteTable::new(self.routes.unwrap_or_else(marketplace_routes))?;
        let router = RouterGuard::new(
            table,
            GuardConfig {
                login_path: self.config.login_path.clone(),
                ..GuardConfig::default()
            },
        )?;

        tracing::info!(
            api_url = %self.config.api_url,
            persistent = self.config.session_file.is_some(),
            signed_in = session.is_authenticated(),
            "household client ready"
        );
        Ok(HouseholdClient {
            api: ApiGateway::new(transport, Arc::clone(&session)),
            session,
            router,
        })
    }
}

/// The marketplace client: session, guarded navigation, and API access
/// sharing one session store.
#[derive(Debug)]
pub struct HouseholdClient<T: HttpTransport> {
    session: Arc<SessionStore>,
    router: RouterGuard,
    api: ApiGateway<T>,
}

#[cfg(feature = "reqwest")]
impl HouseholdClient<ReqwestTransport> {
    /// Starts a builder. Use [`ClientBuilder::build_with_transport`] for
    /// other transports.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

impl<T: HttpTransport> HouseholdClient<T> {
    /// Signs in with the backend and starts a session.
    ///
    /// 1. `POST /login` with the credentials
    /// 2. `GET /get-claims` with the returned token
    /// 3. refuse blocked accounts and unapproved professionals
    /// 4. store `(role, token)` and return the role's landing route
    ///
    /// Nothing is stored unless every step succeeds.
    ///
    /// # Errors
    /// - [`HouseholdError::Api`] if either request fails
    /// - [`HouseholdError::SignIn`] if the backend's answer doesn't allow
    ///   a session
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<SignedIn, HouseholdError> {
        let reply = self.api.login(username, password).await?;
        let token = reply
            .access_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| refuse(NO_TOKEN_MESSAGE, Category::Danger))?;

        let claims = self.api.claims(&token).await.map_err(claims_failed)?;
        let role = admit(&claims)?;

        self.session.login(role, token)?;
        let landing = landing_route(role, claims.redirect.as_deref());
        tracing::info!(%role, %landing, "signed in");

        let message = reply.message.map(|m| ApiMessage {
            message: Some(m),
            category: reply.category,
        });
        Ok(SignedIn {
            role,
            landing,
            message,
        })
    }

    /// Ends the session.
    pub fn sign_out(&self) -> Result<(), HouseholdError> {
        self.session.logout()?;
        Ok(())
    }

    /// Decides a navigation. Going to `/logout` signs out first, then
    /// lands on the login route.
    pub fn navigate(&self, path: &str) -> Result<Navigation, HouseholdError> {
        if normalize_path(path) == LOGOUT_PATH {
            self.sign_out()?;
            return Ok(self.router.navigate(self.router.login_path(), &self.session.snapshot())?);
        }
        Ok(self.router.navigate_store(path, &self.session)?)
    }

    /// Navigation links for the signed-in role; empty when signed out.
    pub fn nav_links(&self) -> Vec<NavLink> {
        let session = self.session.snapshot();
        match session.role {
            Some(role) if session.is_authenticated() => nav_links(role),
            _ => Vec::new(),
        }
    }

    /// The signed-in role's landing route.
    pub fn home(&self) -> Option<String> {
        let session = self.session.snapshot();
        if !session.is_authenticated() {
            return None;
        }
        session.role.map(|role| landing_route(role, None))
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn router(&self) -> &RouterGuard {
        &self.router
    }

    pub fn api(&self) -> &ApiGateway<T> {
        &self.api
    }

    /// Session lifecycle events (sign-in, sign-out, invalidation).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.session.subscribe()
    }
}

fn refuse(message: &str, category: Category) -> HouseholdError {
    tracing::info!(reason = message, "sign-in refused");
    HouseholdError::SignIn(ApiMessage::new(message, category))
}

/// Claims lookups that fail without a backend message get a more specific
/// one than the generic fallback.
fn claims_failed(mut err: ApiError) -> HouseholdError {
    if err.kind != ErrorKind::Network && err.message == FALLBACK_MESSAGE {
        err.message = CLAIMS_FAILED_MESSAGE.to_string();
    }
    HouseholdError::Api(err)
}

/// Checks the claims allow a session and returns the validated role.
fn admit(claims: &Claims) -> Result<Role, HouseholdError> {
    if claims.blocked {
        return Err(refuse(BLOCKED_MESSAGE, Category::Danger));
    }
    let role: Role = claims.role.parse().map_err(|_| {
        tracing::warn!(role = %claims.role, "claims carried an unknown role");
        refuse(INVALID_ROLE_MESSAGE, Category::Danger)
    })?;
    if role == Role::Professional && !claims.approved {
        return Err(refuse(PENDING_APPROVAL_MESSAGE, Category::Warning));
    }
    Ok(role)
}
