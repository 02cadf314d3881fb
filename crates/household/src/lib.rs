//! # Household
//!
//! Client SDK for the household-services marketplace.
//!
//! Customers book services, professionals fulfil them, admins run the
//! marketplace. This crate gives all three a typed client: sign in, keep
//! the session across restarts, check navigations against role-gated
//! routes, and call the REST backend with the session's token.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use household::prelude::*;
//!
//! # async fn run() -> Result<(), HouseholdError> {
//! let client = HouseholdClient::builder()
//!     .config(ClientConfig::from_env()?)
//!     .build()?;
//!
//! let signed_in = client.sign_in("pat@example.com", "hunter2").await?;
//! match client.navigate(&signed_in.landing)? {
//!     Navigation::Allow(route) => println!("showing {}", route.path),
//!     Navigation::Redirect { to, .. } => println!("redirected to {to}"),
//! }
//!
//! let services = client.api().customer_services().await?;
//! # let _ = services;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;

pub use client::{
    BLOCKED_MESSAGE, CLAIMS_FAILED_MESSAGE, ClientBuilder, HouseholdClient, INVALID_ROLE_MESSAGE,
    NO_TOKEN_MESSAGE, PENDING_APPROVAL_MESSAGE, SignedIn,
};
pub use config::{ClientConfig, ENV_API_URL, ENV_SESSION_FILE, ENV_TIMEOUT_SECS};
pub use error::HouseholdError;

pub use household_api as api;
pub use household_protocol as protocol;
pub use household_router as router;
pub use household_session as session;
pub use household_transport as transport;

/// Everything an application usually needs, in one import.
pub mod prelude {
    pub use crate::{ClientBuilder, ClientConfig, HouseholdClient, HouseholdError, SignedIn};
    pub use household_api::{ApiError, ApiGateway, ErrorKind};
    pub use household_protocol::{ApiMessage, Category, Role};
    pub use household_router::{NavLink, Navigation, RedirectReason, ResolvedRoute};
    pub use household_session::{
        FileStorage, InvalidationReason, MemoryStorage, Session, SessionEvent, SessionStore,
    };
    pub use household_transport::{HttpTransport, TransportConfig};
    #[cfg(feature = "reqwest")]
    pub use household_transport::ReqwestTransport;
}
