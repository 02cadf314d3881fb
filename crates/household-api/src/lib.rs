//! Authenticated API access for the household client.
//!
//! [`ApiGateway`] wraps an [`HttpTransport`](household_transport::HttpTransport)
//! and the shared [`SessionStore`](household_session::SessionStore):
//!
//! ```text
//! caller ─→ ApiGateway ─→ HttpTransport ─→ backend
//!              │  ▲
//!   token ◄────┘  └──── 401/403 → SessionStore::invalidate
//! ```
//!
//! Typed endpoint methods (`login`, `admin_services`, `submit_review`, ...)
//! sit on top of the generic `get`/`post`/`put`/`delete`.

mod endpoints;
mod error;
mod gateway;

pub use error::{ApiError, ErrorKind, FALLBACK_MESSAGE};
pub use gateway::{ApiGateway, Auth};
