//! Wire protocol for the household marketplace client.
//!
//! This crate defines the "language" the client and the REST backend speak:
//!
//! - **Types** ([`Role`], [`Category`], [`ApiMessage`], [`Claims`], etc.):
//!   identity and message bodies shared by every layer above.
//! - **Models** ([`Service`], [`ServiceRequest`], [`Review`], etc.):
//!   the marketplace records the backend returns.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those bodies are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding or parsing of closed enums.
//!
//! # Architecture
//!
//! The protocol layer sits below everything else. It doesn't know about
//! HTTP, sessions, or routes. It only knows how to describe and
//! (de)serialize the data that flows through them.
//!
//! ```text
//! Transport (bytes) → Protocol (typed bodies) → Session / Router / Api
//! ```

mod codec;
mod error;
mod models;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use models::{
    AdminRequests, ChartData, Customer, Envelope, NewServiceRequest,
    Professional, Profile, ReceivedReviews, ReportList, RequestStatus,
    Review, ReviewForm, ReviewStats, SearchQuery, SearchResults, Service,
    ServiceForm, ServiceRequest, ServiceSearch, StatusUpdate,
};
pub use types::{
    ApiMessage, Category, Claims, ClaimsResponse, LoginRequest,
    LoginResponse, RegisterRequest, Role,
};
