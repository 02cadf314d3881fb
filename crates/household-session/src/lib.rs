//! Client session management for the household marketplace.
//!
//! This crate owns "who is signed in":
//!
//! 1. **Session state**: a bearer token plus a validated [`Role`]
//!    ([`Session`])
//! 2. **Persistence**: surviving restarts through a pluggable key/value
//!    [`Storage`] ([`MemoryStorage`], [`FileStorage`])
//! 3. **Invalidation**: a single place that clears the session when the
//!    backend rejects its token, with [`SessionEvent`]s for anyone who needs
//!    to react
//!
//! # How it fits in the stack
//!
//! ```text
//! Router guard / API gateway (above)  ← read snapshots, report auth failures
//!     ↕
//! Session layer (this crate)          ← SessionStore
//!     ↕
//! Protocol layer (below)              ← Role, Codec
//! ```
//!
//! [`Role`]: household_protocol::Role

mod error;
mod session;
mod storage;
mod store;

pub use error::SessionError;
pub use session::{InvalidationReason, Session, SessionConfig, SessionEvent};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::SessionStore;
