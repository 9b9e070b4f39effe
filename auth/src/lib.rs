//! # EcoLesson Authentication
//!
//! Session lifecycle for EcoLesson: who is signed in, and the sign-up,
//! sign-in, sign-out and profile-update requests sent to the identity
//! provider.
//!
//! ## Architecture
//!
//! ```text
//! SessionAction → SessionReducer → (SessionState, Effects) → Provider request
//!                                                                │
//! SessionObserver ◀──── provider notification ◀──────────────────┘
//!       │
//!       └──▶ SessionAction::IdentityChanged
//! ```
//!
//! The session identity is written only by provider notifications; request
//! results update in-flight flags, notices and failures.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ecolesson_auth::mocks::InMemoryIdentityProvider;
//! use ecolesson_auth::{SessionEnvironment, SessionObserver, SessionReducer, SessionState};
//! use ecolesson_runtime::Store;
//!
//! let provider = InMemoryIdentityProvider::new();
//! let store = Store::new(
//!     SessionState::default(),
//!     SessionReducer::new(),
//!     SessionEnvironment::new(provider.clone()),
//! );
//!
//! let forward = store.clone();
//! let observer = SessionObserver::start(&provider, move |action| {
//!     let store = forward.clone();
//!     async move { let _ = store.send(action).await; }
//! });
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod actions;
pub mod config;
pub mod environment;
pub mod error;
pub mod identity;
pub mod observer;
pub mod providers;
pub mod reducers;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use actions::SessionAction;
pub use config::{CredentialPolicy, FirebaseConfig};
pub use environment::SessionEnvironment;
pub use error::{AuthError, Operation, ProviderError, ProviderErrorKind, Result};
pub use identity::{Identity, UserId};
pub use observer::SessionObserver;
pub use providers::{FirebaseIdentityProvider, IdentityProvider, Subscription};
pub use reducers::SessionReducer;
pub use state::{InFlight, Notice, Session, SessionFailure, SessionState};
