//! # EcoLesson
//!
//! Application core of EcoLesson: courses, job openings, partner companies
//! and certificates behind e-mail/password authentication.
//!
//! ## Architecture
//!
//! ```text
//!            ┌──────────────── EcoLesson ────────────────┐
//!  intent ──▶│ Store<AppState, AppAction, AppReducer>    │──▶ view::render ──▶ Frame
//!            │   ├─ SessionReducer   (ecolesson-auth)    │
//!            │   ├─ navigation       (Navigator)         │
//!            │   ├─ CoursesReducer   (REST listing)      │
//!            │   └─ CatalogReducer   (static lists)      │
//!            └──────────▲────────────────────────────────┘
//!                       │ IdentityChanged
//!                SessionObserver ◀── identity provider
//! ```
//!
//! Which screen stack is mounted is derived from the session
//! ([`navigation::select`]); nothing navigates on a request result.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ecolesson::{AppAction, AppConfig, EcoLesson, HttpCourseApi};
//! use ecolesson_auth::mocks::InMemoryIdentityProvider;
//!
//! let config = AppConfig::from_env()?;
//! let app = EcoLesson::start(&config, InMemoryIdentityProvider::new(), HttpCourseApi::new(&config.api_base_url));
//! let frame = app.render().await?;
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod app;
pub mod build_info;
pub mod catalog;
pub mod config;
pub mod courses;
pub mod navigation;
pub mod reducer;
pub mod view;

pub use app::{AppStore, EcoLesson};
pub use build_info::BuildInfo;
pub use config::{AppConfig, ConfigError};
pub use courses::{CourseApi, CourseError, HttpCourseApi};
pub use navigation::{NavigationAction, Navigator, Screen, Selection, StackKind};
pub use reducer::{AppAction, AppEnvironment, AppReducer, AppState};
pub use view::{render, Frame, ScreenView};
