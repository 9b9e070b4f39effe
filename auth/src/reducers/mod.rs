//! Session reducers.
//!
//! Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.

pub mod session;

pub use session::SessionReducer;
