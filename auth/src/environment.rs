//! Session environment.

use crate::providers::IdentityProvider;

/// Dependencies of the session reducer.
#[derive(Debug, Clone)]
pub struct SessionEnvironment<P> {
    /// Identity provider.
    pub provider: P,
}

impl<P: IdentityProvider + Clone> SessionEnvironment<P> {
    /// Create an environment around `provider`.
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }
}
