use std::fmt;

use airclaim_crypto::{GooScheme, UnavailableGoo};
use serde::{Deserialize, Serialize};

static UNAVAILABLE_GOO: UnavailableGoo = UnavailableGoo;

/// Capabilities a signer opts into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SigningPolicy {
    /// Allow signatures from blinded elliptic-curve keys.
    pub allow_tweaked_ec: bool,
}

/// Collaborators needed by key operations.
#[derive(Clone, Copy)]
pub struct KeyContext<'a> {
    /// Group-signature backend for RSA and GOO keys.
    pub goo: &'a dyn GooScheme,
    /// Signing policy.
    pub policy: SigningPolicy,
}

impl<'a> KeyContext<'a> {
    /// Context over `goo` with the default policy.
    #[must_use]
    pub const fn new(goo: &'a dyn GooScheme) -> Self {
        Self {
            goo,
            policy: SigningPolicy {
                allow_tweaked_ec: false,
            },
        }
    }

    /// Replace the signing policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: SigningPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Default for KeyContext<'static> {
    fn default() -> Self {
        Self::new(&UNAVAILABLE_GOO)
    }
}

impl fmt::Debug for KeyContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyContext")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
