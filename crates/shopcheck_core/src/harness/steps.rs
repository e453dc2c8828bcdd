use super::assertions::Assertion;
use crate::types::CartAction;

/// Password sent by [`Credentials::WrongPassword`].
pub const WRONG_PASSWORD: &str = "wrongpassword";

/// Which credentials a login step submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// The current actor's profile.
    Registered,
    /// The current actor's email with a wrong password.
    WrongPassword,
    /// Arbitrary credentials.
    Explicit { email: String, password: String },
}

/// All possible actions in a scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioStep {
    /// Switch to (and create on first use) the named actor.
    UseActor {
        name: String,
    },

    // Actor operations
    RegisterActor,
    Authenticate {
        credentials: Credentials,
    },
    Deauthenticate,
    Fetch {
        path: String,
    },
    FetchProtected {
        path: String,
    },
    MutateCart {
        action: CartAction,
        product_id: String,
    },

    // Assertions (can be interspersed)
    Assert {
        assertion: Assertion,
    },
}
