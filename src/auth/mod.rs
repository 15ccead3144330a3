//! Authentication and authorization module

pub mod authenticator;
pub mod guard;
pub mod token;
pub mod user;

// Re-export main components
pub use authenticator::{Authenticator, LoginOutcome};
pub use guard::{extract_token, AccessGuard};
pub use token::TokenCodec;
pub use user::{IdentityContext, Role, User};
