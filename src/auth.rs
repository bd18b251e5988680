//! Client credentials, redacted secrets, and the cached OAuth access token.

pub mod cache;
pub mod credentials;
pub mod secret;
pub mod token;

pub use cache::*;
pub use credentials::*;
pub use secret::*;
pub use token::*;
