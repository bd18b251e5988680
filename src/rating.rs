//! Rate shopping: request construction, provider calls, and response normalization.

pub mod address;
pub mod gateway;
pub mod normalize;
pub mod package;
pub mod request;
pub mod service;
pub mod validation;

pub use address::*;
pub use gateway::*;
pub use normalize::*;
pub use package::*;
pub use request::*;
pub use service::*;
pub use validation::*;
