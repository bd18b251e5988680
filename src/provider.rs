//! Provider-facing environment selection (data) and fault extraction (behavior).
//!
//! `endpoints` maps an [`Environment`] or an arbitrary base URL onto every UPS endpoint the
//! engine calls, with the rating API version applied once. `fault` turns provider error
//! bodies into [`ProviderFault`] lists and bounded previews so error types never carry whole
//! response payloads.

pub mod endpoints;
pub mod fault;

pub use endpoints::*;
pub use fault::*;
