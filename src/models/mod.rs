//! Data models for the shift swap service.
//!
//! Field names serialize in camelCase to match the frontend contract.

mod report;
mod request;
mod shift;
mod swap_match;

pub use report::*;
pub use request::*;
pub use shift::*;
pub use swap_match::*;
