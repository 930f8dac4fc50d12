//! Data Models
//!
//! Response DTOs for the proxy HTTP surface.

pub mod responses;

pub use responses::*;
