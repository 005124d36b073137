//! Security module
//!
//! Origin trust filtering for intercepted requests. Traffic from origins that
//! are neither same-origin nor trusted is left entirely to the network.

pub mod origin_filter;

pub use origin_filter::{classify_origin, OriginClass, OriginFilter, TrustSet};
