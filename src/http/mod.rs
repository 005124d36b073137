//! Request and response types seen by the interception layer.
//!
//! A [`Request`] carries what a browser fetch event exposes (method, URL,
//! headers, mode and destination). A [`Response`] is a status, headers and a
//! cheaply-clonable body, plus the response type the network layer assigned.

pub mod request;
pub mod response;

pub use request::{Destination, Request, RequestMode};
pub use response::{Response, ResponseType};
