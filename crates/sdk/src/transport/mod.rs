//! Transport layer for the research client.

pub mod http;

pub use http::{Agent, HttpTransport};
