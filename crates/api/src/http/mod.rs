//! REST adapter for the course API.

mod backend;
mod client;
mod wire;

pub use backend::HttpBackend;
pub use client::HttpClient;
