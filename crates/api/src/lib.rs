//! HTTP API: configuration, versioned routing, validation, and CORS.

pub mod app;
pub mod config;
pub mod middleware;
