//! Request/response middleware applied to every route.

pub mod cors;

pub use cors::cors_middleware;
