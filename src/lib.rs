// src/lib.rs

pub mod config;
pub mod docs;
pub mod error;
pub mod gemini;
pub mod handlers;
pub mod models;
pub mod prompt;
pub mod routes;
pub mod schema;
pub mod state;
pub mod store;
pub mod utils;
pub mod validation;

// Re-export specific items for convenience if needed
pub use routes::create_router;
