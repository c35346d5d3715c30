//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from routing:
//! response builders, MIME detection, `ETag` handling and the CORS policy.

pub mod cache;
pub mod cors;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use cache::CachePolicy;
pub use cors::CorsPolicy;
pub use response::{
    build_404_response, build_413_response, build_500_response, build_json_response,
    build_preflight_response,
};
