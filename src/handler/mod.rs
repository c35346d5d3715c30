//! Request handler module
//!
//! Request routing dispatch, the health endpoint and static file serving.

pub mod actuator;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::{handle_request, RequestContext};
