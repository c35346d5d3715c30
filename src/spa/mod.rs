//! SPA hosting module
//!
//! Static roots, the resource resolver and the error/fallback controller.

pub mod fallback;
pub mod resolver;
pub mod roots;

pub use fallback::{handle_error, FallbackDecision};
pub use resolver::{Resolution, ResourceResolver};
pub use roots::{is_reserved_path, RootKind, StaticRoot, StaticRoots};
