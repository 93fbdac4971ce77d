//! API Lambda handler and request processing

pub mod handler;
pub mod helpers;
pub mod interactive_handler;
pub mod parsing;
pub mod signature;
pub mod slash_handler;

// Re-export the main handler for convenience
pub use handler::{function_handler, handle_request};
