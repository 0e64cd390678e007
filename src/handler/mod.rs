//! Request handler module
//!
//! Responsible for request routing dispatch and the continent lookup itself.

pub mod continents;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
