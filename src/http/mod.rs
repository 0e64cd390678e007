//! HTTP protocol layer module
//!
//! Provides HTTP response builders and shared header handling, decoupled from
//! the continent lookup logic.

pub mod response;

// Re-export commonly used types
pub use response::{
    apply_common_headers, build_404_response, build_405_response, build_413_response,
    build_health_response, build_json_response, build_options_response, build_text_response,
};
