//! Documents module - the two generation flows and their HTTP surface.
//!
//! - `pipeline` - `DocumentPipeline`, generic over the template engine
//! - `handlers` - actix-web handlers and route registration
//! - `models` - request and response types
//! - `validation` - field-level request validation

pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod validation;

pub use handlers::{config, json_config, DEFAULT_PAYLOAD_LIMIT};
pub use pipeline::DocumentPipeline;
