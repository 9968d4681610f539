//! API translation between Anthropic and OpenAI formats.
//!
//! The core of the proxy: converts requests, responses and failures between
//! the two API shapes. All translation functions are pure (no I/O).

pub mod anthropic_types;
pub mod content;
pub mod errors;
pub mod openai_types;
pub mod request;
pub mod response;
