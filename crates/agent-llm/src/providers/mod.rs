//! LLM Providers
//!
//! One provider per supported vendor.

pub(crate) mod common;
pub mod gemini;
pub mod grok;
pub mod openai;

pub use gemini::GeminiProvider;
pub use grok::GrokProvider;
pub use openai::OpenAIProvider;
