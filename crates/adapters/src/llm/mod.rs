//! LLM provider adapters

pub mod gemini;
pub mod openai;
pub mod stub;

pub use gemini::GeminiGenerator;
pub use openai::OpenAiGenerator;
pub use stub::StubGenerator;

use serde::{Deserialize, Serialize};

/// Common generation parameters, fixed when an adapter is constructed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Model name/ID
    pub model: String,
    /// Temperature (0.0-1.0)
    pub temperature: f64,
    /// Nucleus sampling threshold
    pub top_p: f64,
    /// Top-k sampling cutoff (Gemini only)
    pub top_k: u32,
    /// Maximum output tokens
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            max_output_tokens: 2048,
            timeout_secs: 45,
        }
    }
}
