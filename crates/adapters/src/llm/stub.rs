//! Stub generator for testing and offline mode

use async_trait::async_trait;
use reddit_research_domain::{GenerateError, TextGenerator};

/// Stub generator that returns a configurable response
pub struct StubGenerator {
    response: Option<String>,
    error: Option<GenerateError>,
}

impl StubGenerator {
    /// Create a stub that echoes a fixed response
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            error: None,
        }
    }

    /// Create a stub that always fails
    pub fn with_error(error: GenerateError) -> Self {
        Self {
            response: None,
            error: Some(error),
        }
    }
}

impl Default for StubGenerator {
    fn default() -> Self {
        Self::with_response("Stub post title\nStub post body.")
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
        if let Some(ref error) = self.error {
            return Err(match error {
                GenerateError::Api(msg) => GenerateError::Api(msg.clone()),
                GenerateError::RateLimited => GenerateError::RateLimited,
                GenerateError::Timeout => GenerateError::Timeout,
                GenerateError::Empty => GenerateError::Empty,
            });
        }

        Ok(self.response.clone().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_configured_response() {
        let generator = StubGenerator::with_response("Title\nBody");
        let text = generator.generate("anything").await.unwrap();

        assert_eq!(text, "Title\nBody");
    }

    #[tokio::test]
    async fn returns_configured_error() {
        let generator = StubGenerator::with_error(GenerateError::Timeout);
        let result = generator.generate("anything").await;

        assert!(matches!(result, Err(GenerateError::Timeout)));
    }
}
