//! Delegated reasoning capability.
//!
//! The engine hands a plain-text brief to a `ReasoningProvider` and parses the
//! free text that comes back. Network-backed providers live outside this
//! crate; `CannedResponse` replays a fixed answer.

use crate::Result;

/// An external capability that answers a rescheduling brief in free text
pub trait ReasoningProvider: Send + Sync {
    /// Submit the brief and return the raw response text
    fn generate(&self, brief: &str) -> Result<String>;

    /// Short name used in logs
    fn name(&self) -> &str {
        "reasoning provider"
    }
}

/// Provider that returns the same recorded answer for every brief
#[derive(Clone, Debug)]
pub struct CannedResponse {
    text: String,
}

impl CannedResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Load a recorded answer from a file
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded canned assistant response from {:?}", path);
        Ok(Self::new(text))
    }
}

impl ReasoningProvider for CannedResponse {
    fn generate(&self, brief: &str) -> Result<String> {
        tracing::debug!("Canned provider received brief of {} bytes", brief.len());
        Ok(self.text.clone())
    }

    fn name(&self) -> &str {
        "canned response"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_response_ignores_brief() {
        let provider = CannedResponse::new("RECOMMENDED_TIME: 09:00");
        assert_eq!(provider.generate("anything").unwrap(), "RECOMMENDED_TIME: 09:00");
        assert_eq!(provider.generate("").unwrap(), "RECOMMENDED_TIME: 09:00");
    }

    #[test]
    fn test_canned_response_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("answer.txt");
        std::fs::write(&path, "REASONING: fine").unwrap();

        let provider = CannedResponse::from_file(&path).unwrap();
        assert_eq!(provider.generate("brief").unwrap(), "REASONING: fine");
    }

    #[test]
    fn test_canned_response_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = CannedResponse::from_file(&temp_dir.path().join("nope.txt"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
