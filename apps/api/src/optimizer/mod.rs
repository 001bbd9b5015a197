//! Resume Optimizer: the three model-backed operations the workflow depends on.
//!
//! Analyze → Generate → Refine. Each is an opaque request/response returning parsed,
//! structured data or failing. The workflow never sees prompts or wire formats; it only
//! sees the `ResumeOptimizer` trait, so tests can script responses.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::models::analysis::AnalysisResult;
use crate::models::resume::{OptimizationResult, ResumeDocument};

pub mod context;
pub mod gemini;
pub mod prompts;
pub mod schema;

#[cfg(test)]
pub mod mock;

pub use gemini::GeminiOptimizer;

#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error("{operation} request failed: {source}")]
    Llm {
        operation: &'static str,
        #[source]
        source: LlmError,
    },
}

impl OptimizerError {
    pub fn llm(operation: &'static str) -> impl FnOnce(LlmError) -> Self {
        move |source| OptimizerError::Llm { operation, source }
    }
}

/// Everything the generation request needs, gathered from the workflow state.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub resume_text: String,
    pub target_role: String,
    pub analysis: AnalysisResult,
    /// Free-text answers keyed by clarification question id.
    pub answers: HashMap<String, String>,
    /// Suggestion ids the user left checked.
    pub selected_suggestion_ids: Vec<String>,
}

#[async_trait]
pub trait ResumeOptimizer: Send + Sync {
    async fn analyze(
        &self,
        resume_text: &str,
        target_role: &str,
    ) -> Result<AnalysisResult, OptimizerError>;

    async fn generate(&self, request: &GenerateRequest)
        -> Result<OptimizationResult, OptimizerError>;

    /// Returns a full replacement document, never a patch.
    async fn refine(
        &self,
        document: &ResumeDocument,
        instruction: &str,
        selected_text: &str,
    ) -> Result<ResumeDocument, OptimizerError>;
}
