//! Scripted optimizer for tests: returns queued outcomes and records every call,
//! optionally taking a while to answer.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::llm_client::LlmError;
use crate::models::analysis::AnalysisResult;
use crate::models::resume::{OptimizationResult, ResumeDocument};
use crate::optimizer::{GenerateRequest, OptimizerError, ResumeOptimizer};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Analyze { resume_text: String, target_role: String },
    Generate(GenerateRequest),
    Refine { instruction: String, selected_text: String },
}

type Outcome<T> = Result<T, String>;

#[derive(Default)]
pub struct ScriptedOptimizer {
    analyses: Mutex<VecDeque<Outcome<AnalysisResult>>>,
    generations: Mutex<VecDeque<Outcome<OptimizationResult>>>,
    refinements: Mutex<VecDeque<Outcome<ResumeDocument>>>,
    calls: Mutex<Vec<Call>>,
    /// Each call sleeps this long after being recorded.
    delay: Option<Duration>,
}

impl ScriptedOptimizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_analysis(&self, outcome: Outcome<AnalysisResult>) -> &Self {
        self.analyses.lock().unwrap().push_back(outcome);
        self
    }

    pub fn push_generation(&self, outcome: Outcome<OptimizationResult>) -> &Self {
        self.generations.lock().unwrap().push_back(outcome);
        self
    }

    pub fn push_refinement(&self, outcome: Outcome<ResumeDocument>) -> &Self {
        self.refinements.lock().unwrap().push_back(outcome);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

fn next<T>(queue: &Mutex<VecDeque<Outcome<T>>>, operation: &'static str) -> Result<T, OptimizerError> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err("no scripted response".to_string()))
        .map_err(|message| OptimizerError::Llm {
            operation,
            source: LlmError::Api {
                status: 500,
                message,
            },
        })
}

#[async_trait]
impl ResumeOptimizer for ScriptedOptimizer {
    async fn analyze(
        &self,
        resume_text: &str,
        target_role: &str,
    ) -> Result<AnalysisResult, OptimizerError> {
        self.record(Call::Analyze {
            resume_text: resume_text.to_string(),
            target_role: target_role.to_string(),
        })
        .await;
        next(&self.analyses, "Analysis")
    }

    async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> Result<OptimizationResult, OptimizerError> {
        self.record(Call::Generate(request.clone())).await;
        next(&self.generations, "Generation")
    }

    async fn refine(
        &self,
        _document: &ResumeDocument,
        instruction: &str,
        selected_text: &str,
    ) -> Result<ResumeDocument, OptimizerError> {
        self.record(Call::Refine {
            instruction: instruction.to_string(),
            selected_text: selected_text.to_string(),
        })
        .await;
        next(&self.refinements, "Refinement")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_failure_is_an_llm_error() {
        let optimizer = ScriptedOptimizer::new();
        optimizer.push_analysis(Err("upstream 500".to_string()));

        let err = optimizer.analyze("resume", "CTO").await.unwrap_err();

        assert!(matches!(
            err,
            OptimizerError::Llm {
                operation: "Analysis",
                source: LlmError::Api { status: 500, .. },
            }
        ));
        assert_eq!(optimizer.calls().len(), 1);
    }
}
