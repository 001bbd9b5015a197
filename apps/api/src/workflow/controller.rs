//! Workflow controller: the only mutator of a session's wizard state.
//!
//! # Two-phase operations
//! Every model-backed operation is split in two:
//! - `begin_*` validates, moves to the processing state, and returns a ticket carrying
//!   a request token plus the inputs the model call needs.
//! - `complete_*` applies the outcome if the token is still the pending one, and
//!   otherwise discards it (the user reset while the request was in flight).
//!
//! Callers that own the workflow outright can use the `submit_*` / `refine` wrappers,
//! which run begin → model call → complete in one await. The HTTP layer uses the split
//! form so no lock is held across a model call.

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::analysis::AnalysisResult;
use crate::models::resume::{OptimizationResult, ResumeDocument};
use crate::optimizer::{GenerateRequest, OptimizerError, ResumeOptimizer};
use crate::workflow::review::ReviewDraft;
use crate::workflow::step::Step;

pub const INTAKE_REQUIRED_MESSAGE: &str = "Both target role and resume content are required.";
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Failed to analyze resume. Please check your input and try again.";
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate final resume.";
pub const REFINE_FAILED_MESSAGE: &str = "Could not apply change. Please try again.";
pub const REFINE_REQUIRED_MESSAGE: &str = "Select some text and describe the change to apply.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Missing required user input. Reported inline; the step does not change.
    #[error("{0}")]
    Validation(String),

    #[error("Operation not available in step {actual} (expected {expected})")]
    InvalidStep { expected: Step, actual: Step },

    #[error("A refinement is already in progress")]
    Busy,
}

/// Identifies one in-flight model request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, PartialEq)]
enum Pending {
    Analysis,
    Generation,
    Refine { instruction: String },
}

/// What happened when a model outcome was handed back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The request failed; the controller rolled back and set this user-visible message.
    Failed { message: String },
    /// The token was no longer pending; the outcome was dropped.
    Discarded,
}

#[derive(Debug, Clone)]
pub struct AnalysisTicket {
    pub token: RequestToken,
    pub resume_text: String,
    pub target_role: String,
}

#[derive(Debug, Clone)]
pub struct GenerationTicket {
    pub token: RequestToken,
    pub request: GenerateRequest,
}

#[derive(Debug, Clone)]
pub struct RefineTicket {
    pub token: RequestToken,
    pub document: ResumeDocument,
    pub instruction: String,
    pub selected_text: String,
}

/// Cross-step data for one wizard session.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowState {
    pub step: Step,
    pub target_role: String,
    pub resume_text: String,
    pub analysis: Option<AnalysisResult>,
    pub final_result: Option<OptimizationResult>,
    pub error: Option<String>,
    pub review: Option<ReviewDraft>,
    pub refining: bool,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            step: Step::Landing,
            target_role: String::new(),
            resume_text: String::new(),
            analysis: None,
            final_result: None,
            error: None,
            review: None,
            refining: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct Workflow {
    state: WorkflowState,
    pending: Option<(RequestToken, Pending)>,
    next_token: u64,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step
    }

    /// Derived busy indicator: a processing step or an outstanding refinement.
    pub fn is_busy(&self) -> bool {
        self.state.step.is_processing() || self.state.refining
    }

    fn expect_step(&self, expected: Step) -> Result<(), WorkflowError> {
        if self.state.step == expected {
            Ok(())
        } else {
            Err(WorkflowError::InvalidStep {
                expected,
                actual: self.state.step,
            })
        }
    }

    fn issue(&mut self, pending: Pending) -> RequestToken {
        self.next_token += 1;
        let token = RequestToken(self.next_token);
        self.pending = Some((token, pending));
        token
    }

    /// Takes the pending request if `token` still matches it.
    fn settle(&mut self, token: RequestToken) -> Option<Pending> {
        match self.pending.take() {
            Some((current, pending)) if current == token => Some(pending),
            other => {
                self.pending = other;
                None
            }
        }
    }

    // ── landing ────────────────────────────────────────────────────────────

    /// landing → input.
    pub fn start(&mut self) -> Result<(), WorkflowError> {
        self.expect_step(Step::Landing)?;
        self.state.step = Step::Input;
        self.state.error = None;
        info!("Workflow started");
        Ok(())
    }

    // ── input → processingAnalysis → analysisReview ──────────────────────

    /// input → processingAnalysis. Both fields must be non-empty after trimming.
    pub fn begin_intake(
        &mut self,
        target_role: &str,
        resume_text: &str,
    ) -> Result<AnalysisTicket, WorkflowError> {
        self.expect_step(Step::Input)?;
        if target_role.trim().is_empty() || resume_text.trim().is_empty() {
            return Err(WorkflowError::Validation(INTAKE_REQUIRED_MESSAGE.to_string()));
        }

        self.state.target_role = target_role.to_string();
        self.state.resume_text = resume_text.to_string();
        self.state.error = None;
        self.state.step = Step::ProcessingAnalysis;
        let token = self.issue(Pending::Analysis);
        info!("Analysis requested for role {:?}", target_role);

        Ok(AnalysisTicket {
            token,
            resume_text: self.state.resume_text.clone(),
            target_role: self.state.target_role.clone(),
        })
    }

    /// processingAnalysis → analysisReview on success, → input on failure.
    pub fn complete_analysis(
        &mut self,
        token: RequestToken,
        outcome: Result<AnalysisResult, OptimizerError>,
    ) -> Completion {
        if self.settle(token).is_none() {
            debug!("Discarding stale analysis response");
            return Completion::Discarded;
        }

        match outcome {
            Ok(analysis) => {
                info!(
                    "Analysis received: score={}, {} suggestions",
                    analysis.match_score,
                    analysis.strategic_suggestions.len()
                );
                self.state.review = Some(ReviewDraft::for_analysis(&analysis));
                self.state.analysis = Some(analysis);
                self.state.step = Step::AnalysisReview;
                Completion::Applied
            }
            Err(e) => {
                warn!("Analysis failed: {e}");
                self.state.analysis = None;
                self.state.review = None;
                self.fail(Step::Input, ANALYSIS_FAILED_MESSAGE)
            }
        }
    }

    // ── analysisReview → processingGeneration → result ───────────────────

    /// analysisReview → processingGeneration. Without a stored analysis this is a
    /// no-op and returns `Ok(None)`. Omitted answers or selections fall back to the
    /// saved review draft.
    pub fn begin_strategy(
        &mut self,
        answers: Option<&HashMap<String, String>>,
        selected_suggestion_ids: Option<&[String]>,
    ) -> Result<Option<GenerationTicket>, WorkflowError> {
        let Some(analysis) = self.state.analysis.clone() else {
            debug!("Strategy submitted without an analysis; ignoring");
            return Ok(None);
        };
        self.expect_step(Step::AnalysisReview)?;

        let review = self
            .state
            .review
            .get_or_insert_with(|| ReviewDraft::for_analysis(&analysis));
        review.apply(answers, selected_suggestion_ids);

        let answered = review.answered_count();
        let request = GenerateRequest {
            resume_text: self.state.resume_text.clone(),
            target_role: self.state.target_role.clone(),
            answers: review.answers(),
            selected_suggestion_ids: review.selected_ids(),
            analysis,
        };

        self.state.error = None;
        self.state.step = Step::ProcessingGeneration;
        let token = self.issue(Pending::Generation);
        info!(
            "Generation requested: {} suggestions, {} of {} questions answered",
            request.selected_suggestion_ids.len(),
            answered,
            request.analysis.clarification_questions.len()
        );

        Ok(Some(GenerationTicket { token, request }))
    }

    /// processingGeneration → result on success, → analysisReview on failure.
    /// The review draft is left alone either way.
    pub fn complete_generation(
        &mut self,
        token: RequestToken,
        outcome: Result<OptimizationResult, OptimizerError>,
    ) -> Completion {
        if self.settle(token).is_none() {
            debug!("Discarding stale generation response");
            return Completion::Discarded;
        }

        match outcome {
            Ok(result) => {
                info!(
                    "Tailored resume received: {} experience entries",
                    result.optimized_resume.experience.len()
                );
                self.state.final_result = Some(result);
                self.state.step = Step::Result;
                Completion::Applied
            }
            Err(e) => {
                warn!("Generation failed: {e}");
                self.fail(Step::AnalysisReview, GENERATION_FAILED_MESSAGE)
            }
        }
    }

    /// Edits the review draft in place while the user works through the review
    /// step: flips each id in `toggles` and records `answers`. Unknown ids are ignored.
    pub fn edit_review(
        &mut self,
        toggles: &[String],
        answers: &HashMap<String, String>,
    ) -> Result<(), WorkflowError> {
        self.expect_step(Step::AnalysisReview)?;
        let Some(analysis) = self.state.analysis.as_ref() else {
            return Err(WorkflowError::InvalidStep {
                expected: Step::AnalysisReview,
                actual: self.state.step,
            });
        };
        let review = self
            .state
            .review
            .get_or_insert_with(|| ReviewDraft::for_analysis(analysis));

        for id in toggles {
            if review.toggle(id).is_none() {
                debug!("Ignoring toggle for unknown suggestion {id:?}");
            }
        }
        for (id, answer) in answers {
            review.set_answer(id, answer);
        }
        Ok(())
    }

    // ── result: refinement ───────────────────────────────────────────────

    /// Starts a refinement of the current document. Does not change the step.
    pub fn begin_refine(
        &mut self,
        instruction: &str,
        selected_text: &str,
    ) -> Result<RefineTicket, WorkflowError> {
        self.expect_step(Step::Result)?;
        let Some(result) = self.state.final_result.as_ref() else {
            return Err(WorkflowError::InvalidStep {
                expected: Step::Result,
                actual: self.state.step,
            });
        };
        if self.state.refining {
            return Err(WorkflowError::Busy);
        }
        if instruction.trim().is_empty() || selected_text.trim().is_empty() {
            return Err(WorkflowError::Validation(REFINE_REQUIRED_MESSAGE.to_string()));
        }

        let document = result.optimized_resume.clone();
        self.state.refining = true;
        let token = self.issue(Pending::Refine {
            instruction: instruction.to_string(),
        });
        info!("Refinement requested: {:?}", instruction);

        Ok(RefineTicket {
            token,
            document,
            instruction: instruction.to_string(),
            selected_text: selected_text.to_string(),
        })
    }

    /// Replaces the document on success; keeps it on failure. Clears the busy flag
    /// either way.
    pub fn complete_refine(
        &mut self,
        token: RequestToken,
        outcome: Result<ResumeDocument, OptimizerError>,
    ) -> Completion {
        let Some(Pending::Refine { instruction }) = self.settle(token) else {
            debug!("Discarding stale refinement response");
            return Completion::Discarded;
        };
        self.state.refining = false;

        match (outcome, self.state.final_result.as_mut()) {
            (Ok(document), Some(result)) => {
                result.optimized_resume = document;
                result.change_overview = format!("Manual Update: {instruction}");
                self.state.error = None;
                info!("Refinement applied");
                Completion::Applied
            }
            (Ok(_), None) => Completion::Discarded,
            (Err(e), _) => {
                warn!("Refinement failed: {e}");
                let message = REFINE_FAILED_MESSAGE.to_string();
                self.state.error = Some(message.clone());
                Completion::Failed { message }
            }
        }
    }

    // ── reset / banner ───────────────────────────────────────────────────

    /// Any step → input. Keeps the resume text so the user can re-run quickly;
    /// clears everything else and orphans any in-flight request.
    pub fn reset(&mut self) {
        self.state = WorkflowState {
            step: Step::Input,
            resume_text: std::mem::take(&mut self.state.resume_text),
            ..WorkflowState::default()
        };
        if self.pending.take().is_some() {
            debug!("Reset orphaned an in-flight request");
        }
        info!("Workflow reset");
    }

    pub fn dismiss_error(&mut self) {
        self.state.error = None;
    }

    fn fail(&mut self, rollback_to: Step, message: &str) -> Completion {
        self.state.step = rollback_to;
        self.state.error = Some(message.to_string());
        Completion::Failed {
            message: message.to_string(),
        }
    }
}

// Single-owner wrappers: begin → model call → complete in one await.
// The HTTP handlers use the split form instead.
#[allow(dead_code)]
impl Workflow {
    pub async fn submit_intake(
        &mut self,
        optimizer: &dyn ResumeOptimizer,
        target_role: &str,
        resume_text: &str,
    ) -> Result<Completion, WorkflowError> {
        let ticket = self.begin_intake(target_role, resume_text)?;
        let outcome = optimizer
            .analyze(&ticket.resume_text, &ticket.target_role)
            .await;
        Ok(self.complete_analysis(ticket.token, outcome))
    }

    /// `Ok(None)` when there is no analysis to build on.
    pub async fn submit_strategy(
        &mut self,
        optimizer: &dyn ResumeOptimizer,
        answers: &HashMap<String, String>,
        selected_suggestion_ids: &[String],
    ) -> Result<Option<Completion>, WorkflowError> {
        let Some(ticket) = self.begin_strategy(Some(answers), Some(selected_suggestion_ids))? else {
            return Ok(None);
        };
        let outcome = optimizer.generate(&ticket.request).await;
        Ok(Some(self.complete_generation(ticket.token, outcome)))
    }

    pub async fn refine(
        &mut self,
        optimizer: &dyn ResumeOptimizer,
        instruction: &str,
        selected_text: &str,
    ) -> Result<Completion, WorkflowError> {
        let ticket = self.begin_refine(instruction, selected_text)?;
        let outcome = optimizer
            .refine(&ticket.document, &ticket.instruction, &ticket.selected_text)
            .await;
        Ok(self.complete_refine(ticket.token, outcome))
    }
}
