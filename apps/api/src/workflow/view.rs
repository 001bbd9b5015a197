//! Step views: what a client renders for each step.
//!
//! One variant per step, each carrying only the data that step needs. Built fresh
//! from the workflow state on every request; the result view re-paginates the
//! current document each time.

use serde::Serialize;
use tracing::warn;

use crate::layout::{paginate_with_config, LayoutConfig, Page};
use crate::models::analysis::{AnalysisResult, StrategyCategory};
use crate::models::resume::OptimizationResult;
use crate::workflow::controller::Workflow;
use crate::workflow::review::ReviewDraft;
use crate::workflow::step::Step;

/// How many gaps and keywords the result sidebar highlights.
const HIGHLIGHT_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "step",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum StepView {
    Landing,
    Input {
        /// Retained across resets so the form can be prefilled.
        resume_text: String,
    },
    ProcessingAnalysis {
        target_role: String,
    },
    AnalysisReview {
        target_role: String,
        analysis: AnalysisResult,
        /// Suggestion ids bucketed by category, in analysis order.
        suggestion_groups: Vec<SuggestionGroup>,
        review: ReviewDraft,
    },
    ProcessingGeneration {
        target_role: String,
    },
    Result {
        result: OptimizationResult,
        /// Source text for side-by-side comparison.
        original_resume_text: String,
        skill_gap_highlights: Vec<String>,
        keyword_highlights: Vec<String>,
        pages: Vec<Page>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionGroup {
    pub category: StrategyCategory,
    pub suggestion_ids: Vec<String>,
}

fn suggestion_groups(analysis: &AnalysisResult) -> Vec<SuggestionGroup> {
    StrategyCategory::ALL
        .into_iter()
        .map(|category| SuggestionGroup {
            category,
            suggestion_ids: analysis
                .suggestions_in(category)
                .map(|s| s.id.clone())
                .collect(),
        })
        .collect()
}

impl StepView {
    pub fn build(workflow: &Workflow, layout: &LayoutConfig) -> Self {
        let state = workflow.state();
        match state.step {
            Step::Landing => StepView::Landing,
            Step::Input => StepView::Input {
                resume_text: state.resume_text.clone(),
            },
            Step::ProcessingAnalysis => StepView::ProcessingAnalysis {
                target_role: state.target_role.clone(),
            },
            Step::ProcessingGeneration => StepView::ProcessingGeneration {
                target_role: state.target_role.clone(),
            },
            Step::AnalysisReview => match &state.analysis {
                Some(analysis) => StepView::AnalysisReview {
                    target_role: state.target_role.clone(),
                    review: state
                        .review
                        .clone()
                        .unwrap_or_else(|| ReviewDraft::for_analysis(analysis)),
                    suggestion_groups: suggestion_groups(analysis),
                    analysis: analysis.clone(),
                },
                None => {
                    warn!("Review step without an analysis; rendering input");
                    StepView::Input {
                        resume_text: state.resume_text.clone(),
                    }
                }
            },
            Step::Result => match (&state.final_result, &state.analysis) {
                (Some(result), analysis) => StepView::Result {
                    pages: paginate_with_config(&result.optimized_resume, layout),
                    result: result.clone(),
                    original_resume_text: state.resume_text.clone(),
                    skill_gap_highlights: highlights(analysis.as_ref().map(|a| &a.hard_skill_gaps)),
                    keyword_highlights: highlights(analysis.as_ref().map(|a| &a.missing_keywords)),
                },
                (None, _) => {
                    warn!("Result step without a result; rendering input");
                    StepView::Input {
                        resume_text: state.resume_text.clone(),
                    }
                }
            },
        }
    }
}

fn highlights(items: Option<&Vec<String>>) -> Vec<String> {
    items
        .map(|items| items.iter().take(HIGHLIGHT_LIMIT).cloned().collect())
        .unwrap_or_default()
}
