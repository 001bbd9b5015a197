use std::fmt;

use serde::{Deserialize, Serialize};

/// The six wizard steps.
///
/// ```text
/// landing → input → processingAnalysis → analysisReview → processingGeneration → result
///             ↑            │ (fail)             ↑                 │ (fail)          │
///             └────────────┘                    └─────────────────┘                 │
///             ↑──────────────────────────── reset (from any step) ──────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    Landing,
    Input,
    ProcessingAnalysis,
    AnalysisReview,
    ProcessingGeneration,
    Result,
}

impl Step {
    /// True while a step-level model request is outstanding.
    pub fn is_processing(self) -> bool {
        matches!(self, Step::ProcessingAnalysis | Step::ProcessingGeneration)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Landing => "landing",
            Step::Input => "input",
            Step::ProcessingAnalysis => "processingAnalysis",
            Step::AnalysisReview => "analysisReview",
            Step::ProcessingGeneration => "processingGeneration",
            Step::Result => "result",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_two_processing_steps() {
        let processing: Vec<Step> = [
            Step::Landing,
            Step::Input,
            Step::ProcessingAnalysis,
            Step::AnalysisReview,
            Step::ProcessingGeneration,
            Step::Result,
        ]
        .into_iter()
        .filter(|s| s.is_processing())
        .collect();
        assert_eq!(
            processing,
            vec![Step::ProcessingAnalysis, Step::ProcessingGeneration]
        );
    }

    #[test]
    fn test_display_matches_serde_name() {
        let step = Step::ProcessingGeneration;
        assert_eq!(
            serde_json::to_string(&step).unwrap(),
            format!("\"{step}\"")
        );
    }
}
