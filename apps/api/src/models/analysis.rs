use serde::{Deserialize, Serialize};

/// The three fixed buckets a strategic suggestion can fall into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyCategory {
    #[serde(rename = "Formatting & Tone")]
    FormattingAndTone,
    #[serde(rename = "Skill Gaps")]
    SkillGaps,
    #[serde(rename = "ATS & Systems")]
    AtsAndSystems,
}

impl StrategyCategory {
    pub const ALL: [StrategyCategory; 3] = [
        StrategyCategory::FormattingAndTone,
        StrategyCategory::SkillGaps,
        StrategyCategory::AtsAndSystems,
    ];

    /// Label as it appears in prompts and on the wire.
    pub fn label(self) -> &'static str {
        match self {
            StrategyCategory::FormattingAndTone => "Formatting & Tone",
            StrategyCategory::SkillGaps => "Skill Gaps",
            StrategyCategory::AtsAndSystems => "ATS & Systems",
        }
    }
}

/// A gap-filling question the analysis asks because the source resume lacks
/// information needed for a strong rewrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarificationQuestion {
    pub id: String,
    pub question: String,
    /// Why the question is being asked.
    pub context: String,
}

/// One proposed resume pivot, toggled on or off by the user during review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicSuggestion {
    pub id: String,
    pub category: StrategyCategory,
    pub label: String,
    pub description: String,
    pub benefit: String,
}

/// Gap analysis returned by the first model request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub match_score: i64,
    pub executive_summary: String,
    pub strengths: Vec<String>,
    pub hard_skill_gaps: Vec<String>,
    pub soft_skill_gaps: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub clarification_questions: Vec<ClarificationQuestion>,
    pub strategic_suggestions: Vec<StrategicSuggestion>,
}

impl AnalysisResult {
    /// Clamps the match score into 0..=100. Returns true if it had to.
    pub fn normalize_score(&mut self) -> bool {
        let clamped = self.match_score.clamp(0, 100);
        let changed = clamped != self.match_score;
        self.match_score = clamped;
        changed
    }

    pub fn suggestion_ids(&self) -> Vec<String> {
        self.strategic_suggestions
            .iter()
            .map(|s| s.id.clone())
            .collect()
    }

    pub fn suggestions_in(&self, category: StrategyCategory) -> impl Iterator<Item = &StrategicSuggestion> {
        self.strategic_suggestions
            .iter()
            .filter(move |s| s.category == category)
    }
}
