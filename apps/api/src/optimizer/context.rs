//! Builds the strategy and evidence context passed to the generation request.

use std::collections::HashMap;

use crate::models::analysis::AnalysisResult;

/// Substituted for a clarification question the user left blank.
pub const NO_ANSWER_PLACEHOLDER: &str = "No details provided.";

/// Selected suggestions, in analysis order, as `[<category>] <label>: <description>`
/// joined by `"; "`. Ids that are not in the analysis are ignored.
pub fn build_strategy_context(analysis: &AnalysisResult, selected_ids: &[String]) -> String {
    analysis
        .strategic_suggestions
        .iter()
        .filter(|s| selected_ids.iter().any(|id| id == &s.id))
        .map(|s| format!("[{}] {}: {}", s.category.label(), s.label, s.description))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Every clarification question with its answer. Missing or blank answers
/// fall back to [`NO_ANSWER_PLACEHOLDER`].
pub fn build_answer_context(analysis: &AnalysisResult, answers: &HashMap<String, String>) -> String {
    analysis
        .clarification_questions
        .iter()
        .map(|q| {
            let answer = answers
                .get(&q.id)
                .map(|a| a.trim())
                .filter(|a| !a.is_empty())
                .unwrap_or(NO_ANSWER_PLACEHOLDER);
            format!(
                "Q: {} \n Context: {} \n User Answer: {}",
                q.question, q.context, answer
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::fixtures::director_analysis;

    #[test]
    fn test_strategy_context_is_category_qualified_and_ordered() {
        let analysis = director_analysis();
        let selected = vec!["s4".to_string(), "s1".to_string()];

        let context = build_strategy_context(&analysis, &selected);

        assert_eq!(
            context,
            "[Formatting & Tone] Lead with leadership: Lead with leadership description; \
             [ATS & Systems] Standard headings: Standard headings description"
        );
    }

    #[test]
    fn test_strategy_context_empty_selection() {
        let analysis = director_analysis();
        assert_eq!(build_strategy_context(&analysis, &[]), "");
    }

    #[test]
    fn test_strategy_context_ignores_unknown_ids() {
        let analysis = director_analysis();
        let context = build_strategy_context(&analysis, &["nope".to_string()]);
        assert!(context.is_empty());
    }

    #[test]
    fn test_answer_context_uses_placeholder_for_missing_and_blank() {
        let analysis = director_analysis();
        let mut answers = HashMap::new();
        answers.insert("q1".to_string(), "Twelve engineers".to_string());
        answers.insert("q2".to_string(), "   ".to_string());

        let context = build_answer_context(&analysis, &answers);
        let blocks: Vec<&str> = context.split("\n\n").collect();

        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].contains("User Answer: Twelve engineers"));
        assert!(blocks[1].ends_with(&format!("User Answer: {NO_ANSWER_PLACEHOLDER}")));
        assert!(blocks[2].ends_with(&format!("User Answer: {NO_ANSWER_PLACEHOLDER}")));
        assert!(blocks[0].starts_with("Q: How many engineers reported to you?"));
    }
}
