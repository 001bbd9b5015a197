//! Production optimizer backed by the Gemini client.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::llm_client::prompts::{fill_template, system_prompt, TRUTHFULNESS_INSTRUCTION};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::analysis::AnalysisResult;
use crate::models::resume::{OptimizationResult, ResumeDocument};
use crate::optimizer::context::{build_answer_context, build_strategy_context};
use crate::optimizer::prompts::{
    ANALYSIS_PERSONA, ANALYSIS_PROMPT_TEMPLATE, GENERATION_PERSONA, GENERATION_PROMPT_TEMPLATE,
    REFINE_PERSONA, REFINE_PROMPT_TEMPLATE,
};
use crate::optimizer::schema::{analysis_schema, optimization_schema, resume_schema};
use crate::optimizer::{GenerateRequest, OptimizerError, ResumeOptimizer};

#[derive(Clone)]
pub struct GeminiOptimizer {
    llm: LlmClient,
}

impl GeminiOptimizer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeOptimizer for GeminiOptimizer {
    async fn analyze(
        &self,
        resume_text: &str,
        target_role: &str,
    ) -> Result<AnalysisResult, OptimizerError> {
        info!("Requesting gap analysis for role {:?}", target_role);
        let prompt = build_analysis_prompt(resume_text, target_role);
        let mut analysis: AnalysisResult = self
            .llm
            .call_json(&prompt, &system_prompt(ANALYSIS_PERSONA), &analysis_schema())
            .await
            .map_err(OptimizerError::llm("Analysis"))?;

        if analysis.normalize_score() {
            warn!("Analysis match score out of range, clamped to {}", analysis.match_score);
        }
        ensure_stable_ids(&mut analysis);

        info!(
            "Analysis complete: score={}, {} questions, {} suggestions",
            analysis.match_score,
            analysis.clarification_questions.len(),
            analysis.strategic_suggestions.len()
        );
        Ok(analysis)
    }

    async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> Result<OptimizationResult, OptimizerError> {
        info!(
            "Requesting tailored resume: {} suggestions selected, {} answers",
            request.selected_suggestion_ids.len(),
            request.answers.len()
        );
        let prompt = build_generation_prompt(request);
        self.llm
            .call_json(
                &prompt,
                &system_prompt(GENERATION_PERSONA),
                &optimization_schema(),
            )
            .await
            .map_err(OptimizerError::llm("Generation"))
    }

    async fn refine(
        &self,
        document: &ResumeDocument,
        instruction: &str,
        selected_text: &str,
    ) -> Result<ResumeDocument, OptimizerError> {
        info!("Requesting refinement: {:?}", instruction);
        let prompt = build_refine_prompt(document, instruction, selected_text)
            .map_err(OptimizerError::llm("Refinement"))?;
        self.llm
            .call_json(&prompt, &system_prompt(REFINE_PERSONA), &resume_schema())
            .await
            .map_err(OptimizerError::llm("Refinement"))
    }
}

pub fn build_analysis_prompt(resume_text: &str, target_role: &str) -> String {
    fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[("target_role", target_role), ("resume_text", resume_text)],
    )
}

pub fn build_generation_prompt(request: &GenerateRequest) -> String {
    let strategy_context =
        build_strategy_context(&request.analysis, &request.selected_suggestion_ids);
    let answer_context = build_answer_context(&request.analysis, &request.answers);

    fill_template(
        GENERATION_PROMPT_TEMPLATE,
        &[
            ("target_role", &request.target_role),
            ("resume_text", &request.resume_text),
            ("strategy_context", &strategy_context),
            ("answer_context", &answer_context),
            ("truthfulness_instruction", TRUTHFULNESS_INSTRUCTION),
        ],
    )
}

pub fn build_refine_prompt(
    document: &ResumeDocument,
    instruction: &str,
    selected_text: &str,
) -> Result<String, LlmError> {
    let resume_json = serde_json::to_string(document)?;
    Ok(fill_template(
        REFINE_PROMPT_TEMPLATE,
        &[
            ("resume_json", &resume_json),
            ("selected_text", selected_text),
            ("instruction", instruction),
        ],
    ))
}

/// Review answers and selections are keyed by id, so every question and
/// suggestion needs a unique, non-blank one. Blank or repeated ids are
/// replaced with positional ids (`q1`, `s2`, ...).
fn ensure_stable_ids(analysis: &mut AnalysisResult) {
    let mut seen = HashSet::new();
    for (i, q) in analysis.clarification_questions.iter_mut().enumerate() {
        if q.id.trim().is_empty() || !seen.insert(q.id.clone()) {
            q.id = format!("q{}", i + 1);
            seen.insert(q.id.clone());
        }
    }

    let mut seen = HashSet::new();
    for (i, s) in analysis.strategic_suggestions.iter_mut().enumerate() {
        if s.id.trim().is_empty() || !seen.insert(s.id.clone()) {
            s.id = format!("s{}", i + 1);
            seen.insert(s.id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::models::analysis::fixtures::director_analysis;
    use crate::models::resume::ResumeHeader;

    #[test]
    fn test_analysis_prompt_fills_placeholders() {
        let prompt = build_analysis_prompt("Built things.", "Staff Engineer");
        assert!(prompt.contains("\"Staff Engineer\""));
        assert!(prompt.contains("Built things."));
        assert!(!prompt.contains("{target_role}"));
        assert!(!prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_generation_prompt_includes_contexts() {
        let mut answers = HashMap::new();
        answers.insert("q1".to_string(), "Forty".to_string());
        let request = GenerateRequest {
            resume_text: "Original resume".to_string(),
            target_role: "Director of Engineering".to_string(),
            analysis: director_analysis(),
            answers,
            selected_suggestion_ids: vec!["s3".to_string()],
        };

        let prompt = build_generation_prompt(&request);

        assert!(prompt.contains("[Skill Gaps] Surface budget ownership"));
        assert!(!prompt.contains("[ATS & Systems]"));
        assert!(prompt.contains("User Answer: Forty"));
        assert!(prompt.contains("User Answer: No details provided."));
        assert!(prompt.contains(TRUTHFULNESS_INSTRUCTION));
    }

    #[test]
    fn test_user_text_with_placeholder_syntax_is_not_expanded() {
        let request = GenerateRequest {
            resume_text: "Wrote docs on {strategy_context} templating".to_string(),
            target_role: "Lead {resume_text}".to_string(),
            analysis: director_analysis(),
            answers: HashMap::new(),
            selected_suggestion_ids: vec!["s3".to_string()],
        };

        let prompt = build_generation_prompt(&request);

        assert!(prompt.contains("Target Role: \"Lead {resume_text}\""));
        assert!(prompt.contains("Wrote docs on {strategy_context} templating"));
        assert_eq!(prompt.matches("[Skill Gaps]").count(), 1);
    }

    #[test]
    fn test_refine_prompt_embeds_document_json() {
        let document = ResumeDocument {
            header: ResumeHeader {
                full_name: "Linus".to_string(),
                email: "linus@example.com".to_string(),
                ..Default::default()
            },
            skills: vec!["C".to_string()],
            ..Default::default()
        };
        let prompt = build_refine_prompt(&document, "Make punchier", "C").unwrap();
        assert!(prompt.contains("\"fullName\":\"Linus\""));
        assert!(prompt.contains("User Selection: \"C\""));
        assert!(prompt.contains("User Instruction: \"Make punchier\""));
    }

    #[test]
    fn test_ensure_stable_ids_fills_blank_and_duplicate() {
        let mut analysis = director_analysis();
        analysis.clarification_questions[1].id = " ".to_string();
        analysis.strategic_suggestions[2].id = "s1".to_string();

        ensure_stable_ids(&mut analysis);

        assert_eq!(analysis.clarification_questions[1].id, "q2");
        assert_eq!(analysis.strategic_suggestions[2].id, "s3");
        assert_eq!(analysis.suggestion_ids(), vec!["s1", "s2", "s3", "s4"]);
    }
}
