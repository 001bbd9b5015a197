// Prompt templates for the three optimizer requests.
// Placeholders in braces are replaced by GeminiOptimizer before sending.

pub const ANALYSIS_PERSONA: &str = "You are a distinguished Executive Career Consultant.";

/// Analysis prompt. Replace `{target_role}` and `{resume_text}`.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"The user is applying for the role of: "{target_role}".

Resume Data:
"""
{resume_text}
"""

Objective:
Analyze the gap between the candidate's current presentation and what is required to win a "{target_role}" offer.
Do NOT rewrite the resume yet. Create a Strategic Audit Report.

Requirements:
1. Executive Summary: a formal, direct, professional paragraph (80-100 words) addressed to the candidate.
   State where they are strong and clearly highlight the gap that will cause rejection.
2. Strengths: 3-4 key assets the candidate already has.
3. Clarification Questions: 2-3 specific details missing from their history that are critical for this role.
   Give each question a short stable id (q1, q2, ...).
4. Strategic Suggestions: exactly 4-5 pivotal changes, each with a stable id (s1, s2, ...), categorized strictly into:
   - "Formatting & Tone": narrative flow, action verbs, professional voice.
   - "Skill Gaps": missing hard skills, certifications, or specific tools required for the role.
   - "ATS & Systems": keywords, standard headings, machine-readability.
5. Gaps: missing hard skills, soft skills, and specific missing ATS keywords.
6. Match Score: an integer from 0 to 100.

Return strictly JSON."#;

pub const GENERATION_PERSONA: &str = "You are a professional Resume Writer.";

/// Generation prompt. Replace `{target_role}`, `{resume_text}`, `{strategy_context}`,
/// `{answer_context}` and `{truthfulness_instruction}`.
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"Target Role: "{target_role}".

Original Data:
"""{resume_text}"""

Strategic Directive:
{strategy_context}

New Evidence Provided by User:
{answer_context}

{truthfulness_instruction}

Task:
1. Rewrite the resume completely. Use a formal, executive tone. Incorporate the new evidence.
   Execute the strategic directives. Optimize for ATS keywords.
2. Provide a "changeOverview": a detailed paragraph explaining exactly what was changed and why,
   contrasting the old version with the new one.

Structure output as strict JSON."#;

pub const REFINE_PERSONA: &str = "You are an expert Resume Editor.";

/// Refinement prompt. Replace `{resume_json}`, `{selected_text}` and `{instruction}`.
pub const REFINE_PROMPT_TEMPLATE: &str = r#"Current Resume Data (JSON):
{resume_json}

User Selection: "{selected_text}"
User Instruction: "{instruction}"

Task:
1. Locate the section in the resume that corresponds to the User Selection.
2. Apply the User Instruction ONLY to that section. Do not change other parts of the resume.
3. If the instruction implies adding a skill, add it to the skills array.
4. If the instruction implies changing a bullet point, rewrite that specific bullet point
   to be more impactful, professional, or accurate based on the instruction.

Return the FULL updated resume JSON."#;
